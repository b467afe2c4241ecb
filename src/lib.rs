pub mod catalog;
pub mod detection;
pub mod error;
pub mod models;
pub mod mosaic;
pub mod pipeline;
pub mod present;
pub mod prompt;
pub mod search;

pub use catalog::ImageDictionary;
pub use detection::faces::{FaceDetector, RustfaceDetector};
pub use detection::ocr::{OcrsRecognizer, TextRecognizer};
pub use error::FacegridError;
pub use models::{BoundingBox, Corners, WordDetection};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
pub use present::{FilePresenter, Presenter};
pub use search::{FaceSearch, ImageOutcome, SearchConfig, SearchReport};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` over `info`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
