mod fixtures;
#[allow(unused_imports)]
pub use fixtures::*;

// Re-export commonly used types from facegrid for tests
#[allow(unused_imports)]
pub use facegrid::{
    BoundingBox, FaceSearch, FacegridError, ImageDictionary, ImageOutcome, SearchConfig,
    SearchReport, WordDetection,
};
