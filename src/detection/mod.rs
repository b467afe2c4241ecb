pub mod faces;
pub mod ocr;
pub mod redact;
pub mod steps;

use std::sync::Arc;

use crate::pipeline::Pipeline;
use faces::FaceDetector;
use ocr::TextRecognizer;
use steps::*;

/// Build the per-image stage: redact text, find faces, tile them into a mosaic
pub fn build_mosaic_pipeline(
    recognizer: Arc<dyn TextRecognizer>,
    detector: Arc<dyn FaceDetector>,
    sensitivity: f64,
) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(RedactTextStep { recognizer }))
        .add_step(Arc::new(FaceDetectionStep {
            detector,
            sensitivity,
        }))
        .add_step(Arc::new(ResizeStep))
        .add_step(Arc::new(MosaicStep))
}
