use anyhow::{Context, Result};
use image::GrayImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::models::BoundingBox;

pub const FACE_MODEL_FILE: &str = "seeta_fd_frontal_v1.0.bin";

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale image.
    ///
    /// Higher `sensitivity` values demand stronger evidence per face, trading
    /// recall for fewer false positives.
    fn detect_faces(&self, image: &GrayImage, sensitivity: f64) -> Result<Vec<BoundingBox>>;
}

pub fn default_face_model_path() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
    Ok(Path::new(&home_dir)
        .join(".cache/facegrid")
        .join(FACE_MODEL_FILE))
}

/// Face detector backed by the `rustface` crate (SeetaFace cascade).
pub struct RustfaceDetector {
    model: rustface::Model,
    min_face_size: u32,
}

impl RustfaceDetector {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Face model not found at {}", path.display()))?;
        let model = rustface::read_model(BufReader::new(file))
            .with_context(|| format!("Failed to read face model {}", path.display()))?;
        Ok(Self {
            model,
            min_face_size: 20,
        })
    }

    pub fn with_min_face_size(mut self, min_face_size: u32) -> Self {
        self.min_face_size = min_face_size;
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect_faces(&self, image: &GrayImage, sensitivity: f64) -> Result<Vec<BoundingBox>> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(sensitivity);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let (width, height) = image.dimensions();
        let faces = detector.detect(&rustface::ImageData::new(image.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect())
    }
}
