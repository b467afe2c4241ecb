use anyhow::{Result, anyhow};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, OcrInput, TextItem};
use rten::Model;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::models::{BoundingBox, WordDetection};

pub const DETECTION_MODEL_FILE: &str = "text-detection.rten";
pub const RECOGNITION_MODEL_FILE: &str = "text-recognition.rten";

/// Text extraction backend.
pub trait TextRecognizer: Send + Sync {
    /// All text found in the image, as one string.
    fn recognize_text(&self, image: &DynamicImage) -> Result<String>;

    /// Candidate word regions in image coordinates, in reading order.
    fn recognize_words(&self, image: &DynamicImage) -> Result<Vec<WordDetection>>;
}

/// Standard model cache location used by `ocrs-cli`.
pub fn default_models_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
    Ok(Path::new(&home_dir).join(".cache/ocrs"))
}

/// Load the detection and recognition models from `models_dir`.
pub fn init_ocr_engine(models_dir: &Path) -> Result<OcrEngine> {
    let detection_model_path = models_dir.join(DETECTION_MODEL_FILE);
    let recognition_model_path = models_dir.join(RECOGNITION_MODEL_FILE);

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        anyhow::bail!(
            "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
             Expected locations:\n  - {}\n  - {}",
            detection_model_path.display(),
            recognition_model_path.display()
        );
    }

    let detection_model = Model::load_file(&detection_model_path)
        .map_err(|e| anyhow!("Failed to load {}: {}", detection_model_path.display(), e))?;
    let recognition_model = Model::load_file(&recognition_model_path)
        .map_err(|e| anyhow!("Failed to load {}: {}", recognition_model_path.display(), e))?;

    OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })
    .map_err(|e| anyhow!("Failed to create OCR engine: {}", e))
}

/// [`TextRecognizer`] backed by the `ocrs` engine.
///
/// Models are loaded on first use and shared by later calls.
pub struct OcrsRecognizer {
    models_dir: PathBuf,
    engine: Mutex<Option<Arc<OcrEngine>>>,
}

impl OcrsRecognizer {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            engine: Mutex::new(None),
        }
    }

    fn engine(&self) -> Result<Arc<OcrEngine>> {
        let mut engine_guard = self
            .engine
            .lock()
            .map_err(|_| anyhow!("OCR engine lock poisoned"))?;

        if let Some(engine) = engine_guard.as_ref() {
            return Ok(engine.clone());
        }

        debug!("Initializing OCR engine from {}", self.models_dir.display());
        let engine = Arc::new(init_ocr_engine(&self.models_dir)?);
        *engine_guard = Some(engine.clone());
        debug!("OCR engine initialized");
        Ok(engine)
    }

    fn prepare(engine: &OcrEngine, image: &DynamicImage) -> Result<OcrInput> {
        let rgb = image.to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| anyhow!("Failed to wrap image for OCR: {}", e))?;
        engine
            .prepare_input(source)
            .map_err(|e| anyhow!("Failed to prepare OCR input: {}", e))
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize_text(&self, image: &DynamicImage) -> Result<String> {
        let engine = self.engine()?;
        let input = Self::prepare(&engine, image)?;
        engine
            .get_text(&input)
            .map_err(|e| anyhow!("Text recognition failed: {}", e))
    }

    fn recognize_words(&self, image: &DynamicImage) -> Result<Vec<WordDetection>> {
        let engine = self.engine()?;
        let input = Self::prepare(&engine, image)?;

        let word_rects = engine
            .detect_words(&input)
            .map_err(|e| anyhow!("Word detection failed: {}", e))?;
        let line_rects = engine.find_text_lines(&input, &word_rects);
        let lines = engine
            .recognize_text(&input, &line_rects)
            .map_err(|e| anyhow!("Text recognition failed: {}", e))?;

        let mut detections = Vec::new();
        for (line, rects) in lines.iter().zip(&line_rects) {
            match line {
                Some(line) => {
                    for word in line.words() {
                        let rect = word.bounding_rect();
                        detections.push(WordDetection::new(
                            BoundingBox::new(
                                rect.left(),
                                rect.top(),
                                rect.width().max(0) as u32,
                                rect.height().max(0) as u32,
                            ),
                            word.to_string(),
                        ));
                    }
                }
                // A text region was found but nothing could be read from it.
                None => {
                    for rect in rects {
                        detections.push(WordDetection::new(
                            axis_aligned_box(rect.corners().iter().map(|p| (p.x, p.y))),
                            String::new(),
                        ));
                    }
                }
            }
        }

        Ok(detections)
    }
}

/// Smallest pixel box containing every corner of a rotated word rectangle.
fn axis_aligned_box(corners: impl IntoIterator<Item = (f32, f32)>) -> BoundingBox {
    let mut corners = corners.into_iter().peekable();
    if corners.peek().is_none() {
        return BoundingBox::new(0, 0, 0, 0);
    }

    let (min_x, min_y, max_x, max_y) = corners.fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(min_x, min_y, max_x, max_y), (x, y)| (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
    );
    BoundingBox::new(
        min_x.round() as i32,
        min_y.round() as i32,
        (max_x - min_x).round() as u32,
        (max_y - min_y).round() as u32,
    )
}
