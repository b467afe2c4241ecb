use facegrid::{BoundingBox, FaceDetector, FacegridError, Presenter, TextRecognizer, WordDetection};
use image::{DynamicImage, GrayImage, Luma};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Reads the "text" of an image from its top-left pixel value.
#[derive(Default)]
pub struct ScriptedRecognizer {
    texts: HashMap<u8, String>,
    words: Vec<WordDetection>,
    unreadable_words: bool,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, marker: u8, text: &str) -> Self {
        self.texts.insert(marker, text.to_string());
        self
    }

    pub fn with_word(mut self, bbox: BoundingBox, text: &str) -> Self {
        self.words.push(WordDetection::new(bbox, text));
        self
    }

    /// Make word lookup fail with `InvalidInput` while full-text search still works.
    pub fn with_unreadable_words(mut self) -> Self {
        self.unreadable_words = true;
        self
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize_text(&self, image: &DynamicImage) -> anyhow::Result<String> {
        let marker = image.to_luma8().get_pixel(0, 0)[0];
        Ok(self.texts.get(&marker).cloned().unwrap_or_default())
    }

    fn recognize_words(&self, _image: &DynamicImage) -> anyhow::Result<Vec<WordDetection>> {
        if self.unreadable_words {
            return Err(FacegridError::invalid_input("word regions could not be read").into());
        }
        Ok(self.words.clone())
    }
}

/// Reports the same faces for every image and remembers the sensitivity asked for.
#[derive(Default)]
pub struct FixedFaceDetector {
    faces: Vec<BoundingBox>,
    pub sensitivities: Mutex<Vec<f64>>,
}

impl FixedFaceDetector {
    pub fn new(faces: Vec<BoundingBox>) -> Self {
        Self {
            faces,
            sensitivities: Mutex::new(Vec::new()),
        }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect_faces(&self, _image: &GrayImage, sensitivity: f64) -> anyhow::Result<Vec<BoundingBox>> {
        self.sensitivities.lock().unwrap().push(sensitivity);
        Ok(self.faces.clone())
    }
}

/// Keeps every presented mosaic in memory.
#[derive(Clone, Default)]
pub struct CollectingPresenter {
    pub shown: Arc<Mutex<Vec<(PathBuf, GrayImage)>>>,
}

impl Presenter for CollectingPresenter {
    fn show(&self, mosaic: &GrayImage, source: &Path) -> anyhow::Result<()> {
        self.shown
            .lock()
            .unwrap()
            .push((source.to_path_buf(), mosaic.clone()));
        Ok(())
    }
}

/// A 100x100 grayscale image whose top-left pixel is `marker` and whose
/// remaining pixels form a gradient.
pub fn marked_image(marker: u8) -> GrayImage {
    let mut img = GrayImage::from_fn(100, 100, |x, y| Luma([((x + y) % 200) as u8]));
    img.put_pixel(0, 0, Luma([marker]));
    img
}

/// Writes the given images as PNG files into a fresh temporary directory.
pub fn image_folder(images: &[(&str, GrayImage)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    for (name, img) in images {
        img.save_with_format(dir.path().join(name), image::ImageFormat::Png)
            .expect("Failed to save test image");
    }
    dir
}

/// Four 10x10 faces, one of them over (50, 50).
pub fn four_faces() -> Vec<BoundingBox> {
    vec![
        BoundingBox::new(0, 0, 10, 10),
        BoundingBox::new(20, 0, 10, 10),
        BoundingBox::new(50, 50, 10, 10),
        BoundingBox::new(70, 70, 10, 10),
    ]
}
