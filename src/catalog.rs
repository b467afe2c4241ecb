use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::detection::ocr::TextRecognizer;
use crate::error::FacegridError;

/// Images keyed by file path, in directory listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDictionary {
    entries: Vec<(PathBuf, DynamicImage)>,
}

impl ImageDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the image stored under `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: DynamicImage) {
        let path = path.into();
        match self.entries.iter_mut().find(|(key, _)| *key == path) {
            Some(entry) => entry.1 = image,
            None => self.entries.push((path, image)),
        }
    }

    pub fn get(&self, path: &Path) -> Option<&DynamicImage> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, image)| image)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(path, _)| path.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &DynamicImage)> {
        self.entries.iter().map(|(path, image)| (path.as_path(), image))
    }

    /// Build a dictionary from every file in `folder`.
    ///
    /// Entries are sorted by path. Subdirectories are skipped. Any file that
    /// cannot be decoded aborts the load. With `grayscale`, images are
    /// converted to 8-bit luma as they are read.
    pub fn load(folder: &Path, grayscale: bool) -> Result<Self> {
        let mut paths = list_entries(folder)?;
        paths.sort();

        let mut dictionary = Self::new();
        for path in paths {
            if path.is_dir() {
                debug!("Skipping directory {}", path.display());
                continue;
            }

            let image = decode(&path)?;
            let image = if grayscale {
                DynamicImage::ImageLuma8(image.to_luma8())
            } else {
                image
            };

            debug!("Loaded {} ({}x{})", path.display(), image.width(), image.height());
            dictionary.entries.push((path, image));
        }

        Ok(dictionary)
    }

    /// Keep the entries whose recognized text contains `keyword`, ignoring case.
    ///
    /// Returns a new dictionary; `self` is left as it was.
    pub fn filter_by_keyword(&self, recognizer: &dyn TextRecognizer, keyword: &str) -> Result<Self> {
        let keyword = keyword.to_lowercase();
        let mut filtered = Self::new();

        for (path, image) in &self.entries {
            let text = recognizer
                .recognize_text(image)
                .with_context(|| format!("OCR failed on {}", path.display()))?
                .to_lowercase();

            if text.contains(&keyword) {
                debug!("Keyword found in {}", path.display());
                filtered.entries.push((path.clone(), image.clone()));
            }
        }

        Ok(filtered)
    }
}

/// Paths of every entry in `folder`, in the order the OS lists them.
pub fn list_entries(folder: &Path) -> Result<Vec<PathBuf>, FacegridError> {
    let io_error = |source| FacegridError::Io {
        path: folder.to_path_buf(),
        source,
    };

    std::fs::read_dir(folder)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()).map_err(io_error))
        .collect()
}

pub fn decode(path: &Path) -> Result<DynamicImage, FacegridError> {
    ImageReader::open(path)
        .map_err(|source| FacegridError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| FacegridError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|e| FacegridError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
