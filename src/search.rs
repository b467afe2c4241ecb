use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::ImageDictionary;
use crate::detection::build_mosaic_pipeline;
use crate::detection::faces::FaceDetector;
use crate::detection::ocr::TextRecognizer;
use crate::detection::steps::{SOURCE_PATH, TILE_COUNT};
use crate::error::FacegridError;
use crate::pipeline::{self, MetadataValue, Pipeline, PipelineData};
use crate::present::Presenter;
use crate::prompt::validate_keyword;

/// Settings for one search run
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub folder: PathBuf,
    pub keyword: String,
    /// How many matched images get a mosaic (None means all of them)
    pub max_results: Option<usize>,
    /// Face detector score threshold
    pub sensitivity: f64,
    pub min_face_size: u32,
    /// Convert images to grayscale as they are loaded
    pub grayscale: bool,
    /// Save intermediate images per matched file under this directory
    pub debug_out: Option<PathBuf>,
}

impl SearchConfig {
    pub fn new(folder: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_min_face_size(mut self, min_face_size: u32) -> Self {
        self.min_face_size = min_face_size;
        self
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    pub fn with_debug_out(mut self, debug_out: Option<PathBuf>) -> Self {
        self.debug_out = debug_out;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("small_img"),
            keyword: String::new(),
            max_results: Some(1),
            // rustface defaults to 2.0; stricter to cut false positives
            sensitivity: 4.0,
            min_face_size: 20,
            grayscale: true,
            debug_out: None,
        }
    }
}

/// What happened to one matched image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Presented { path: PathBuf, faces: usize },
    NoFaces { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub loaded: usize,
    pub matched: Vec<PathBuf>,
    pub outcomes: Vec<ImageOutcome>,
}

/// Keyword search over a folder followed by a face mosaic per match
pub struct FaceSearch {
    config: SearchConfig,
    recognizer: Arc<dyn TextRecognizer>,
    detector: Arc<dyn FaceDetector>,
    presenter: Box<dyn Presenter>,
}

impl FaceSearch {
    pub fn new(
        config: SearchConfig,
        recognizer: Arc<dyn TextRecognizer>,
        detector: Arc<dyn FaceDetector>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            config,
            recognizer,
            detector,
            presenter,
        }
    }

    /// Load, filter by keyword, then build and present mosaics.
    ///
    /// Fails with [`FacegridError::EmptyResult`] when no image mentions the keyword.
    pub fn run(&self) -> Result<SearchReport> {
        let keyword = validate_keyword(&self.config.keyword)?;

        if let Some(debug_root) = &self.config.debug_out {
            pipeline::ensure_empty_dir(debug_root)?;
        }

        let start = Instant::now();
        info!("Creating image dictionary from {}...", self.config.folder.display());
        let dictionary = ImageDictionary::load(&self.config.folder, self.config.grayscale)?;
        info!(
            "Image dictionary of {} images created in {:.2}s",
            dictionary.len(),
            start.elapsed().as_secs_f64()
        );

        let start = Instant::now();
        info!("Looking for instances of keyword \"{}\" in images", keyword);
        let matched = dictionary.filter_by_keyword(self.recognizer.as_ref(), &keyword)?;
        let matched_paths: Vec<PathBuf> = matched.paths().map(Path::to_path_buf).collect();
        info!(
            "Accomplished in {:.2}s. Keyword \"{}\" found in images: {:?}",
            start.elapsed().as_secs_f64(),
            keyword,
            matched_paths
        );

        if matched.is_empty() {
            return Err(FacegridError::EmptyResult { keyword }.into());
        }

        let limit = self.config.max_results.unwrap_or(usize::MAX);
        let mut outcomes = Vec::new();

        for (index, (path, image)) in matched.iter().take(limit).enumerate() {
            info!("Analyzing image {}...", path.display());

            let input = PipelineData::from_image(image.clone()).with_metadata(
                SOURCE_PATH,
                MetadataValue::String(path.display().to_string()),
            );

            let pipeline = self.pipeline_for(index, path)?;
            // Everything up to the mosaic merge, so an empty face list is seen directly
            let mosaic_step = pipeline.step_names().len().saturating_sub(1);
            let faces = pipeline
                .run_partial(input, mosaic_step)
                .map_err(|err| err.context(format!("Failed to process {}", path.display())))?;

            if faces.is_empty() {
                warn!("No faces detected in {}, skipping mosaic", path.display());
                outcomes.push(ImageOutcome::NoFaces {
                    path: path.to_path_buf(),
                });
                continue;
            }

            let mosaic = pipeline
                .resume(faces, mosaic_step)
                .map_err(|err| err.context(format!("Failed to build mosaic for {}", path.display())))?
                .pop()
                .ok_or_else(|| anyhow!("Mosaic step produced no image for {}", path.display()))?;
            let tile_count = mosaic.get_int(TILE_COUNT).unwrap_or_default().max(0) as usize;

            self.presenter.show(&mosaic.image.to_luma8(), path)?;
            outcomes.push(ImageOutcome::Presented {
                path: path.to_path_buf(),
                faces: tile_count,
            });
        }

        Ok(SearchReport {
            loaded: dictionary.len(),
            matched: matched_paths,
            outcomes,
        })
    }

    fn pipeline_for(&self, index: usize, path: &Path) -> Result<Pipeline> {
        let pipeline = build_mosaic_pipeline(
            self.recognizer.clone(),
            self.detector.clone(),
            self.config.sensitivity,
        );

        match &self.config.debug_out {
            Some(debug_root) => {
                let stem = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                pipeline.with_debug(debug_root.join(format!("{:02}_{}", index + 1, stem)))
            }
            None => Ok(pipeline),
        }
    }
}
