use anyhow::{Result, anyhow};
use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::models::BoundingBox;

/// Data that flows through the pipeline
/// Each PipelineData represents a whole image or a region cut out of one
#[derive(Clone, Debug)]
pub struct PipelineData {
    /// The image data (grayscale after the first step)
    pub image: DynamicImage,

    /// Bounding box in the source image (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Metadata for tracking properties (e.g., "source_path", "face_index")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            bbox: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region cut out of a parent item.
    /// The parent's metadata is inherited.
    pub fn from_region(image: DynamicImage, parent: &PipelineData, bbox: BoundingBox) -> Self {
        Self {
            image,
            bbox: Some(bbox),
            metadata: parent.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as int
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), merge (many → 1), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Make sure `dir` exists and holds nothing, creating it when absent.
pub fn ensure_empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        let entries = std::fs::read_dir(dir)?;
        if entries.count() > 0 {
            return Err(anyhow!("Debug directory is not empty: {}", dir.display()));
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        ensure_empty_dir(&output_dir)?;
        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order on a single input item
    pub fn run(&self, input: PipelineData) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: PipelineData, num_steps: usize) -> Result<Vec<PipelineData>> {
        self.save_debug_outputs("00_input", std::slice::from_ref(&input))?;
        self.run_steps(vec![input], 0, num_steps)
    }

    /// Run the remaining steps on items produced by `run_partial(.., first_step)`
    pub fn resume(&self, data: Vec<PipelineData>, first_step: usize) -> Result<Vec<PipelineData>> {
        self.run_steps(data, first_step, self.steps.len())
    }

    fn run_steps(&self, mut data: Vec<PipelineData>, start: usize, end: usize) -> Result<Vec<PipelineData>> {
        for (step_idx, step) in self.steps.iter().enumerate().take(end).skip(start) {
            debug!("Running step: {} (processing {} items)", step.name(), data.len());

            data = step.process(data, &self.context)?;

            let step_dir_name = format!(
                "{:02}_{}",
                step_idx + 1,
                step.name().to_lowercase().replace(' ', "_")
            );
            self.save_debug_outputs(&step_dir_name, &data)?;

            debug!("  → {} items", data.len());
        }

        Ok(data)
    }

    /// Save each item's image as `NN.png` under `<debug dir>/<step_dir_name>`
    fn save_debug_outputs(&self, step_dir_name: &str, data: &[PipelineData]) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(step_dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in data.iter().enumerate() {
            let output_path = step_dir.join(format!("{:02}.png", idx + 1));
            item.image
                .save(&output_path)
                .map_err(|e| anyhow!("Failed to save debug image: {}", e))?;
        }

        debug!("  Debug: saved {} images to {}/", data.len(), step_dir_name);
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
