use anyhow::{Result, anyhow};
use image::GrayImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where finished mosaics go.
pub trait Presenter {
    /// Present the mosaic built from `source`.
    fn show(&self, mosaic: &GrayImage, source: &Path) -> Result<()>;
}

/// Writes each mosaic as `<file name>_mosaic.png` into a directory.
///
/// The source extension stays in the name so `a.png` and `a.bmp` get separate files.
pub struct FilePresenter {
    output_dir: PathBuf,
}

impl FilePresenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.output_dir.join(format!("{name}_mosaic.png"))
    }
}

impl Presenter for FilePresenter {
    fn show(&self, mosaic: &GrayImage, source: &Path) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_path(source);
        mosaic
            .save(&output_path)
            .map_err(|e| anyhow!("Failed to save mosaic {}: {}", output_path.display(), e))?;
        info!(
            "Mosaic of {}x{} written to {}",
            mosaic.width(),
            mosaic.height(),
            output_path.display()
        );
        Ok(())
    }
}
