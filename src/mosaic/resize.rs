use image::GrayImage;
use image::imageops::{self, FilterType};

use crate::error::{FacegridError, Result};

/// Resize every image to the smallest width and smallest height in the set.
///
/// Order and length are preserved. Images already at the target size are
/// copied unchanged, so a second pass is a no-op.
pub fn normalize(images: &[GrayImage]) -> Result<Vec<GrayImage>> {
    let (base_width, base_height) = base_dimensions(images)?;

    Ok(images
        .iter()
        .map(|image| {
            if image.dimensions() == (base_width, base_height) {
                image.clone()
            } else {
                imageops::resize(image, base_width, base_height, FilterType::CatmullRom)
            }
        })
        .collect())
}

/// Smallest width and smallest height across the set.
pub fn base_dimensions(images: &[GrayImage]) -> Result<(u32, u32)> {
    let base_width = images.iter().map(|image| image.width()).min();
    let base_height = images.iter().map(|image| image.height()).min();

    match (base_width, base_height) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(FacegridError::invalid_input(
            "cannot normalize an empty image list",
        )),
    }
}
