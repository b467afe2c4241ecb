use crate::detection::faces::FaceDetector;
use crate::detection::ocr::TextRecognizer;
use crate::detection::redact;
use crate::error::FacegridError;
use crate::mosaic::{self, MosaicLayout};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, info};

pub const SOURCE_PATH: &str = "source_path";
pub const REDACTED_WORDS: &str = "redacted_words";
pub const FACE_INDEX: &str = "face_index";
pub const TILE_COUNT: &str = "tile_count";
pub const MOSAIC_COLUMNS: &str = "mosaic_columns";
pub const MOSAIC_ROWS: &str = "mosaic_rows";

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|mut item| {
                item.image = DynamicImage::ImageLuma8(item.image.to_luma8());
                item
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Paint over every word the OCR engine finds
pub struct RedactTextStep {
    pub recognizer: Arc<dyn TextRecognizer>,
}

impl PipelineStep for RedactTextStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());

        for item in data {
            let words = self.recognizer.recognize_words(&item.image)?;
            let mut gray = item.image.to_luma8();
            let painted = redact::blank_text(&mut gray, &words);

            info!(
                "Text deleted: blanked {} of {} word regions in {}",
                painted,
                words.len(),
                item.get_string(SOURCE_PATH).unwrap_or("image")
            );

            let mut new_item = item;
            new_item.image = DynamicImage::ImageLuma8(gray);
            new_item
                .metadata
                .insert(REDACTED_WORDS.to_string(), MetadataValue::Int(painted as i32));
            result.push(new_item);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Text Redaction"
    }
}

/// Detect faces - splits one image into one item per face crop
pub struct FaceDetectionStep {
    pub detector: Arc<dyn FaceDetector>,
    pub sensitivity: f64,
}

impl PipelineStep for FaceDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let gray = item.image.to_luma8();
            let (width, height) = gray.dimensions();
            let faces = self.detector.detect_faces(&gray, self.sensitivity)?;
            info!(
                "Faces detected: {} in {}",
                faces.len(),
                item.get_string(SOURCE_PATH).unwrap_or("image")
            );

            for (index, bbox) in faces.into_iter().enumerate() {
                let corners = bbox.to_corners().clamp_to(width, height);
                let crop_width = corners.x2.abs_diff(corners.x1);
                let crop_height = corners.y2.abs_diff(corners.y1);

                if crop_width == 0 || crop_height == 0 {
                    debug!("Skipping face {} outside the image: {:?}", index, bbox);
                    continue;
                }

                let cropped = item.image.crop_imm(
                    corners.x1 as u32,
                    corners.y1 as u32,
                    crop_width,
                    crop_height,
                );

                result.push(
                    PipelineData::from_region(cropped, &item, bbox)
                        .with_metadata(FACE_INDEX, MetadataValue::Int(index as i32)),
                );
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Face Detection"
    }
}

/// Resize every item to the smallest width and height among them
pub struct ResizeStep;

impl PipelineStep for ResizeStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        if data.is_empty() {
            return Ok(data);
        }

        let grays: Vec<_> = data.iter().map(|item| item.image.to_luma8()).collect();
        let resized = mosaic::normalize(&grays)?;

        Ok(data
            .into_iter()
            .zip(resized)
            .map(|(mut item, image)| {
                item.image = DynamicImage::ImageLuma8(image);
                item
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Resize"
    }
}

/// Merge all items into a single mosaic image
pub struct MosaicStep;

impl PipelineStep for MosaicStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let Some(first) = data.first() else {
            return Err(FacegridError::invalid_input("no faces to compose into a mosaic").into());
        };

        let tiles: Vec<_> = data.iter().map(|item| item.image.to_luma8()).collect();
        let canvas = mosaic::compose(&tiles)?;
        let (tile_width, tile_height) = mosaic::resize::base_dimensions(&tiles)?;
        let layout = MosaicLayout::for_tiles(tiles.len() as u32, tile_width, tile_height)?;

        let mut merged = PipelineData::from_image(DynamicImage::ImageLuma8(canvas));
        if let Some(source) = first.get_string(SOURCE_PATH) {
            merged = merged.with_metadata(SOURCE_PATH, MetadataValue::String(source.to_string()));
        }

        Ok(vec![
            merged
                .with_metadata(TILE_COUNT, MetadataValue::Int(layout.tile_count as i32))
                .with_metadata(MOSAIC_COLUMNS, MetadataValue::Int(layout.columns as i32))
                .with_metadata(MOSAIC_ROWS, MetadataValue::Int(layout.rows as i32)),
        ])
    }

    fn name(&self) -> &str {
        "Mosaic"
    }
}
