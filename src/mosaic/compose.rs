use image::GrayImage;
use image::imageops;

use crate::error::{FacegridError, Result};
use crate::mosaic::resize;

/// Grid geometry for a mosaic of `tile_count` equally sized tesserae.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLayout {
    pub tile_count: u32,
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl MosaicLayout {
    /// Near-square grid: `floor(sqrt(n))` columns, as many rows as needed.
    pub fn for_tiles(tile_count: u32, tile_width: u32, tile_height: u32) -> Result<Self> {
        if tile_count == 0 {
            return Err(FacegridError::invalid_input(
                "a mosaic needs at least one tile",
            ));
        }

        let columns = tile_count.isqrt();
        let rows = tile_count.div_ceil(columns);

        Ok(Self {
            tile_count,
            columns,
            rows,
            tile_width,
            tile_height,
        })
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.columns * self.tile_width,
            self.rows * self.tile_height,
        )
    }

    /// Grid cell of the tile at `index`, filled row by row from the top left.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }

    /// Pixel offset of the tile at `index`.
    pub fn offset(&self, index: u32) -> (u32, u32) {
        let (column, row) = self.cell(index);
        (column * self.tile_width, row * self.tile_height)
    }
}

/// Paste the images into a single grayscale canvas.
///
/// Inputs are normalized first, so differently sized crops are accepted.
/// Cells past the last tile stay black.
pub fn compose(images: &[GrayImage]) -> Result<GrayImage> {
    let tiles = resize::normalize(images)?;
    let (tile_width, tile_height) = tiles[0].dimensions();
    let tile_count = u32::try_from(tiles.len())
        .map_err(|_| FacegridError::invalid_input("too many tiles for one mosaic"))?;
    let layout = MosaicLayout::for_tiles(tile_count, tile_width, tile_height)?;

    let (canvas_width, canvas_height) = layout.canvas_size();
    let mut canvas = GrayImage::new(canvas_width, canvas_height);

    for (index, tile) in (0..tile_count).zip(&tiles) {
        let (x, y) = layout.offset(index);
        imageops::replace(&mut canvas, tile, x.into(), y.into());
    }

    Ok(canvas)
}
