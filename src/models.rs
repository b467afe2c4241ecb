/// Bounding box in corner+size form, as reported by detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Bounding box given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Convert `(x, y, w, h)` into `(x, y, x + w, y + h)`.
    pub fn to_corners(&self) -> Corners {
        Corners {
            x1: self.x,
            y1: self.y,
            x2: self.x.saturating_add_unsigned(self.width),
            y2: self.y.saturating_add_unsigned(self.height),
        }
    }

    pub fn from_corners(corners: Corners) -> Self {
        Self {
            x: corners.x1,
            y: corners.y1,
            width: corners.x2.abs_diff(corners.x1),
            height: corners.y2.abs_diff(corners.y1),
        }
    }
}

impl Corners {
    /// Clamp to an image of the given size. `x2`/`y2` are exclusive after clamping.
    pub fn clamp_to(&self, width: u32, height: u32) -> Corners {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX);
        let x1 = self.x1.clamp(0, max_x);
        let y1 = self.y1.clamp(0, max_y);
        Corners {
            x1,
            y1,
            x2: self.x2.clamp(x1, max_x),
            y2: self.y2.clamp(y1, max_y),
        }
    }
}

/// A candidate word region returned by the OCR engine.
///
/// An empty `text` means the engine found a region but no word in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDetection {
    pub bbox: BoundingBox,
    pub text: String,
}

impl WordDetection {
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    pub fn has_word(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
