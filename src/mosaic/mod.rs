pub mod compose;
pub mod resize;

pub use compose::{MosaicLayout, compose};
pub use resize::normalize;
