//! Pixel-addressable view of a finished raster for image encoders.

mod raster_image;
pub mod types;

pub use raster_image::RasterImage;
pub use types::{Bounds, ColorModel, PixelColor, PixelSource};
