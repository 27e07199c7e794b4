/// Sample layout an encoder has to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray8,
    Gray16,
    Rgba8,
    Rgba16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: usize,
    pub height: usize,
}

/// One pixel in the source's colour model; 8-bit models keep values in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelColor {
    Gray(u16),
    Rgba([u16; 4]),
}

pub trait PixelSource {
    fn bounds(&self) -> Bounds;
    fn color_model(&self) -> ColorModel;
    /// `None` outside `bounds()`.
    fn color_at(&self, x: usize, y: usize) -> Option<PixelColor>;
}
