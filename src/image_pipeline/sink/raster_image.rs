use crate::image_pipeline::debayer::types::{ChannelLayout, OutputDepth, Raster};
use crate::image_pipeline::sink::types::{Bounds, ColorModel, PixelColor, PixelSource};

/// A raster frozen for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    raster: Raster,
}

impl RasterImage {
    pub fn new(raster: Raster) -> Self {
        Self { raster }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

impl From<Raster> for RasterImage {
    fn from(raster: Raster) -> Self {
        Self::new(raster)
    }
}

impl PixelSource for RasterImage {
    fn bounds(&self) -> Bounds {
        Bounds {
            width: self.raster.width,
            height: self.raster.height,
        }
    }

    fn color_model(&self) -> ColorModel {
        match (self.raster.layout, self.raster.depth) {
            (ChannelLayout::Gray, OutputDepth::Depth8) => ColorModel::Gray8,
            (ChannelLayout::Gray, OutputDepth::Depth16) => ColorModel::Gray16,
            (ChannelLayout::Rgba, OutputDepth::Depth8) => ColorModel::Rgba8,
            (ChannelLayout::Rgba, OutputDepth::Depth16) => ColorModel::Rgba16,
        }
    }

    fn color_at(&self, x: usize, y: usize) -> Option<PixelColor> {
        if x >= self.raster.width || y >= self.raster.height {
            return None;
        }
        let px = self.raster.pixel(x, y);
        Some(match self.raster.layout {
            ChannelLayout::Gray => PixelColor::Gray(px[0]),
            ChannelLayout::Rgba => PixelColor::Rgba([px[0], px[1], px[2], px[3]]),
        })
    }
}
