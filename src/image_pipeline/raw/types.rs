//! RAW image data types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::header::ContainerHeader;
use crate::image_pipeline::raw::metadata::Metadata;

/// Raw sensor samples, one per photosite, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mosaic {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Significant bits per sample (14 on the X-H1)
    pub bits_per_sample: u32,
    /// Sample data, at least `width * height` values
    pub data: Vec<u16>,
}

impl Mosaic {
    pub fn new(width: usize, height: usize, bits_per_sample: u32, data: Vec<u16>) -> Result<Self> {
        let mosaic = Self { width, height, bits_per_sample, data };
        mosaic.validate()?;
        Ok(mosaic)
    }

    /// Checks the buffer covers the whole grid and the bit depth is representable.
    pub fn validate(&self) -> Result<()> {
        if self.bits_per_sample == 0 || self.bits_per_sample > 16 {
            return Err(ConversionError::format(format!(
                "unsupported sensor bit depth {}",
                self.bits_per_sample
            )));
        }
        let needed = self.width.checked_mul(self.height).ok_or_else(|| {
            ConversionError::InvalidDimensions(self.width, self.height)
        })?;
        if self.data.len() < needed {
            return Err(ConversionError::format(format!(
                "mosaic holds {} samples, {}x{} needs {}",
                self.data.len(),
                self.width,
                self.height,
                needed
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.width + x]
    }
}

/// Everything decoded out of one RAF file.
#[derive(Debug, Clone)]
pub struct RafImage {
    pub header: ContainerHeader,
    pub metadata: Metadata,
    pub mosaic: Mosaic,
    /// Embedded JPEG preview, verbatim
    pub preview: Vec<u8>,
}
