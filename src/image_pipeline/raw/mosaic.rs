//! Mosaic block loading.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::metadata::Metadata;
use crate::image_pipeline::raw::types::Mosaic;

/// Bytes ahead of the first sample in the mosaic block.
pub const MOSAIC_PREAMBLE_LEN: usize = 2048;

/// Sensor geometry of the X-H1, used when the metadata names none.
pub const DEFAULT_WIDTH: usize = 6160;
pub const DEFAULT_HEIGHT: usize = 4032;

/// Picks `(width, height)` for the mosaic from the decoded metadata.
pub fn resolve_geometry(metadata: &Metadata) -> (usize, usize) {
    if let Some((width, height)) = metadata.raf_geometry() {
        return (width as usize, height as usize);
    }
    if let Some(dims) = metadata.sensor_dimensions() {
        return (dims.width as usize, dims.height as usize);
    }
    (DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Loads little-endian samples from a mosaic block, masked to `bits_per_sample`.
pub fn load_mosaic(block: &[u8], width: usize, height: usize, bits_per_sample: u32) -> Result<Mosaic> {
    let samples = width
        .checked_mul(height)
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    let needed = samples
        .checked_mul(2)
        .and_then(|n| n.checked_add(MOSAIC_PREAMBLE_LEN))
        .ok_or(ConversionError::InvalidDimensions(width, height))?;

    if block.len() < needed {
        return Err(ConversionError::format(format!(
            "mosaic block is {} bytes, {}x{} needs {}",
            block.len(),
            width,
            height,
            needed
        )));
    }
    if bits_per_sample == 0 || bits_per_sample > 16 {
        return Err(ConversionError::format(format!(
            "unsupported sensor bit depth {bits_per_sample}"
        )));
    }

    let raw = &block[MOSAIC_PREAMBLE_LEN..needed];
    let mut data = vec![0u16; samples];
    LittleEndian::read_u16_into(raw, &mut data);

    let mask = (u32::MAX >> (32 - bits_per_sample)) as u16;
    for sample in data.iter_mut() {
        *sample &= mask;
    }

    debug!(width, height, bits_per_sample, "Loaded mosaic, first samples {:04x?}", &data[..data.len().min(8)]);
    Mosaic::new(width, height, bits_per_sample, data)
}
