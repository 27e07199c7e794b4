//! RAF container reader.
//!
//! This module ties the container pieces together: it reads the fixed header,
//! slices the preview, metadata and mosaic blocks out of the file, decodes the
//! metadata records and loads the sensor mosaic at the geometry they describe.

use std::io::Cursor;

use tracing::{debug, warn};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::header::ContainerHeader;
use crate::image_pipeline::raw::metadata::Metadata;
use crate::image_pipeline::raw::mosaic::{load_mosaic, resolve_geometry};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::RafImage;

/// Significant bits per sample on the X-H1 sensor.
pub const DEFAULT_SENSOR_BITS: u32 = 14;

/// RAW image reader for Fujifilm RAF files with uncompressed X-Trans mosaics.
#[derive(Debug, Clone)]
pub struct RafReader {
    sensor_bits: u32,
    geometry: Option<(usize, usize)>,
}

impl Default for RafReader {
    fn default() -> Self {
        Self::new(DEFAULT_SENSOR_BITS)
    }
}

impl RafReader {
    pub fn new(sensor_bits: u32) -> Self {
        Self { sensor_bits, geometry: None }
    }

    /// Forces the mosaic geometry instead of resolving it from the metadata.
    pub fn with_geometry(mut self, width: usize, height: usize) -> Self {
        self.geometry = Some((width, height));
        self
    }

    pub fn sensor_bits(&self) -> u32 {
        self.sensor_bits
    }
}

impl RawImageReader for RafReader {
    /// Decodes a whole RAF file held in memory.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes of the RAF file
    ///
    /// # Returns
    ///
    /// * `Ok(RafImage)` - Header, metadata, mosaic and preview bytes
    /// * `Err(ConversionError::Format)` - Truncated header, bad records or undersized mosaic
    /// * `Err(ConversionError::Io)` - A block lies outside the file
    fn read_raw(&self, data: &[u8]) -> Result<RafImage> {
        debug!("Decoding RAF image, {} bytes", data.len());

        let header = ContainerHeader::read_from(&mut Cursor::new(data))?;
        debug!("RAF header:\n{}", header);

        let preview = header.preview.slice(data)?.to_vec();
        let metadata = Metadata::parse(header.metadata.slice(data)?)?;
        if metadata.is_compressed() {
            warn!("Metadata flags the mosaic as compressed; reading it as uncompressed samples anyway");
        }

        let (width, height) = self.geometry.unwrap_or_else(|| resolve_geometry(&metadata));
        debug!("Mosaic geometry: {}x{}", width, height);

        let mosaic = load_mosaic(header.mosaic.slice(data)?, width, height, self.sensor_bits)?;

        Ok(RafImage {
            header,
            metadata,
            mosaic,
            preview,
        })
    }
}
