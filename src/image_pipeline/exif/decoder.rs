use std::io::Cursor;

use tracing::trace;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::exif::types::ExifTags;

pub trait PreviewMetadataDecoder {
    fn decode(&self, preview: &[u8]) -> Result<ExifTags>;
}

/// Reads the EXIF block of a JPEG preview with `kamadak-exif`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegExifDecoder;

impl PreviewMetadataDecoder for JpegExifDecoder {
    fn decode(&self, preview: &[u8]) -> Result<ExifTags> {
        let exif = ::exif::Reader::new()
            .read_from_container(&mut Cursor::new(preview))
            .map_err(|e| ConversionError::Metadata(e.to_string()))?;

        trace!(fields = exif.fields().len(), little_endian = exif.little_endian(), "Decoded preview EXIF");
        Ok(ExifTags::from_fields(exif.fields().cloned()))
    }
}
