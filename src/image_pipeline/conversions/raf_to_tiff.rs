use tracing::{info, instrument, warn};
use std::io::{Cursor, Write};
use std::path::Path;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    debayer::{CpuDebayer, DemosaicReport},
    exif::{JpegExifDecoder, PreviewMetadataDecoder},
    normalize::stretch_channels,
    raw::{ContainerHeader, RafReader, RawImageReader},
    sink::RasterImage,
    tiff::{ConversionConfig, StandardTiffWriter, TiffWriter},
};

/// What one conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub width: usize,
    pub height: usize,
    pub camera: String,
    pub focal_length: Option<u32>,
    pub demosaic: DemosaicReport,
    pub white_balanced: bool,
}

pub struct RafToTiffPipeline<R: RawImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    debayer: CpuDebayer,
    preview_decoder: Box<dyn PreviewMetadataDecoder>,
    config: ConversionConfig,
}

impl RafToTiffPipeline<RafReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_custom(RafReader::default(), StandardTiffWriter, config)
    }
}

impl<R: RawImageReader, W: TiffWriter> RafToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            debayer: CpuDebayer::new(),
            preview_decoder: Box::new(JpegExifDecoder),
            config,
        }
    }

    pub fn with_preview_decoder(mut self, decoder: impl PreviewMetadataDecoder + 'static) -> Self {
        self.preview_decoder = Box::new(decoder);
        self
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Focal length from the preview's EXIF block; failures are only logged.
    fn preview_focal_length(&self, preview: &[u8]) -> Option<u32> {
        let _span = tracing::info_span!("decode_preview_metadata", preview_size = preview.len()).entered();
        match self.preview_decoder.decode(preview) {
            Ok(exif) => {
                let focal = exif.focal_length();
                match focal {
                    Some(mm) => info!(focal_length_mm = mm, "Preview metadata decoded"),
                    None => info!(fields = exif.field_count(), "Preview metadata has no focal length"),
                }
                focal
            }
            Err(e) => {
                warn!("Skipping preview metadata: {}", e);
                None
            }
        }
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<ConversionSummary> {
        info!("Starting RAF to TIFF conversion");

        let raf = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };
        let (width, height) = (raf.mosaic.width, raf.mosaic.height);

        {
            let _span = tracing::info_span!("validate_dimensions", width, height).entered();
            self.validate_dimensions(width, height)?;
        }

        let focal_length = self.preview_focal_length(&raf.preview);

        let (mut raster, report) = {
            let _span = tracing::info_span!("demosaic", algorithm = %self.config.demosaic).entered();
            self.debayer.process(&raf.mosaic, &self.config.demosaic_settings())?
        };
        if report.degraded_samples > 0 {
            info!(
                degraded = report.degraded_samples,
                "Some channel values had no usable neighbour and were set to zero"
            );
        }

        let white_balanced = if self.config.white_balance {
            let _span = tracing::info_span!("white_balance").entered();
            stretch_channels(&mut raster)
        } else {
            false
        };

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&RasterImage::new(raster), output, &self.config)?;
        }

        info!(width, height, "Conversion complete");
        Ok(ConversionSummary {
            width,
            height,
            camera: raf.header.camera_name(),
            focal_length,
            demosaic: report,
            white_balanced,
        })
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionSummary> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = read_input(input_path)?;

        // Encode fully before touching the output so a failed decode leaves no file behind.
        let mut encoded = Vec::new();
        let summary = self.convert(&input_data, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(summary)
    }

    /// Returns the embedded JPEG preview of a RAF file held in memory.
    pub fn extract_preview(&self, input_data: &[u8]) -> Result<Vec<u8>> {
        let header = ContainerHeader::read_from(&mut Cursor::new(input_data))?;
        Ok(header.preview.slice(input_data)?.to_vec())
    }

    #[instrument(skip(self, input_path, preview_path))]
    pub fn extract_preview_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        preview_path: Q,
    ) -> Result<usize> {
        let preview_path = preview_path.as_ref();
        let input_data = read_input(input_path.as_ref())?;
        let preview = self.extract_preview(&input_data)?;

        std::fs::write(preview_path, &preview).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", preview_path.display(), e))
        })?;
        info!(preview = %preview_path.display(), bytes = preview.len(), "Preview extracted");
        Ok(preview.len())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

fn read_input(input_path: &Path) -> Result<Vec<u8>> {
    let _span = tracing::info_span!("read_input_file").entered();
    std::fs::read(input_path).map_err(|e| {
        ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
    })
}
