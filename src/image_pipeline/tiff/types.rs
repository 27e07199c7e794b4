//! Conversion configuration types

use crate::image_pipeline::debayer::types::{Demosaic, DemosaicSettings, OutputDepth};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced (default)
    DeflateBalanced,
}

/// Configuration for RAF to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Reconstruction algorithm
    pub demosaic: Demosaic,
    /// Bit depth of the written TIFF (before white balance promotes it)
    pub output_depth: OutputDepth,
    /// Whether to run the per-channel histogram stretch after demosaicing
    pub white_balance: bool,
    /// Whether to log each degraded pixel
    pub verbose: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            demosaic: Demosaic::ColorHue,
            output_depth: OutputDepth::Depth16,
            white_balance: false,
            verbose: false,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    pub fn demosaic_settings(&self) -> DemosaicSettings {
        DemosaicSettings {
            algorithm: self.demosaic,
            output_depth: self.output_depth,
            verbose: self.verbose,
        }
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    demosaic: Option<Demosaic>,
    output_depth: Option<OutputDepth>,
    white_balance: Option<bool>,
    verbose: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn demosaic(mut self, demosaic: Demosaic) -> Self {
        self.demosaic = Some(demosaic);
        self
    }

    pub fn output_depth(mut self, depth: OutputDepth) -> Self {
        self.output_depth = Some(depth);
        self
    }

    pub fn white_balance(mut self, enable: bool) -> Self {
        self.white_balance = Some(enable);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            output_depth: self.output_depth.unwrap_or(default.output_depth),
            white_balance: self.white_balance.unwrap_or(default.white_balance),
            verbose: self.verbose.unwrap_or(default.verbose),
        }
    }
}
