use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::cfa::CfaPattern;
use crate::image_pipeline::debayer::rescale::Rescaler;
use crate::image_pipeline::debayer::types::{Demosaic, DemosaicReport, DemosaicSettings, Raster};
use crate::image_pipeline::debayer::{color_hue, grayscale, nearest_neighbour};
use crate::image_pipeline::raw::Mosaic;

/// Runs the selected reconstruction over an X-Trans mosaic on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuDebayer {
    pattern: CfaPattern,
}

impl CpuDebayer {
    pub fn new() -> Self {
        Self::with_pattern(CfaPattern::XTRANS)
    }

    pub fn with_pattern(pattern: CfaPattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &CfaPattern {
        &self.pattern
    }

    pub fn process(&self, mosaic: &Mosaic, settings: &DemosaicSettings) -> Result<(Raster, DemosaicReport)> {
        let (width, height) = (mosaic.width, mosaic.height);
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        mosaic.validate()?;

        info!(
            "Starting {} demosaic for image {}x{} ({}-bit sensor, {}-bit output)",
            settings.algorithm,
            width,
            height,
            mosaic.bits_per_sample,
            settings.output_depth.bits()
        );

        let rescaler = Rescaler::new(mosaic.bits_per_sample, settings.output_depth);
        let (raster, degraded_samples) = match settings.algorithm {
            Demosaic::None => (grayscale::run(mosaic, rescaler), 0),
            Demosaic::NearestNeighbour => {
                nearest_neighbour::run(mosaic, &self.pattern, rescaler, settings.verbose)
            }
            Demosaic::ColorHue => color_hue::run(mosaic, &self.pattern, rescaler, settings.verbose)?,
        };

        debug!(degraded_samples, "Demosaic finished");

        Ok((
            raster,
            DemosaicReport {
                algorithm: settings.algorithm,
                degraded_samples,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::debayer::types::{ChannelLayout, OutputDepth};

    fn settings(algorithm: Demosaic) -> DemosaicSettings {
        DemosaicSettings {
            algorithm,
            output_depth: OutputDepth::Depth8,
            verbose: false,
        }
    }

    #[test]
    fn test_short_mosaic_fails_before_any_pass() {
        let mosaic = Mosaic {
            width: 12,
            height: 12,
            bits_per_sample: 14,
            data: vec![0; 143],
        };
        for algo in [Demosaic::None, Demosaic::NearestNeighbour, Demosaic::ColorHue] {
            let result = CpuDebayer::new().process(&mosaic, &settings(algo));
            assert!(matches!(result, Err(ConversionError::Format(_))));
        }
    }

    #[test]
    fn test_empty_mosaic_is_invalid() {
        let mosaic = Mosaic {
            width: 0,
            height: 4,
            bits_per_sample: 14,
            data: vec![],
        };
        let result = CpuDebayer::new().process(&mosaic, &settings(Demosaic::None));
        assert!(matches!(result, Err(ConversionError::InvalidDimensions(0, 4))));
    }

    #[test]
    fn test_layout_per_algorithm() {
        let mosaic = Mosaic::new(6, 6, 14, vec![4096; 36]).unwrap();
        let debayer = CpuDebayer::new();

        let (gray, report) = debayer.process(&mosaic, &settings(Demosaic::None)).unwrap();
        assert_eq!(gray.layout, ChannelLayout::Gray);
        assert_eq!(gray.data, vec![63; 36]);
        assert_eq!(report.algorithm, Demosaic::None);

        let (nn, _) = debayer.process(&mosaic, &settings(Demosaic::NearestNeighbour)).unwrap();
        assert_eq!(nn.layout, ChannelLayout::Rgba);
        assert_eq!(nn.depth, OutputDepth::Depth8);

        let (hue, report) = debayer.process(&mosaic, &settings(Demosaic::ColorHue)).unwrap();
        assert_eq!(hue.layout, ChannelLayout::Rgba);
        assert_eq!(report.degraded_samples, 0);
    }
}
