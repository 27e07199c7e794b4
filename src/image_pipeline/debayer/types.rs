//! Types for demosaicing operations

use std::fmt;
use std::str::FromStr;

/// The demosaicing algorithm to use to fill in the missing data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Demosaic {
    /// No reconstruction: rescaled sensor values as grayscale.
    None,
    NearestNeighbour,
    /// Green mean followed by chroma-ratio fill.
    #[default]
    ColorHue,
}

impl FromStr for Demosaic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Demosaic::None),
            "nearest_neighbor" | "nearest_neighbour" => Ok(Demosaic::NearestNeighbour),
            "color_hue" => Ok(Demosaic::ColorHue),
            other => Err(format!("unknown demosaic algorithm '{other}'")),
        }
    }
}

impl fmt::Display for Demosaic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Demosaic::None => "none",
            Demosaic::NearestNeighbour => "nearest_neighbor",
            Demosaic::ColorHue => "color_hue",
        })
    }
}

/// Depth of the output raster.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputDepth {
    Depth8,
    #[default]
    Depth16,
}

impl OutputDepth {
    pub fn bits(self) -> u32 {
        match self {
            OutputDepth::Depth8 => 8,
            OutputDepth::Depth16 => 16,
        }
    }

    /// Largest sample value, also used as full opacity.
    pub fn max_value(self) -> u16 {
        match self {
            OutputDepth::Depth8 => u8::MAX as u16,
            OutputDepth::Depth16 => u16::MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelLayout {
    Gray,
    /// Interleaved R, G, B, opacity.
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgba => 4,
        }
    }
}

pub const RED: usize = 0;
pub const GREEN: usize = 1;
pub const BLUE: usize = 2;
pub const ALPHA: usize = 3;

/// Reconstructed image, interleaved per `layout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub layout: ChannelLayout,
    pub depth: OutputDepth,
    pub data: Vec<u16>,
}

impl Raster {
    pub fn new(width: usize, height: usize, layout: ChannelLayout, depth: OutputDepth) -> Self {
        Self {
            width,
            height,
            layout,
            depth,
            data: vec![0; width * height * layout.channels()],
        }
    }

    /// Number of samples in one row.
    pub fn stride(&self) -> usize {
        self.width * self.layout.channels()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u16] {
        let channels = self.layout.channels();
        let start = (y * self.width + x) * channels;
        &self.data[start..start + channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u16] {
        let channels = self.layout.channels();
        let start = (y * self.width + x) * channels;
        &mut self.data[start..start + channels]
    }
}

/// Settings threaded into the engine for one decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemosaicSettings {
    pub algorithm: Demosaic,
    pub output_depth: OutputDepth,
    /// Log every degraded pixel instead of only the total.
    pub verbose: bool,
}

/// Outcome of one reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemosaicReport {
    pub algorithm: Demosaic,
    /// Channel values that fell back to zero for lack of a usable neighbour.
    pub degraded_samples: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demosaic_from_str() {
        assert_eq!("none".parse::<Demosaic>(), Ok(Demosaic::None));
        assert_eq!("nearest_neighbor".parse::<Demosaic>(), Ok(Demosaic::NearestNeighbour));
        assert_eq!("color_hue".parse::<Demosaic>(), Ok(Demosaic::ColorHue));
        assert!("bilinear".parse::<Demosaic>().is_err());

        for algo in [Demosaic::None, Demosaic::NearestNeighbour, Demosaic::ColorHue] {
            assert_eq!(algo.to_string().parse::<Demosaic>(), Ok(algo));
        }
    }

    #[test]
    fn test_raster_pixel_access() {
        let mut raster = Raster::new(3, 2, ChannelLayout::Rgba, OutputDepth::Depth16);
        assert_eq!(raster.stride(), 12);
        raster.pixel_mut(2, 1)[BLUE] = 7;
        assert_eq!(raster.data[(1 * 3 + 2) * 4 + BLUE], 7);
        assert_eq!(raster.pixel(2, 1), &[0, 0, 7, 0]);
    }
}
