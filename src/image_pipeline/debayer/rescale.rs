//! Sensor to output bit-depth rescaling.

use crate::image_pipeline::debayer::types::OutputDepth;

/// Linear, truncating map from `sensor_bits`-bit samples to the output depth.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rescaler {
    sensor_bits: u32,
    depth: OutputDepth,
}

impl Rescaler {
    /// `sensor_bits` must be in `1..=16`; the mosaic validates this.
    pub fn new(sensor_bits: u32, depth: OutputDepth) -> Self {
        debug_assert!((1..=16).contains(&sensor_bits));
        Self { sensor_bits, depth }
    }

    pub fn depth(&self) -> OutputDepth {
        self.depth
    }

    #[inline]
    pub fn apply(&self, sample: u16) -> u16 {
        let scaled = match self.depth {
            // floor(sample / 2^N * 255)
            OutputDepth::Depth8 => (sample as u32 * 255) >> self.sensor_bits,
            OutputDepth::Depth16 => (sample as u32) << (16 - self.sensor_bits),
        };
        scaled.min(self.depth.max_value() as u32) as u16
    }
}
