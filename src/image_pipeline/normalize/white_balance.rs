//! Per-channel histogram stretch.
//!
//! Not an illuminant-aware white balance: each colour channel is stretched on
//! its own, so the hue balance can shift. The observed non-zero range
//! `[min, max]` is cut into 16 equal buckets and each bucket is mapped
//! linearly onto one 4096-wide sixteenth of the 16-bit range.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::debayer::types::{ALPHA, BLUE, ChannelLayout, GREEN, OutputDepth, RED, Raster};

pub const BUCKETS: u32 = 16;
pub const BUCKET_SPAN: u32 = 1 << 12;

/// Stretch parameters for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramStretch {
    pub min: u16,
    pub max: u16,
    pub bucket_width: u32,
}

impl HistogramStretch {
    /// Observes one channel; `None` when it holds no non-zero sample.
    pub fn observe(samples: impl Iterator<Item = u16>) -> Option<Self> {
        let (min, max) = samples
            .filter(|&s| s != 0)
            .fold(None, |range: Option<(u16, u16)>, s| match range {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })?;
        Some(Self {
            min,
            max,
            bucket_width: (max - min) as u32 / BUCKETS,
        })
    }

    /// Flat or nearly flat channels have no bucket width to stretch over.
    pub fn is_degenerate(&self) -> bool {
        self.bucket_width == 0
    }

    #[inline]
    pub fn apply(&self, sample: u16) -> u16 {
        if sample == 0 || self.is_degenerate() {
            return sample;
        }
        let offset = sample.saturating_sub(self.min) as u32;
        let bucket = (offset / self.bucket_width).min(BUCKETS - 1);
        let within = offset - bucket * self.bucket_width;
        let fraction = (within * BUCKET_SPAN / self.bucket_width).min(BUCKET_SPAN - 1);
        (bucket * BUCKET_SPAN + fraction) as u16
    }
}

/// Stretches every colour channel of `raster` in place; opacity is left alone.
///
/// Returns whether anything was stretched. When something was, the raster is
/// 16-bit afterwards and 8-bit channels that were left flat are widened with it.
pub fn stretch_channels(raster: &mut Raster) -> bool {
    let channels: &[usize] = match raster.layout {
        ChannelLayout::Gray => &[0],
        ChannelLayout::Rgba => &[RED, GREEN, BLUE],
    };
    let step = raster.layout.channels();

    let stretches: Vec<Option<HistogramStretch>> = channels
        .iter()
        .map(|&channel| {
            let stretch = HistogramStretch::observe(raster.data.iter().skip(channel).step_by(step).copied())
                .filter(|s| !s.is_degenerate());
            match stretch {
                Some(s) => debug!(channel, min = s.min, max = s.max, bucket_width = s.bucket_width, "Stretching channel"),
                None => debug!(channel, "Channel is flat, left unchanged"),
            }
            stretch
        })
        .collect();

    if stretches.iter().all(Option::is_none) {
        return false;
    }

    // 8-bit samples that are not stretched scale by 257 to keep their level.
    let widen = raster.depth == OutputDepth::Depth8;
    let widen_factor = u16::MAX / u8::MAX as u16;

    raster.data.par_chunks_mut(step).for_each(|px| {
        for (&channel, stretch) in channels.iter().zip(&stretches) {
            px[channel] = match stretch {
                Some(stretch) => stretch.apply(px[channel]),
                None if widen => px[channel] * widen_factor,
                None => px[channel],
            };
        }
        if widen && step == 4 {
            px[ALPHA] *= widen_factor;
        }
    });

    raster.depth = OutputDepth::Depth16;
    true
}
