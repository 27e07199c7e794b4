//! Demosaicing using nearest neighbour interpolation.
//!
//! Each missing channel is copied from the first pixel of the 3x3 window
//! (row by row, left to right) whose filter has that colour.

use rayon::prelude::*;
use tracing::warn;

use crate::image_pipeline::debayer::cfa::{CfaPattern, FilterColor};
use crate::image_pipeline::debayer::neighbourhood::window;
use crate::image_pipeline::debayer::rescale::Rescaler;
use crate::image_pipeline::debayer::types::{ALPHA, ChannelLayout, Raster};
use crate::image_pipeline::raw::Mosaic;

const COLORS: [FilterColor; 3] = [FilterColor::Red, FilterColor::Green, FilterColor::Blue];

/// Returns the raster and the number of channel values with no matching neighbour.
pub fn run(mosaic: &Mosaic, pattern: &CfaPattern, rescaler: Rescaler, verbose: bool) -> (Raster, usize) {
    let (w, h) = (mosaic.width, mosaic.height);
    let mut raster = Raster::new(w, h, ChannelLayout::Rgba, rescaler.depth());
    let opaque = rescaler.depth().max_value();
    let stride = raster.stride();

    let degraded: usize = raster
        .data
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(y, row)| {
            let mut degraded = 0;
            for x in 0..w {
                let px = &mut row[4 * x..4 * x + 4];
                let native = pattern.color(y, x);
                px[native.channel()] = rescaler.apply(mosaic.sample(x, y));
                px[ALPHA] = opaque;

                for target in COLORS.into_iter().filter(|&c| c != native) {
                    px[target.channel()] = match nearest(mosaic, pattern, x, y, target) {
                        Some(sample) => rescaler.apply(sample),
                        None => {
                            if verbose {
                                warn!(x, y, ?target, "No neighbour with a matching filter");
                            }
                            degraded += 1;
                            0
                        }
                    };
                }
            }
            degraded
        })
        .sum();

    (raster, degraded)
}

fn nearest(mosaic: &Mosaic, pattern: &CfaPattern, x: usize, y: usize, target: FilterColor) -> Option<u16> {
    window(x, y, mosaic.width, mosaic.height)
        .find(|&(nx, ny)| pattern.color(ny, nx) == target)
        .map(|(nx, ny)| mosaic.sample(nx, ny))
}
