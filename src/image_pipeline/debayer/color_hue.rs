//! Demosaicing by green interpolation followed by chroma-ratio fill.
//!
//! Three passes, each finished over the whole raster before the next starts:
//!
//! 1. seed: every pixel gets its own filter channel from the sensor,
//! 2. green: non-green pixels take the mean of their green neighbours,
//! 3. chroma: missing red/blue is `mean(neighbour.c / neighbour.g) * self.g`
//!    over neighbours whose filter is `c`, each quotient truncated to an integer.
//!
//! Each pass computes into a scratch buffer from a read-only view of the
//! previous pass, then writes the results back.

use rayon::prelude::*;
use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::cfa::{CfaPattern, FilterColor};
use crate::image_pipeline::debayer::neighbourhood::neighbours;
use crate::image_pipeline::debayer::rescale::Rescaler;
use crate::image_pipeline::debayer::types::{ALPHA, BLUE, ChannelLayout, GREEN, RED, Raster};
use crate::image_pipeline::raw::Mosaic;

/// Returns the raster and the number of channel values with no usable neighbour.
pub fn run(mosaic: &Mosaic, pattern: &CfaPattern, rescaler: Rescaler, verbose: bool) -> Result<(Raster, usize)> {
    let mut raster = seed(mosaic, pattern, rescaler);
    fill_green(&mut raster, pattern)?;
    let degraded = fill_chroma(&mut raster, pattern, verbose);
    Ok((raster, degraded))
}

fn seed(mosaic: &Mosaic, pattern: &CfaPattern, rescaler: Rescaler) -> Raster {
    let mut raster = Raster::new(mosaic.width, mosaic.height, ChannelLayout::Rgba, rescaler.depth());
    let opaque = rescaler.depth().max_value();
    let stride = raster.stride();

    raster
        .data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                px[pattern.color(y, x).channel()] = rescaler.apply(mosaic.sample(x, y));
                px[ALPHA] = opaque;
            }
        });

    raster
}

fn fill_green(raster: &mut Raster, pattern: &CfaPattern) -> Result<()> {
    let (w, stride) = (raster.width, raster.stride());
    let mut greens = vec![0u16; raster.width * raster.height];

    {
        let seeded = &*raster;
        greens
            .par_chunks_mut(w)
            .enumerate()
            .try_for_each(|(y, out)| -> Result<()> {
                for (x, green) in out.iter_mut().enumerate() {
                    if pattern.color(y, x) != FilterColor::Green {
                        *green = green_mean(seeded, pattern, x, y)?;
                    }
                }
                Ok(())
            })?;
    }

    raster
        .data
        .par_chunks_mut(stride)
        .zip(greens.par_chunks(w))
        .enumerate()
        .for_each(|(y, (row, greens))| {
            for (x, (px, &green)) in row.chunks_exact_mut(4).zip(greens).enumerate() {
                if pattern.color(y, x) != FilterColor::Green {
                    px[GREEN] = green;
                }
            }
        });

    Ok(())
}

fn green_mean(raster: &Raster, pattern: &CfaPattern, x: usize, y: usize) -> Result<u16> {
    let mut acc: u64 = 0;
    let mut count: u64 = 0;

    for (nx, ny) in neighbours(x, y, raster.width, raster.height) {
        if pattern.color(ny, nx) == FilterColor::Green {
            acc += raster.pixel(nx, ny)[GREEN] as u64;
            count += 1;
        }
    }

    if count == 0 {
        return Err(ConversionError::format(format!(
            "pixel ({x}, {y}) has no green neighbour; the CFA pattern does not fit the mosaic"
        )));
    }
    Ok((acc / count) as u16)
}

fn fill_chroma(raster: &mut Raster, pattern: &CfaPattern, verbose: bool) -> usize {
    let (w, stride) = (raster.width, raster.stride());
    let mut fills = vec![[0u16; 2]; raster.width * raster.height];

    let degraded: usize = {
        let filled = &*raster;
        fills
            .par_chunks_mut(w)
            .enumerate()
            .map(|(y, out)| {
                let mut degraded = 0;
                let mut estimate = |x: usize, target: FilterColor| {
                    ratio_estimate(filled, pattern, x, y, target).unwrap_or_else(|| {
                        if verbose {
                            warn!(x, y, ?target, "No neighbour to take a chroma ratio from");
                        }
                        degraded += 1;
                        0
                    })
                };

                for (x, fill) in out.iter_mut().enumerate() {
                    match pattern.color(y, x) {
                        FilterColor::Blue => fill[0] = estimate(x, FilterColor::Red),
                        FilterColor::Red => fill[1] = estimate(x, FilterColor::Blue),
                        FilterColor::Green => {
                            fill[0] = estimate(x, FilterColor::Red);
                            fill[1] = estimate(x, FilterColor::Blue);
                        }
                    }
                }
                degraded
            })
            .sum()
    };

    raster
        .data
        .par_chunks_mut(stride)
        .zip(fills.par_chunks(w))
        .enumerate()
        .for_each(|(y, (row, fills))| {
            for (x, (px, &[red, blue])) in row.chunks_exact_mut(4).zip(fills).enumerate() {
                match pattern.color(y, x) {
                    FilterColor::Blue => px[RED] = red,
                    FilterColor::Red => px[BLUE] = blue,
                    FilterColor::Green => {
                        px[RED] = red;
                        px[BLUE] = blue;
                    }
                }
            }
        });

    degraded
}

/// `None` when no `target` neighbour has a non-zero green to divide by.
fn ratio_estimate(raster: &Raster, pattern: &CfaPattern, x: usize, y: usize, target: FilterColor) -> Option<u16> {
    let mut acc: u64 = 0;
    let mut count: u64 = 0;

    for (nx, ny) in neighbours(x, y, raster.width, raster.height) {
        if pattern.color(ny, nx) != target {
            continue;
        }
        let px = raster.pixel(nx, ny);
        if px[GREEN] != 0 {
            // Whole ratios only: the quotient truncates before averaging.
            acc += (px[target.channel()] / px[GREEN]) as u64;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let green = raster.pixel(x, y)[GREEN] as f64;
    let max = raster.depth.max_value() as f64;
    Some((acc as f64 / count as f64 * green).min(max) as u16)
}
