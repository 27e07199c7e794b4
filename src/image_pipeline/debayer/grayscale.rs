//! Grayscale output: rescaled sensor values, no colour reconstruction.

use rayon::prelude::*;

use crate::image_pipeline::debayer::rescale::Rescaler;
use crate::image_pipeline::debayer::types::{ChannelLayout, Raster};
use crate::image_pipeline::raw::Mosaic;

pub fn run(mosaic: &Mosaic, rescaler: Rescaler) -> Raster {
    let mut raster = Raster::new(mosaic.width, mosaic.height, ChannelLayout::Gray, rescaler.depth());
    let width = mosaic.width;

    raster
        .data
        .par_chunks_mut(width)
        .zip(mosaic.data.par_chunks(width))
        .for_each(|(dst, src)| {
            for (out, &sample) in dst.iter_mut().zip(src) {
                *out = rescaler.apply(sample);
            }
        });

    raster
}
