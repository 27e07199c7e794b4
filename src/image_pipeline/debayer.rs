//! Demosaicing module for reconstructing RGB images from X-Trans RAW mosaics

pub mod cfa;
mod color_hue;
pub mod cpu_debayer;
mod grayscale;
mod nearest_neighbour;
mod neighbourhood;
pub mod rescale;
pub mod types;

pub use cfa::{CfaPattern, FilterColor};
pub use cpu_debayer::CpuDebayer;
pub use rescale::Rescaler;
pub use types::{
    ChannelLayout, Demosaic, DemosaicReport, DemosaicSettings, OutputDepth, Raster,
};
