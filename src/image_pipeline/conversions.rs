//! Pipeline conversions module
//!
//! This module contains orchestration logic for RAF conversions.

mod raf_to_tiff;


pub use raf_to_tiff::{ConversionSummary, RafToTiffPipeline};
