//! Develop Fujifilm RAF (X-Trans) RAW files into TIFF images.

pub mod image_pipeline;
pub mod logger;
