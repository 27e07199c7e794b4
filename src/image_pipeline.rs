//! Image processing pipeline module
//!
//! This module provides a structured approach to developing RAF files, with
//! separate modules for container reading, demosaicing, normalization, preview
//! metadata, TIFF writing and conversion orchestration.

pub mod raw;
pub mod debayer;
pub mod normalize;
pub mod sink;
pub mod exif;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    ContainerHeader,
    Metadata,
    Mosaic,
    RafImage,
    RafReader,
    RawImageReader,
};

pub use debayer::{
    CpuDebayer,
    Demosaic,
    DemosaicReport,
    OutputDepth,
    Raster,
};

pub use sink::{
    PixelSource,
    RasterImage,
};

pub use exif::{
    ExifTags,
    JpegExifDecoder,
    PreviewMetadataDecoder,
};

pub use tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    ConversionSummary,
    RafToTiffPipeline,
};
