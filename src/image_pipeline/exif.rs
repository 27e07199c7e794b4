//! Preview metadata decoding
//!
//! The embedded JPEG preview carries the camera's EXIF block, read here with
//! `kamadak-exif`. The pipeline only needs the focal length out of it.

mod decoder;
pub mod types;

pub use decoder::{JpegExifDecoder, PreviewMetadataDecoder};
pub use types::ExifTags;
