//! RAF container reading module
//!
//! This module parses the RAF container: the fixed header, the tagged
//! metadata block and the raw sensor mosaic.

pub mod header;
pub mod metadata;
pub mod mosaic;
mod reader;
mod raf_reader;
pub mod types;

pub use header::{BlockRange, ContainerHeader};
pub use metadata::{Dimensions, Metadata, MetadataRecord, TagId};
pub use reader::RawImageReader;
pub use raf_reader::{RafReader, DEFAULT_SENSOR_BITS};
pub use types::{Mosaic, RafImage};
