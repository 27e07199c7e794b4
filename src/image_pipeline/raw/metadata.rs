//! Tagged metadata records of the RAF "CFA header" block.
//!
//! The block is a big-endian record count followed by that many
//! `{tag: u16, size: u16, payload}` records. Only the geometry and raw-info
//! tags are decoded; anything else is skipped by its declared size.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Values at or above this in the RAF-data payload are not dimensions.
const RAF_DATA_DIMENSION_LIMIT: u32 = 10_000;

/// Recognized record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagId {
    SensorDimensions,
    CropOrigin,
    FullDimensions,
    OutputDimensions,
    RawInfo,
    RafData,
}

impl TagId {
    pub fn from_u16(tag: u16) -> Option<Self> {
        match tag {
            0x100 => Some(TagId::SensorDimensions),
            0x110 => Some(TagId::CropOrigin),
            0x111 => Some(TagId::FullDimensions),
            0x121 => Some(TagId::OutputDimensions),
            0x130 => Some(TagId::RawInfo),
            0xc000 => Some(TagId::RafData),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            TagId::SensorDimensions => 0x100,
            TagId::CropOrigin => 0x110,
            TagId::FullDimensions => 0x111,
            TagId::OutputDimensions => 0x121,
            TagId::RawInfo => 0x130,
            TagId::RafData => 0xc000,
        }
    }
}

/// A `(height, width)` pair, or `(top, left)` for the crop origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub height: u16,
    pub width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataRecord {
    SensorDimensions(Dimensions),
    CropOrigin(Dimensions),
    FullDimensions(Dimensions),
    OutputDimensions(Dimensions),
    /// Reduced raw-info word; non-zero means the mosaic is compressed.
    RawFlags { compressed: u32 },
    RafData { width: u32, height: u32 },
}

impl MetadataRecord {
    pub fn tag(&self) -> TagId {
        match self {
            MetadataRecord::SensorDimensions(_) => TagId::SensorDimensions,
            MetadataRecord::CropOrigin(_) => TagId::CropOrigin,
            MetadataRecord::FullDimensions(_) => TagId::FullDimensions,
            MetadataRecord::OutputDimensions(_) => TagId::OutputDimensions,
            MetadataRecord::RawFlags { .. } => TagId::RawInfo,
            MetadataRecord::RafData { .. } => TagId::RafData,
        }
    }

    fn decode(tag: TagId, payload: &[u8]) -> Result<Self> {
        let record = match tag {
            TagId::SensorDimensions => MetadataRecord::SensorDimensions(dimensions(tag, payload)?),
            TagId::CropOrigin => MetadataRecord::CropOrigin(dimensions(tag, payload)?),
            TagId::FullDimensions => MetadataRecord::FullDimensions(dimensions(tag, payload)?),
            TagId::OutputDimensions => MetadataRecord::OutputDimensions(dimensions(tag, payload)?),
            TagId::RawInfo => {
                require_len(tag, payload, 4)?;
                let raw_props = BigEndian::read_u32(payload);
                MetadataRecord::RawFlags {
                    compressed: ((raw_props & 0xFF0000) >> 16) & 8,
                }
            }
            TagId::RafData => {
                let (width, height) = raf_data_geometry(payload)?;
                MetadataRecord::RafData { width, height }
            }
        };
        Ok(record)
    }
}

fn require_len(tag: TagId, payload: &[u8], len: usize) -> Result<()> {
    if payload.len() < len {
        return Err(ConversionError::format(format!(
            "tag {:#x} payload is {} bytes, expected at least {}",
            tag.as_u16(),
            payload.len(),
            len
        )));
    }
    Ok(())
}

fn dimensions(tag: TagId, payload: &[u8]) -> Result<Dimensions> {
    require_len(tag, payload, 4)?;
    Ok(Dimensions {
        height: BigEndian::read_u16(&payload[..2]),
        width: BigEndian::read_u16(&payload[2..4]),
    })
}

/// Scans little-endian words for the first plausible width; the height follows it.
fn raf_data_geometry(payload: &[u8]) -> Result<(u32, u32)> {
    let mut words = payload.chunks_exact(4).map(LittleEndian::read_u32);
    let width = words
        .find(|&w| w < RAF_DATA_DIMENSION_LIMIT)
        .ok_or_else(|| ConversionError::format("RAF data record holds no width"))?;
    let height = words
        .next()
        .ok_or_else(|| ConversionError::format("RAF data record holds no height"))?;
    Ok((width, height))
}

/// Decoded contents of the metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Record count as declared by the block, including skipped records.
    pub declared_records: u32,
    pub records: Vec<MetadataRecord>,
}

impl Metadata {
    pub fn parse(block: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(block);
        let declared_records = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| ConversionError::format("metadata block is missing its record count"))?;

        let mut records = Vec::new();
        for index in 0..declared_records {
            let (tag, size) = match (cursor.read_u16::<BigEndian>(), cursor.read_u16::<BigEndian>()) {
                (Ok(tag), Ok(size)) => (tag, size),
                _ => {
                    return Err(ConversionError::format(format!(
                        "metadata record {index} of {declared_records} is truncated"
                    )));
                }
            };

            let remaining = block.len() - cursor.position() as usize;
            if size as usize > remaining {
                return Err(ConversionError::format(format!(
                    "metadata record {index} (tag {tag:#x}) declares {size} bytes, only {remaining} remain"
                )));
            }

            let mut payload = vec![0u8; size as usize];
            cursor.read_exact(&mut payload)?;

            match TagId::from_u16(tag) {
                Some(id) => {
                    let record = MetadataRecord::decode(id, &payload)?;
                    trace!(?record, "Decoded metadata record");
                    records.push(record);
                }
                None => trace!(tag, size, "Skipping metadata record"),
            }
        }

        debug!(declared_records, decoded = records.len(), "Parsed metadata block");
        Ok(Self { declared_records, records })
    }

    fn find_dimensions(&self, tag: TagId) -> Option<Dimensions> {
        self.records.iter().find_map(|record| match record {
            MetadataRecord::SensorDimensions(d)
            | MetadataRecord::CropOrigin(d)
            | MetadataRecord::FullDimensions(d)
            | MetadataRecord::OutputDimensions(d)
                if record.tag() == tag =>
            {
                Some(*d)
            }
            _ => None,
        })
    }

    pub fn sensor_dimensions(&self) -> Option<Dimensions> {
        self.find_dimensions(TagId::SensorDimensions)
    }

    pub fn crop_origin(&self) -> Option<Dimensions> {
        self.find_dimensions(TagId::CropOrigin)
    }

    pub fn full_dimensions(&self) -> Option<Dimensions> {
        self.find_dimensions(TagId::FullDimensions)
    }

    pub fn output_dimensions(&self) -> Option<Dimensions> {
        self.find_dimensions(TagId::OutputDimensions)
    }

    /// `(width, height)` from the RAF data record.
    pub fn raf_geometry(&self) -> Option<(u32, u32)> {
        self.records.iter().find_map(|record| match record {
            MetadataRecord::RafData { width, height } => Some((*width, *height)),
            _ => None,
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.records
            .iter()
            .any(|record| matches!(record, MetadataRecord::RawFlags { compressed } if *compressed != 0))
    }
}
