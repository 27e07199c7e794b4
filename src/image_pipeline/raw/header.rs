//! Fixed-layout RAF file header.
//!
//! Every RAF file opens with a 108-byte big-endian header naming the camera
//! and locating the three payload blocks: the embedded JPEG preview, the
//! tagged metadata block and the raw sensor mosaic.

use std::fmt;
use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};
use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Size in bytes of the fixed header.
pub const HEADER_LEN: usize = 16 + 4 + 8 + 32 + 4 + 20 + 6 * 4;

/// Magic every Fujifilm RAF file starts with.
pub const RAF_MAGIC: &[u8; 16] = b"FUJIFILMCCD-RAW ";

/// A byte range inside the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRange {
    pub offset: u32,
    pub length: u32,
}

impl BlockRange {
    pub fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Borrows the range out of `data`.
    ///
    /// A range running past the end of `data` is reported as an
    /// `UnexpectedEof` I/O error, the same failure a positioned read would give.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        let end = start
            .checked_add(self.length as usize)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "block {}..{} exceeds file length {}",
                        self.offset,
                        self.offset as u64 + self.length as u64,
                        data.len()
                    ),
                )
            })?;
        Ok(&data[start..end])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 16],
    pub format_version: [u8; 4],
    pub camera_serial: [u8; 8],
    pub camera_name: [u8; 32],
    pub firmware_version: [u8; 4],
    pub reserved: [u8; 20],
    pub preview: BlockRange,
    pub metadata: BlockRange,
    pub mosaic: BlockRange,
}

impl ContainerHeader {
    /// A version 0201 header for `camera_name`, other text fields zeroed.
    pub fn new(camera_name: &str, preview: BlockRange, metadata: BlockRange, mosaic: BlockRange) -> Self {
        let mut name = [0u8; 32];
        let len = camera_name.len().min(name.len());
        name[..len].copy_from_slice(&camera_name.as_bytes()[..len]);
        Self {
            magic: *RAF_MAGIC,
            format_version: *b"0201",
            camera_serial: [0; 8],
            camera_name: name,
            firmware_version: [0; 4],
            reserved: [0; 20],
            preview,
            metadata,
            mosaic,
        }
    }

    /// Reads the header from a source positioned at the start of the file.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ConversionError::format(format!(
                "file is shorter than the {HEADER_LEN}-byte header"
            )),
            _ => ConversionError::Io(e),
        })?;
        Ok(Self::parse(&buf))
    }

    fn parse(buf: &[u8; HEADER_LEN]) -> Self {
        let mut header = ContainerHeader {
            magic: [0; 16],
            format_version: [0; 4],
            camera_serial: [0; 8],
            camera_name: [0; 32],
            firmware_version: [0; 4],
            reserved: [0; 20],
            preview: BlockRange::default(),
            metadata: BlockRange::default(),
            mosaic: BlockRange::default(),
        };

        let mut pos = 0;
        for field in [
            &mut header.magic[..],
            &mut header.format_version[..],
            &mut header.camera_serial[..],
            &mut header.camera_name[..],
            &mut header.firmware_version[..],
            &mut header.reserved[..],
        ] {
            let len = field.len();
            field.copy_from_slice(&buf[pos..pos + len]);
            pos += len;
        }

        let mut offsets = [0u32; 6];
        BigEndian::read_u32_into(&buf[pos..], &mut offsets);
        header.preview = BlockRange::new(offsets[0], offsets[1]);
        header.metadata = BlockRange::new(offsets[2], offsets[3]);
        header.mosaic = BlockRange::new(offsets[4], offsets[5]);

        if &header.magic != RAF_MAGIC {
            warn!(magic = %String::from_utf8_lossy(&header.magic), "Unexpected RAF magic");
        }

        header
    }

    /// Encodes the header back into its on-disk form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.format_version);
        out.extend_from_slice(&self.camera_serial);
        out.extend_from_slice(&self.camera_name);
        out.extend_from_slice(&self.firmware_version);
        out.extend_from_slice(&self.reserved);
        for range in [self.preview, self.metadata, self.mosaic] {
            out.extend_from_slice(&range.offset.to_be_bytes());
            out.extend_from_slice(&range.length.to_be_bytes());
        }
        out
    }

    pub fn camera_name(&self) -> String {
        text_field(&self.camera_name)
    }
}

fn text_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

impl fmt::Display for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Magic: {}", text_field(&self.magic))?;
        writeln!(f, "Format Version: {}", text_field(&self.format_version))?;
        writeln!(f, "Camera Serial: {}", text_field(&self.camera_serial))?;
        writeln!(f, "Camera Name: {}", self.camera_name())?;
        writeln!(f, "Firmware Version: {}", text_field(&self.firmware_version))?;
        writeln!(f, "Preview: offset={} length={}", self.preview.offset, self.preview.length)?;
        writeln!(f, "Metadata: offset={} length={}", self.metadata.offset, self.metadata.length)?;
        write!(f, "Mosaic: offset={} length={}", self.mosaic.offset, self.mosaic.length)
    }
}
