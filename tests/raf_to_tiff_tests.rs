use std::io::Cursor;

use raf_develop_rs::image_pipeline::raw::BlockRange;
use raf_develop_rs::image_pipeline::{
    ContainerHeader, ConversionConfig, ConversionError, Demosaic, OutputDepth, RafToTiffPipeline,
    TiffCompression,
};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

const PREAMBLE: usize = 2048;

/// Baseline JPEG shell carrying an EXIF block with FocalLength = 230/10.
fn preview_jpeg() -> Vec<u8> {
    let mut t = b"MM".to_vec();
    t.extend_from_slice(&42u16.to_be_bytes());
    t.extend_from_slice(&8u32.to_be_bytes());
    // IFD0 at 8: the EXIF IFD pointer.
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&0x8769u16.to_be_bytes());
    t.extend_from_slice(&4u16.to_be_bytes());
    t.extend_from_slice(&1u32.to_be_bytes());
    t.extend_from_slice(&26u32.to_be_bytes());
    t.extend_from_slice(&0u32.to_be_bytes());
    // EXIF IFD at 26: FocalLength, value at 44.
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&0x920Au16.to_be_bytes());
    t.extend_from_slice(&5u16.to_be_bytes());
    t.extend_from_slice(&1u32.to_be_bytes());
    t.extend_from_slice(&44u32.to_be_bytes());
    t.extend_from_slice(&0u32.to_be_bytes());
    t.extend_from_slice(&230u32.to_be_bytes());
    t.extend_from_slice(&10u32.to_be_bytes());

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(&t);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// A complete RAF file: header, preview, one sensor-dimension record, mosaic.
fn synthetic_raf(width: u16, height: u16, sample: impl Fn(usize, usize) -> u16) -> Vec<u8> {
    let preview = preview_jpeg();

    let mut metadata = 1u32.to_be_bytes().to_vec();
    metadata.extend_from_slice(&0x100u16.to_be_bytes());
    metadata.extend_from_slice(&4u16.to_be_bytes());
    metadata.extend_from_slice(&height.to_be_bytes());
    metadata.extend_from_slice(&width.to_be_bytes());

    let mut mosaic = vec![0u8; PREAMBLE];
    for y in 0..height as usize {
        for x in 0..width as usize {
            mosaic.extend_from_slice(&sample(x, y).to_le_bytes());
        }
    }

    let preview_at = 108u32;
    let metadata_at = preview_at + preview.len() as u32;
    let mosaic_at = metadata_at + metadata.len() as u32;
    let header = ContainerHeader::new(
        "X-H1",
        BlockRange::new(preview_at, preview.len() as u32),
        BlockRange::new(metadata_at, metadata.len() as u32),
        BlockRange::new(mosaic_at, mosaic.len() as u32),
    );

    let mut file = header.to_bytes();
    file.extend_from_slice(&preview);
    file.extend_from_slice(&metadata);
    file.extend_from_slice(&mosaic);
    file
}

fn decode(tiff: Vec<u8>) -> ((u32, u32), ColorType, DecodingResult) {
    let mut decoder = Decoder::new(Cursor::new(tiff)).unwrap();
    let dims = decoder.dimensions().unwrap();
    let color = decoder.colortype().unwrap();
    (dims, color, decoder.read_image().unwrap())
}

#[test]
fn test_color_hue_develops_flat_frame() {
    let raf = synthetic_raf(12, 12, |_, _| 1000);
    let pipeline = RafToTiffPipeline::new(ConversionConfig::default());

    let mut output = Vec::new();
    let summary = pipeline.convert(&raf, &mut output).unwrap();
    assert_eq!(summary.camera, "X-H1");
    assert_eq!(summary.focal_length, Some(23));
    assert_eq!(summary.demosaic.degraded_samples, 0);

    let (dims, color, image) = decode(output);
    assert_eq!(dims, (12, 12));
    assert_eq!(color, ColorType::RGBA(16));
    match image {
        DecodingResult::U16(samples) => {
            assert_eq!(samples.len(), 12 * 12 * 4);
            for px in samples.chunks_exact(4) {
                assert_eq!(px, &[4000, 4000, 4000, u16::MAX]);
            }
        }
        _ => panic!("expected 16-bit samples"),
    }
}

#[test]
fn test_grayscale_with_compression() {
    let raf = synthetic_raf(8, 6, |x, y| (x * 1000 + y) as u16);
    for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::DeflateBalanced] {
        let config = ConversionConfig::builder()
            .demosaic(Demosaic::None)
            .compression(compression)
            .build();
        let pipeline = RafToTiffPipeline::new(config);

        let mut output = Vec::new();
        pipeline.convert(&raf, &mut output).unwrap();

        let (dims, color, image) = decode(output);
        assert_eq!(dims, (8, 6));
        assert_eq!(color, ColorType::Gray(16));
        match image {
            DecodingResult::U16(samples) => {
                assert_eq!(samples[0], 0);
                assert_eq!(samples[1], 4000);
                assert_eq!(samples[8 + 7], (7000 + 1) << 2);
            }
            _ => panic!("expected 16-bit samples for {compression:?}"),
        }
    }
}

#[test]
fn test_nearest_neighbour_eight_bit() {
    let raf = synthetic_raf(12, 12, |_, _| 1000);
    let config = ConversionConfig::builder()
        .demosaic(Demosaic::NearestNeighbour)
        .output_depth(OutputDepth::Depth8)
        .build();

    let mut output = Vec::new();
    RafToTiffPipeline::new(config).convert(&raf, &mut output).unwrap();

    let (_, color, image) = decode(output);
    assert_eq!(color, ColorType::RGBA(8));
    match image {
        // 1000 * 255 >> 14
        DecodingResult::U8(samples) => assert!(samples.chunks_exact(4).all(|px| px == [15, 15, 15, 255])),
        _ => panic!("expected 8-bit samples"),
    }
}

#[test]
fn test_truncated_files_fail() {
    let raf = synthetic_raf(12, 12, |_, _| 1000);
    let pipeline = RafToTiffPipeline::new(ConversionConfig::default());

    let result = pipeline.convert(&raf[..60], &mut Vec::new());
    assert!(matches!(result, Err(ConversionError::Format(_))));

    // Header intact, mosaic block cut short.
    let result = pipeline.convert(&raf[..raf.len() - 10], &mut Vec::new());
    assert!(matches!(result, Err(ConversionError::Io(_))));
}

#[test]
fn test_undersized_mosaic_is_format_error() {
    // Metadata claims 12x12, mosaic block holds 12x11.
    let mut raf = synthetic_raf(12, 12, |_, _| 1000);
    let mosaic_length_at = 104;
    let length = u32::from_be_bytes(raf[mosaic_length_at..mosaic_length_at + 4].try_into().unwrap());
    raf[mosaic_length_at..mosaic_length_at + 4].copy_from_slice(&(length - 24).to_be_bytes());

    let pipeline = RafToTiffPipeline::new(ConversionConfig::default());
    let result = pipeline.convert(&raf, &mut Vec::new());
    assert!(matches!(result, Err(ConversionError::Format(_))));
}

#[test]
fn test_convert_file_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("DSCF0001.RAF");
    let output = dir.path().join("DSCF0001.tiff");
    let preview = dir.path().join("DSCF0001.jpg");
    std::fs::write(&input, synthetic_raf(12, 12, |_, _| 1000)).unwrap();

    let pipeline = RafToTiffPipeline::new(ConversionConfig::builder().white_balance(true).build());
    let written = pipeline.extract_preview_file(&input, &preview).unwrap();
    assert_eq!(std::fs::read(&preview).unwrap(), preview_jpeg());
    assert_eq!(written, preview_jpeg().len());

    let summary = pipeline.convert_file(&input, &output).unwrap();
    // A flat frame has nothing to stretch.
    assert!(!summary.white_balanced);
    let (dims, _, _) = decode(std::fs::read(&output).unwrap());
    assert_eq!(dims, (12, 12));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.tiff");
    let pipeline = RafToTiffPipeline::new(ConversionConfig::default());

    let result = pipeline.convert_file(dir.path().join("missing.RAF"), &output);
    assert!(matches!(result, Err(ConversionError::InputReadError(_))));
    assert!(!output.exists());
}
