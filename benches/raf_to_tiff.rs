use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raf_develop_rs::image_pipeline::raw::BlockRange;
use raf_develop_rs::image_pipeline::{
    ContainerHeader, ConversionConfig, Demosaic, OutputDepth, RafToTiffPipeline, TiffCompression,
};
use std::io::Cursor;

const PREAMBLE: usize = 2048;

/// RAF file with a gradient mosaic and a sensor-dimension record.
fn generate_mock_raf(width: usize, height: usize) -> Vec<u8> {
    let mut metadata = 1u32.to_be_bytes().to_vec();
    metadata.extend_from_slice(&0x100u16.to_be_bytes());
    metadata.extend_from_slice(&4u16.to_be_bytes());
    metadata.extend_from_slice(&(height as u16).to_be_bytes());
    metadata.extend_from_slice(&(width as u16).to_be_bytes());

    let mut mosaic = vec![0u8; PREAMBLE];
    for y in 0..height {
        for x in 0..width {
            let value = (((x + y) * 37) % 16384) as u16;
            mosaic.extend_from_slice(&value.to_le_bytes());
        }
    }

    let metadata_at = 108u32;
    let mosaic_at = metadata_at + metadata.len() as u32;
    let header = ContainerHeader::new(
        "X-H1",
        BlockRange::new(108, 0),
        BlockRange::new(metadata_at, metadata.len() as u32),
        BlockRange::new(mosaic_at, mosaic.len() as u32),
    );

    let mut data = header.to_bytes();
    data.extend_from_slice(&metadata);
    data.extend_from_slice(&mosaic);
    data
}

fn benchmark_conversion_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion_by_size");

    let sizes = vec![
        (96, 96, "96x96"),
        (504, 504, "504x504"),
        (1008, 1008, "1008x1008"),
    ];

    for (width, height, label) in sizes {
        let mock_data = generate_mock_raf(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &mock_data, |b, data| {
            let pipeline = RafToTiffPipeline::new(ConversionConfig::default());

            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = pipeline.convert(black_box(data), &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_demosaic_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic_algorithms");
    let mock_data = generate_mock_raf(504, 504);

    let algorithms = vec![
        (Demosaic::None, "none"),
        (Demosaic::NearestNeighbour, "nearest_neighbor"),
        (Demosaic::ColorHue, "color_hue"),
    ];

    for (algorithm, label) in algorithms {
        group.bench_with_input(BenchmarkId::from_parameter(label), &mock_data, |b, data| {
            let config = ConversionConfig::builder().demosaic(algorithm).build();
            let pipeline = RafToTiffPipeline::new(config);

            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = pipeline.convert(black_box(data), &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_compression_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_methods");
    let mock_data = generate_mock_raf(504, 504);

    let compressions = vec![
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateBalanced, "deflate"),
    ];

    for (compression, label) in compressions {
        group.bench_with_input(BenchmarkId::from_parameter(label), &mock_data, |b, data| {
            let config = ConversionConfig::builder().compression(compression).build();
            let pipeline = RafToTiffPipeline::new(config);

            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = pipeline.convert(black_box(data), &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_white_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("white_balance_overhead");
    let mock_data = generate_mock_raf(504, 504);

    for (enabled, label) in [(false, "without_white_balance"), (true, "with_white_balance")] {
        group.bench_function(label, |b| {
            let config = ConversionConfig::builder()
                .output_depth(OutputDepth::Depth8)
                .white_balance(enabled)
                .build();
            let pipeline = RafToTiffPipeline::new(config);

            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = pipeline.convert(black_box(&mock_data), &mut output);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_conversion_sizes,
    benchmark_demosaic_algorithms,
    benchmark_compression_methods,
    benchmark_white_balance
);
criterion_main!(benches);
