use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use raf_develop_rs::image_pipeline::{
    ConversionConfig, Demosaic, OutputDepth, RafReader, RafToTiffPipeline, StandardTiffWriter,
    TiffCompression,
};
use raf_develop_rs::logger;

#[derive(Parser, Debug)]
#[command(name = "raf_develop", author, version, about = "Develop Fujifilm RAF files into TIFF images", long_about = None)]
struct Args {
    /// RAF file to develop
    input: PathBuf,

    /// Output TIFF path (defaults to the input path with a .tiff extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Demosaic algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::ColorHue)]
    algorithm: Algorithm,

    /// Log every degraded pixel and enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Stretch each color channel over the full 16-bit range
    #[arg(short, long)]
    white_balance: bool,

    /// Output bits per sample
    #[arg(long, value_enum, default_value_t = Depth::Sixteen)]
    depth: Depth,

    /// TIFF compression
    #[arg(long, value_enum, default_value_t = Compression::None)]
    compression: Compression,

    /// Also write the embedded JPEG preview to this path
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Significant bits per raw sample
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u32).range(1..=16))]
    sensor_bits: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    None,
    #[value(name = "nearest_neighbor", alias = "nearest_neighbour")]
    NearestNeighbor,
    #[value(name = "color_hue")]
    ColorHue,
}

impl From<Algorithm> for Demosaic {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::None => Demosaic::None,
            Algorithm::NearestNeighbor => Demosaic::NearestNeighbour,
            Algorithm::ColorHue => Demosaic::ColorHue,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Depth {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

impl From<Depth> for OutputDepth {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Eight => OutputDepth::Depth8,
            Depth::Sixteen => OutputDepth::Depth16,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Compression {
    None,
    Lzw,
    Deflate,
}

impl From<Compression> for TiffCompression {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::Deflate => TiffCompression::DeflateBalanced,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    if let Err(e) = run(&args) {
        error!("Conversion failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("tiff"));

    let config = ConversionConfig::builder()
        .compression(args.compression.into())
        .demosaic(args.algorithm.into())
        .output_depth(args.depth.into())
        .white_balance(args.white_balance)
        .verbose(args.verbose)
        .build();
    let pipeline = RafToTiffPipeline::with_custom(
        RafReader::new(args.sensor_bits),
        StandardTiffWriter,
        config,
    );

    info!("RAF to TIFF pipeline initialized");
    info!("Compression: {:?}", pipeline.config().compression);
    info!("Demosaic: {}", pipeline.config().demosaic);
    info!(
        "White balance: {}",
        if pipeline.config().white_balance {
            "enabled"
        } else {
            "disabled"
        }
    );

    if let Some(preview) = &args.preview {
        pipeline
            .extract_preview_file(&args.input, preview)
            .with_context(|| format!("extracting preview from {}", args.input.display()))?;
    }

    let summary = pipeline
        .convert_file(&args.input, &output)
        .with_context(|| format!("developing {}", args.input.display()))?;

    info!(
        camera = %summary.camera,
        width = summary.width,
        height = summary.height,
        degraded = summary.demosaic.degraded_samples,
        "Wrote {}",
        output.display()
    );
    Ok(())
}
