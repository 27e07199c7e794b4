use std::io::Write;
use tiff::encoder::{TiffEncoder, colortype};
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::sink::{ColorModel, PixelColor, PixelSource};
use crate::image_pipeline::tiff::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

/// Gathers the source's pixels into one interleaved sample buffer.
fn collect_samples(image: &dyn PixelSource) -> Result<Vec<u16>> {
    let bounds = image.bounds();
    let channels = match image.color_model() {
        ColorModel::Gray8 | ColorModel::Gray16 => 1,
        ColorModel::Rgba8 | ColorModel::Rgba16 => 4,
    };
    let mut samples = Vec::with_capacity(bounds.width * bounds.height * channels);

    for y in 0..bounds.height {
        for x in 0..bounds.width {
            match image.color_at(x, y) {
                Some(PixelColor::Gray(v)) => samples.push(v),
                Some(PixelColor::Rgba(px)) => samples.extend_from_slice(&px),
                None => {
                    return Err(ConversionError::EncodeError(format!(
                        "pixel ({x}, {y}) missing inside bounds {}x{}",
                        bounds.width, bounds.height
                    )));
                }
            }
        }
    }
    Ok(samples)
}

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &dyn PixelSource, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        let bounds = image.bounds();
        let model = image.color_model();
        debug!("Encoding TIFF image: {}x{} ({:?})", bounds.width, bounds.height, model);

        let samples = collect_samples(image)?;
        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let (width, height) = (bounds.width as u32, bounds.height as u32);
        let narrow: Vec<u8> = match model {
            ColorModel::Gray8 | ColorModel::Rgba8 => {
                samples.iter().map(|&s| s.min(u8::MAX as u16) as u8).collect()
            }
            ColorModel::Gray16 | ColorModel::Rgba16 => Vec::new(),
        };
        {
            let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| ConversionError::EncodeError(e.to_string()))?
                .with_compression(compression);

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => tiff::tags::Predictor::Horizontal,
                    _ => tiff::tags::Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let written = match model {
                ColorModel::Gray8 => encoder.write_image::<colortype::Gray8>(width, height, &narrow),
                ColorModel::Rgba8 => encoder.write_image::<colortype::RGBA8>(width, height, &narrow),
                ColorModel::Gray16 => encoder.write_image::<colortype::Gray16>(width, height, &samples),
                ColorModel::Rgba16 => encoder.write_image::<colortype::RGBA16>(width, height, &samples),
            };
            written.map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::debayer::types::{ChannelLayout, OutputDepth, Raster};
    use crate::image_pipeline::sink::RasterImage;
    use std::io::Cursor;
    use tiff::decoder::{Decoder, DecodingResult};

    fn encode(raster: Raster, config: &ConversionConfig) -> Vec<u8> {
        let mut out = Vec::new();
        StandardTiffWriter
            .write_tiff(&RasterImage::new(raster), &mut out, config)
            .unwrap();
        out
    }

    #[test]
    fn test_rgba16_round_trips_through_decoder() {
        let mut raster = Raster::new(2, 2, ChannelLayout::Rgba, OutputDepth::Depth16);
        raster.data = (0..16).map(|i| i * 1000).collect();
        let expected = raster.data.clone();

        let bytes = encode(raster, &ConversionConfig::default());
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (2, 2));
        match decoder.read_image().unwrap() {
            DecodingResult::U16(data) => assert_eq!(data, expected),
            _ => panic!("expected 16-bit samples"),
        }
    }

    #[test]
    fn test_gray8_with_lzw() {
        let mut raster = Raster::new(3, 1, ChannelLayout::Gray, OutputDepth::Depth8);
        raster.data = vec![0, 128, 255];

        let config = ConversionConfig::builder()
            .compression(TiffCompression::Lzw)
            .predictor(Some(2))
            .build();
        let bytes = encode(raster, &config);
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        match decoder.read_image().unwrap() {
            DecodingResult::U8(data) => assert_eq!(data, vec![0, 128, 255]),
            _ => panic!("expected 8-bit samples"),
        }
    }
}
