use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RafImage;

pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RafImage>;
}
