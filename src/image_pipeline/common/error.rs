use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Malformed RAF container: {0}")]
    Format(String),

    #[error("Failed to decode preview metadata: {0}")]
    Metadata(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ConversionError::Format(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
