use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for the given dimensions")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Reject zero-sized buffers before any processing
pub(crate) fn ensure_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ScanError::InvalidDimensions { width, height });
    }
    Ok(())
}
