/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] edgeblur_image::ImageError),

    /// Error from the bitmap decoder or encoder.
    #[error("Failed to decode or encode the bmp image. {0}")]
    ImageCodecError(#[from] image::ImageError),

    /// The file does not start with the `BM` signature.
    #[error("Not a BMP file, signature: {0:#06x}")]
    InvalidSignature(u16),

    /// The info header is older or smaller than `BITMAPINFOHEADER`.
    #[error("Unsupported BMP info header size: {0}")]
    UnsupportedHeader(u32),

    /// Only 8 and 24 bits per pixel are supported.
    #[error("Only 8bit or 24bit BMP supported, got {0}bit")]
    UnsupportedBitDepth(u16),

    /// Only uncompressed bitmaps are supported.
    #[error("Only uncompressed BMP supported, got compression {0}")]
    UnsupportedCompression(u32),

    /// The header declares an empty or negative width, or an empty height.
    #[error("Invalid BMP dimensions: {0}x{1}")]
    InvalidDimensions(i32, i32),

    /// The image is too large to be stored in a BMP header.
    #[error("Image too large for BMP: {0}x{1}")]
    DimensionsTooLarge(usize, usize),

    /// The buffer ends before the data announced by the header.
    #[error("Truncated BMP data: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },
}
