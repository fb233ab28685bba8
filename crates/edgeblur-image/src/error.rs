/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has no pixels along one of its axes.
    #[error("Image size must be non zero, got {0}x{1}")]
    ZeroSize(usize, usize),

    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the pixel buffer cannot be allocated.
    #[error("Failed to allocate {0} bytes for the image")]
    Allocation(usize),

    /// Error when the number of pixels overflows `usize`.
    #[error("Image size overflows the addressable range: {0}x{1}")]
    SizeOverflow(usize, usize),
}
