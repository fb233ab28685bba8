#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and bitmap format failures.
pub mod error;

/// BMP image encoding and decoding.
///
/// Read 8-bit and 24-bit uncompressed bitmaps as grayscale and write 8-bit
/// grayscale bitmaps with an identity palette.
pub mod bmp;

pub use crate::error::IoError;
