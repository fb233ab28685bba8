use std::{fs, path::Path};

use edgeblur_image::{ImageSize, PixelGrid};
use image::{codecs::bmp::BmpEncoder, ExtendedColorType, ImageFormat};

use crate::error::IoError;

const SIGNATURE: u16 = 0x4D42; // "BM"
const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = 40;

/// The header fields checked before the bitmap is handed to the decoder.
#[derive(Debug)]
struct BmpHeader {
    pixel_offset: usize,
    width: i32,
    height: i32,
    bit_count: u16,
    compression: u32,
}

impl BmpHeader {
    fn parse(bytes: &[u8]) -> Result<Self, IoError> {
        let min_len = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
        if bytes.len() < min_len {
            return Err(IoError::Truncated {
                expected: min_len,
                actual: bytes.len(),
            });
        }

        let signature = read_u16(bytes, 0);
        if signature != SIGNATURE {
            return Err(IoError::InvalidSignature(signature));
        }

        let info_size = read_u32(bytes, 14);
        if (info_size as usize) < INFO_HEADER_SIZE {
            return Err(IoError::UnsupportedHeader(info_size));
        }

        let header = Self {
            pixel_offset: read_u32(bytes, 10) as usize,
            width: read_i32(bytes, 18),
            height: read_i32(bytes, 22),
            bit_count: read_u16(bytes, 28),
            compression: read_u32(bytes, 30),
        };

        if header.bit_count != 8 && header.bit_count != 24 {
            return Err(IoError::UnsupportedBitDepth(header.bit_count));
        }
        if header.compression != 0 {
            return Err(IoError::UnsupportedCompression(header.compression));
        }

        Ok(header)
    }

    fn size(&self) -> Result<ImageSize, IoError> {
        if self.width <= 0 || self.height == 0 {
            return Err(IoError::InvalidDimensions(self.width, self.height));
        }
        Ok(ImageSize {
            width: self.width as usize,
            height: self.height.unsigned_abs() as usize,
        })
    }

    // the padding of the last scanline may be missing
    fn check_pixel_data(&self, len: usize) -> Result<(), IoError> {
        let size = self.size()?;
        let stride = row_stride(self.bit_count, size.width);
        let expected = stride
            .checked_mul(size.height - 1)
            .and_then(|n| n.checked_add(size.width * (self.bit_count as usize / 8)))
            .and_then(|n| n.checked_add(self.pixel_offset))
            .ok_or(IoError::DimensionsTooLarge(size.width, size.height))?;
        if len < expected {
            return Err(IoError::Truncated {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

#[inline]
fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

#[inline]
fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

#[inline]
fn read_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Number of bytes of one scanline, padded to a multiple of 4.
#[inline]
fn row_stride(bit_count: u16, width: usize) -> usize {
    (bit_count as usize * width).div_ceil(32) * 4
}

/// Convert a color sample to intensity with `0.299 R + 0.587 G + 0.114 B`,
/// truncated.
///
/// # Examples
///
/// ```
/// use edgeblur_io::bmp::gray_from_bgr;
///
/// assert_eq!(gray_from_bgr(0, 0, 255), 76);
/// assert_eq!(gray_from_bgr(255, 255, 255), 255);
/// ```
#[inline]
pub fn gray_from_bgr(b: u8, g: u8, r: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) as u8
}

/// Decodes an 8-bit or 24-bit uncompressed BMP into a grayscale image.
///
/// 24-bit pixels are converted with [`gray_from_bgr`]. 8-bit pixels are mapped
/// through their palette entry: gray entries keep their value and colored
/// entries are converted with [`gray_from_bgr`].
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the bmp file
///
/// # Errors
///
/// Fails on a wrong signature, an unsupported header, bit depth or compression,
/// empty dimensions, missing pixel data, or when the decoder rejects the file.
pub fn decode_image_bmp_mono8(bytes: &[u8]) -> Result<PixelGrid, IoError> {
    let header = BmpHeader::parse(bytes)?;
    header.check_pixel_data(bytes.len())?;

    let rgb = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?.into_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };

    let paletted = header.bit_count == 8;
    let mut image = PixelGrid::from_size_val(size, 0)?;
    image
        .as_slice_mut()
        .iter_mut()
        .zip(rgb.as_raw().chunks_exact(3))
        .for_each(|(dst, px)| {
            let (r, g, b) = (px[0], px[1], px[2]);
            *dst = if paletted && r == g && g == b {
                r
            } else {
                gray_from_bgr(b, g, r)
            };
        });

    log::debug!("decoded {}bit bmp with {}", header.bit_count, image.size());

    Ok(image)
}

/// Encodes a grayscale image as an 8-bit BMP with a 256 entry gray palette.
///
/// Scanlines are stored bottom to top and padded to 4 bytes.
///
/// # Errors
///
/// Fails if the image is too large for the 32-bit BMP header fields.
pub fn encode_image_bmp_mono8(image: &PixelGrid) -> Result<Vec<u8>, IoError> {
    let (cols, rows) = (image.cols(), image.rows());
    let too_large = || IoError::DimensionsTooLarge(cols, rows);

    let width = u32::try_from(cols).map_err(|_| too_large())?;
    let height = u32::try_from(rows).map_err(|_| too_large())?;

    let mut buf = Vec::new();
    BmpEncoder::new(&mut buf).encode(image.as_slice(), width, height, ExtendedColorType::L8)?;

    Ok(buf)
}

/// Read a BMP image as grayscale (mono8).
///
/// The file is recognized by its `BM` signature, whatever its extension.
///
/// # Arguments
///
/// * `file_path` - The path to the BMP file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_bmp_mono8(file_path: impl AsRef<Path>) -> Result<PixelGrid, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    decode_image_bmp_mono8(&bytes)
}

/// Write a grayscale image as an 8-bit BMP.
///
/// # Arguments
///
/// * `file_path` - The path to the BMP file.
/// * `image` - The grayscale image to write.
pub fn write_image_bmp_mono8(
    file_path: impl AsRef<Path>,
    image: &PixelGrid,
) -> Result<(), IoError> {
    let bytes = encode_image_bmp_mono8(image)?;
    fs::write(file_path, bytes)?;

    Ok(())
}
