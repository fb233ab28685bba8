use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use edgeblur_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ZeroSize`] if any side is zero and
    /// [`ImageError::SizeOverflow`] if `width * height` does not fit in `usize`.
    pub fn num_pixels(&self) -> Result<usize, ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::ZeroSize(self.width, self.height));
        }
        self.width
            .checked_mul(self.height)
            .ok_or(ImageError::SizeOverflow(self.width, self.height))
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A single channel 8-bit image stored row-major.
///
/// The sample at `(x, y)` lives at `y * width + x`. A grid always has at least
/// one row and one column and its buffer length always equals `width * height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    size: ImageSize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The row-major samples of the image.
    ///
    /// # Errors
    ///
    /// If the size is empty or the data length does not match it, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeblur_image::{ImageSize, PixelGrid};
    ///
    /// let image = PixelGrid::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        let num_pixels = size.num_pixels()?;
        if data.len() != num_pixels {
            return Err(ImageError::InvalidDataLength(data.len(), num_pixels));
        }
        Ok(Self { size, data })
    }

    /// Create a new image with every sample set to `val`.
    ///
    /// The buffer is reserved with [`Vec::try_reserve_exact`], so running out of
    /// memory is reported as [`ImageError::Allocation`] instead of aborting.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeblur_image::PixelGrid;
    ///
    /// let image = PixelGrid::from_size_val([4, 3].into(), 7).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 12);
    /// assert!(image.as_slice().iter().all(|&v| v == 7));
    /// ```
    pub fn from_size_val(size: ImageSize, val: u8) -> Result<Self, ImageError> {
        let num_pixels = size.num_pixels()?;
        let mut data = Vec::new();
        data.try_reserve_exact(num_pixels)
            .map_err(|_| ImageError::Allocation(num_pixels))?;
        data.resize(num_pixels, val);
        Ok(Self { size, data })
    }

    /// Create a new image by copying the given samples.
    pub fn from_size_slice(size: ImageSize, data: &[u8]) -> Result<Self, ImageError> {
        let num_pixels = size.num_pixels()?;
        if data.len() != num_pixels {
            return Err(ImageError::InvalidDataLength(data.len(), num_pixels));
        }
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(num_pixels)
            .map_err(|_| ImageError::Allocation(num_pixels))?;
        owned.extend_from_slice(data);
        Ok(Self { size, data: owned })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// The row-major samples of the image.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The row-major samples of the image, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return its samples.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Get the sample at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.data.get(y * self.width() + x).copied()
    }

    /// Get the samples of row `y`, or `None` outside the image.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let start = y * self.width();
        self.data.get(start..start + self.width())
    }
}
