use edgeblur_image::PixelGrid;

use super::{apply, kernels::Kernel3, SobelMagnitude, WeightedSum};
use crate::{error::FilterError, parallel::ExecutionStrategy};

/// Blur an image with the 3x3 box filter (all ones divided by 9).
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `strategy` - How the work is scheduled. Does not change the result.
///
/// # Returns
///
/// The blurred image with the same shape as `src`.
///
/// # Examples
///
/// ```
/// use edgeblur_image::PixelGrid;
/// use edgeblur_imgproc::{filter::box_blur, parallel::ExecutionStrategy};
///
/// let mut src = PixelGrid::from_size_val([3, 3].into(), 0).unwrap();
/// src.as_slice_mut()[4] = 90;
///
/// let dst = box_blur(&src, ExecutionStrategy::SerialRows).unwrap();
/// assert_eq!(dst.get(1, 1), Some(10));
/// ```
pub fn box_blur(src: &PixelGrid, strategy: ExecutionStrategy) -> Result<PixelGrid, FilterError> {
    apply(src, &WeightedSum::box_blur(), strategy)
}

/// Convolve an image with a 3x3 integer kernel.
///
/// Each output sample is the weighted sum of its edge-clamped window divided by
/// the kernel divisor (truncating) and clamped to `[0, 255]`.
pub fn convolve3x3(
    src: &PixelGrid,
    kernel: &Kernel3,
    strategy: ExecutionStrategy,
) -> Result<PixelGrid, FilterError> {
    apply(src, &WeightedSum::new(*kernel), strategy)
}

/// Compute the Sobel edge magnitude `|gx| + |gy|` of an image, clamped to 255.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `strategy` - How the work is scheduled. Does not change the result.
pub fn sobel(src: &PixelGrid, strategy: ExecutionStrategy) -> Result<PixelGrid, FilterError> {
    apply(src, &SobelMagnitude::new(), strategy)
}
