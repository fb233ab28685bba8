use crate::{border::Neighborhood, error::FilterError};

/// Integer weights of a 3x3 kernel, indexed `[row][col]`.
pub type Weights3 = [[i32; 3]; 3];

/// A 3x3 integer kernel with its normalization divisor.
///
/// The divisor is checked on construction, so a `Kernel3` can always be
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel3 {
    weights: Weights3,
    divisor: i32,
}

impl Kernel3 {
    /// Create a new kernel.
    ///
    /// # Arguments
    ///
    /// * `weights` - The 3x3 weights.
    /// * `divisor` - The normalization divisor applied to the weighted sum.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ZeroDivisor`] if `divisor` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeblur_imgproc::filter::kernels::Kernel3;
    ///
    /// let sharpen = Kernel3::new([[0, -1, 0], [-1, 5, -1], [0, -1, 0]], 1).unwrap();
    /// assert_eq!(sharpen.divisor(), 1);
    ///
    /// assert!(Kernel3::new([[1; 3]; 3], 0).is_err());
    /// ```
    pub fn new(weights: Weights3, divisor: i32) -> Result<Self, FilterError> {
        if divisor == 0 {
            return Err(FilterError::ZeroDivisor);
        }
        Ok(Self { weights, divisor })
    }

    /// The 3x3 box blur: all ones divided by 9.
    pub fn box_blur() -> Self {
        Self {
            weights: [[1; 3]; 3],
            divisor: 9,
        }
    }

    /// A horizontal 1x3 box blur embedded in a 3x3 kernel, divided by 3.
    pub fn horizontal_box() -> Self {
        Self {
            weights: [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
            divisor: 3,
        }
    }

    /// The kernel weights.
    pub fn weights(&self) -> &Weights3 {
        &self.weights
    }

    /// The normalization divisor.
    pub fn divisor(&self) -> i32 {
        self.divisor
    }
}

/// The fixed 3x3 Sobel kernels `(gx, gy)`.
pub fn sobel_kernels_3x3() -> (Weights3, Weights3) {
    let kernel_x = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
    let kernel_y = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];
    (kernel_x, kernel_y)
}

/// Integer weighted sum of a window.
///
/// Accumulates in `i64` so that no combination of 8-bit samples and `i32`
/// weights can overflow.
#[inline]
pub fn weighted_sum(window: &Neighborhood, weights: &Weights3) -> i64 {
    let mut sum = 0i64;
    for (w_row, k_row) in window.iter().zip(weights.iter()) {
        for (&w, &k) in w_row.iter().zip(k_row.iter()) {
            sum += w as i64 * k as i64;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_zero_divisor() {
        assert_eq!(
            Kernel3::new([[1; 3]; 3], 0),
            Err(FilterError::ZeroDivisor)
        );
    }

    #[test]
    fn test_box_blur_kernel() {
        let kernel = Kernel3::box_blur();
        assert_eq!(kernel.weights(), &[[1; 3]; 3]);
        assert_eq!(kernel.divisor(), 9);
        assert_eq!(Kernel3::new([[1; 3]; 3], 9), Ok(kernel));
    }

    #[test]
    fn test_sobel_kernels_3x3() {
        let (kernel_x, kernel_y) = sobel_kernels_3x3();
        assert_eq!(kernel_x, [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]);
        assert_eq!(kernel_y, [[-1, -2, -1], [0, 0, 0], [1, 2, 1]]);
    }

    #[test]
    fn test_weighted_sum() {
        let window = [[1, 2, 3], [4, 5, 6], [7, 8, 9]];
        assert_eq!(weighted_sum(&window, &[[1; 3]; 3]), 45);

        let (kernel_x, kernel_y) = sobel_kernels_3x3();
        assert_eq!(weighted_sum(&window, &kernel_x), 8);
        assert_eq!(weighted_sum(&window, &kernel_y), 24);
    }

    #[test]
    fn test_weighted_sum_no_overflow() {
        let window = [[255; 3]; 3];
        let weights = [[i32::MAX; 3]; 3];
        assert_eq!(weighted_sum(&window, &weights), 9 * 255 * i32::MAX as i64);
    }
}
