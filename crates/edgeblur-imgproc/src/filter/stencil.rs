use crate::border::Neighborhood;

use super::kernels::{self, Kernel3, Weights3};

/// A pure function from a 3x3 window to one output sample.
///
/// Implementors must be `Sync` so the same operator can be shared by the
/// parallel strategies. Any `Fn(&Neighborhood) -> u8 + Sync` closure is an
/// operator too.
pub trait StencilOperator: Sync {
    /// Compute the output sample for the given window.
    fn evaluate(&self, window: &Neighborhood) -> u8;
}

impl<F> StencilOperator for F
where
    F: Fn(&Neighborhood) -> u8 + Sync,
{
    fn evaluate(&self, window: &Neighborhood) -> u8 {
        self(window)
    }
}

/// Weighted sum of the window, divided by the kernel divisor with truncating
/// integer division and clamped to `[0, 255]`.
///
/// # Examples
///
/// ```
/// use edgeblur_imgproc::filter::{StencilOperator, WeightedSum};
///
/// let blur = WeightedSum::box_blur();
/// assert_eq!(blur.evaluate(&[[255; 3]; 3]), 255);
/// assert_eq!(blur.evaluate(&[[0, 0, 0], [0, 9, 0], [0, 0, 0]]), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedSum {
    kernel: Kernel3,
}

impl WeightedSum {
    /// Create the operator from a validated kernel.
    pub fn new(kernel: Kernel3) -> Self {
        Self { kernel }
    }

    /// The 3x3 box blur operator.
    pub fn box_blur() -> Self {
        Self::new(Kernel3::box_blur())
    }

    /// The kernel used by the operator.
    pub fn kernel(&self) -> &Kernel3 {
        &self.kernel
    }
}

impl StencilOperator for WeightedSum {
    #[inline]
    fn evaluate(&self, window: &Neighborhood) -> u8 {
        let sum = kernels::weighted_sum(window, self.kernel.weights());
        (sum / self.kernel.divisor() as i64).clamp(0, 255) as u8
    }
}

/// Sobel gradient magnitude approximated as `|gx| + |gy|`, clamped to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SobelMagnitude {
    kernel_x: Weights3,
    kernel_y: Weights3,
}

impl SobelMagnitude {
    /// Create the operator with the fixed 3x3 Sobel kernels.
    pub fn new() -> Self {
        let (kernel_x, kernel_y) = kernels::sobel_kernels_3x3();
        Self { kernel_x, kernel_y }
    }
}

impl Default for SobelMagnitude {
    fn default() -> Self {
        Self::new()
    }
}

impl StencilOperator for SobelMagnitude {
    #[inline]
    fn evaluate(&self, window: &Neighborhood) -> u8 {
        let gx = kernels::weighted_sum(window, &self.kernel_x);
        let gy = kernels::weighted_sum(window, &self.kernel_y);
        (gx.abs() + gy.abs()).min(255) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn test_weighted_sum_clamping() -> Result<(), FilterError> {
        let blur = WeightedSum::box_blur();
        assert_eq!(blur.evaluate(&[[255; 3]; 3]), 255);
        assert_eq!(blur.evaluate(&[[0; 3]; 3]), 0);

        let negative = WeightedSum::new(Kernel3::new([[-1; 3]; 3], 1)?);
        assert_eq!(negative.evaluate(&[[10; 3]; 3]), 0);

        let gain = WeightedSum::new(Kernel3::new([[0, 0, 0], [0, 4, 0], [0, 0, 0]], 1)?);
        assert_eq!(gain.evaluate(&[[100; 3]; 3]), 255);

        Ok(())
    }

    #[test]
    fn test_weighted_sum_truncates() -> Result<(), FilterError> {
        let blur = WeightedSum::box_blur();
        // 17 / 9 = 1.88..
        assert_eq!(blur.evaluate(&[[2, 2, 2], [2, 1, 2], [2, 2, 2]]), 1);

        // -7 / 2 truncates towards zero before clamping
        let op = WeightedSum::new(Kernel3::new([[0, 0, 0], [0, -7, 0], [0, 0, 0]], -2)?);
        assert_eq!(op.evaluate(&[[1; 3]; 3]), 3);

        Ok(())
    }

    #[test]
    fn test_sobel_magnitude() {
        let sobel = SobelMagnitude::new();
        assert_eq!(sobel.evaluate(&[[128; 3]; 3]), 0);
        assert_eq!(sobel.evaluate(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]), 32);
        assert_eq!(sobel.evaluate(&[[0, 0, 255], [0, 0, 255], [0, 0, 255]]), 255);
        assert_eq!(sobel.evaluate(&[[0, 0, 10], [0, 0, 10], [0, 0, 10]]), 40);
    }

    #[test]
    fn test_closure_operator() {
        let center = |w: &Neighborhood| w[1][1];
        assert_eq!(center.evaluate(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]), 5);
    }
}
