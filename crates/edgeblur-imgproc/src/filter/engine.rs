use edgeblur_image::PixelGrid;

use crate::{
    border,
    error::FilterError,
    parallel::{self, ExecutionStrategy},
};

use super::StencilOperator;

/// Drives a [`StencilOperator`] over every pixel of an image.
///
/// The engine always writes into a freshly allocated image, so the input is
/// never read after being partially overwritten. Border pixels are computed
/// with edge clamping by every strategy; the strategies differ only in how the
/// interior rows are scheduled, never in the values they produce.
///
/// # Examples
///
/// ```
/// use edgeblur_image::PixelGrid;
/// use edgeblur_imgproc::filter::{ConvolutionEngine, WeightedSum};
/// use edgeblur_imgproc::parallel::ExecutionStrategy;
///
/// let src = PixelGrid::new([3, 1].into(), vec![10, 20, 30]).unwrap();
/// let engine = ConvolutionEngine::new(ExecutionStrategy::Serial);
/// let dst = engine.apply(&src, &WeightedSum::box_blur()).unwrap();
///
/// assert_eq!(dst.as_slice(), &[13, 20, 26]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvolutionEngine {
    strategy: ExecutionStrategy,
}

impl ConvolutionEngine {
    /// Create an engine that runs with the given strategy.
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self { strategy }
    }

    /// The strategy used by the engine.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Apply the operator to every pixel of `src`.
    ///
    /// # Arguments
    ///
    /// * `src` - The source image with shape (H, W).
    /// * `op` - The stencil operator evaluated at each pixel.
    ///
    /// # Returns
    ///
    /// A new image with the same size as `src`.
    ///
    /// # Errors
    ///
    /// Fails if the output image cannot be allocated or the thread pool for
    /// [`ExecutionStrategy::Fixed`] cannot be created. No output is returned in
    /// that case.
    pub fn apply<O>(&self, src: &PixelGrid, op: &O) -> Result<PixelGrid, FilterError>
    where
        O: StencilOperator + ?Sized,
    {
        apply(src, op, self.strategy)
    }
}

/// Apply a stencil operator to an image with the given strategy.
///
/// See [`ConvolutionEngine::apply`].
pub fn apply<O>(
    src: &PixelGrid,
    op: &O,
    strategy: ExecutionStrategy,
) -> Result<PixelGrid, FilterError>
where
    O: StencilOperator + ?Sized,
{
    log::debug!("applying 3x3 stencil on {} with {strategy}", src.size());

    let mut dst = PixelGrid::from_size_val(src.size(), 0)?;

    match strategy {
        ExecutionStrategy::Serial => apply_serial(src, op, dst.as_slice_mut()),
        ExecutionStrategy::SerialRows => {
            if let Some(interior) = interior_rows_mut(&mut dst) {
                apply_row_block(src, op, 1, interior);
            }
            fill_border(src, op, dst.as_slice_mut());
        }
        ExecutionStrategy::ParallelRows => {
            if let Some(interior) = interior_rows_mut(&mut dst) {
                parallel::par_iter_row_blocks(interior, src.cols(), 1, |first_row, block| {
                    apply_row_block(src, op, first_row + 1, block)
                });
            }
            fill_border(src, op, dst.as_slice_mut());
        }
        ExecutionStrategy::Fixed(num_threads) => {
            if let Some(interior) = interior_rows_mut(&mut dst) {
                let cols = src.cols();
                let rows = parallel::rows_per_unit(interior.len() / cols, num_threads)?;
                parallel::with_thread_pool(num_threads, || {
                    parallel::par_iter_row_blocks(interior, cols, rows, |first_row, block| {
                        apply_row_block(src, op, first_row + 1, block)
                    })
                })?;
            } else if num_threads == 0 {
                return Err(parallel::ParallelError::InvalidThreadCount(num_threads).into());
            }
            fill_border(src, op, dst.as_slice_mut());
        }
    }

    Ok(dst)
}

// every pixel goes through the clamped gather
fn apply_serial<O>(src: &PixelGrid, op: &O, dst: &mut [u8])
where
    O: StencilOperator + ?Sized,
{
    dst.chunks_exact_mut(src.cols())
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row.iter_mut().enumerate().for_each(|(x, dst_pixel)| {
                *dst_pixel = op.evaluate(&border::neighborhood(src, x, y));
            });
        });
}

// the rows 1..H-1 of the output, or None if the image has no interior
fn interior_rows_mut(dst: &mut PixelGrid) -> Option<&mut [u8]> {
    let (cols, rows) = (dst.cols(), dst.rows());
    if cols < 3 || rows < 3 {
        return None;
    }
    Some(&mut dst.as_slice_mut()[cols..(rows - 1) * cols])
}

// `block` holds whole interior output rows starting at `first_row`
fn apply_row_block<O>(src: &PixelGrid, op: &O, first_row: usize, block: &mut [u8])
where
    O: StencilOperator + ?Sized,
{
    block
        .chunks_exact_mut(src.cols())
        .enumerate()
        .for_each(|(k, dst_row)| apply_interior_row(src, op, first_row + k, dst_row));
}

/// Compute columns `1..W-1` of interior row `y` from three source row windows.
///
/// PRECONDITION: `1 <= y < H - 1` and `W >= 3`.
fn apply_interior_row<O>(src: &PixelGrid, op: &O, y: usize, dst_row: &mut [u8])
where
    O: StencilOperator + ?Sized,
{
    let cols = src.cols();
    let data = src.as_slice();
    let above = &data[(y - 1) * cols..y * cols];
    let center = &data[y * cols..(y + 1) * cols];
    let below = &data[(y + 1) * cols..(y + 2) * cols];

    above
        .windows(3)
        .zip(center.windows(3))
        .zip(below.windows(3))
        .zip(dst_row[1..cols - 1].iter_mut())
        .for_each(|(((a, c), b), dst_pixel)| {
            let window = [[a[0], a[1], a[2]], [c[0], c[1], c[2]], [b[0], b[1], b[2]]];
            *dst_pixel = op.evaluate(&window);
        });
}

/// Compute the 1-pixel frame of the image with the clamped gather.
///
/// Each border pixel is written exactly once; for images with fewer than three
/// rows or columns the frame is the whole image.
fn fill_border<O>(src: &PixelGrid, op: &O, dst: &mut [u8])
where
    O: StencilOperator + ?Sized,
{
    let (cols, rows) = (src.cols(), src.rows());
    let last_row = rows - 1;
    let last_col = cols - 1;

    let top_row = 0..cols;
    let bottom_row = last_row * cols..rows * cols;
    dst[top_row].iter_mut().enumerate().for_each(|(x, dst_pixel)| {
        *dst_pixel = op.evaluate(&border::neighborhood(src, x, 0));
    });
    if last_row > 0 {
        dst[bottom_row].iter_mut().enumerate().for_each(|(x, dst_pixel)| {
            *dst_pixel = op.evaluate(&border::neighborhood(src, x, last_row));
        });
    }
    for y in 1..last_row {
        dst[y * cols] = op.evaluate(&border::neighborhood(src, 0, y));
        if last_col > 0 {
            dst[y * cols + last_col] = op.evaluate(&border::neighborhood(src, last_col, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::filter::{kernels::Kernel3, SobelMagnitude, WeightedSum};
    use crate::parallel::ParallelError;

    const STRATEGIES: [ExecutionStrategy; 6] = [
        ExecutionStrategy::Serial,
        ExecutionStrategy::SerialRows,
        ExecutionStrategy::ParallelRows,
        ExecutionStrategy::Fixed(1),
        ExecutionStrategy::Fixed(2),
        ExecutionStrategy::Fixed(8),
    ];

    fn random_image(width: usize, height: usize, seed: u64) -> Result<PixelGrid, FilterError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
        Ok(PixelGrid::new([width, height].into(), data)?)
    }

    #[test]
    fn test_strategies_are_deterministic() -> Result<(), FilterError> {
        let blur = WeightedSum::box_blur();
        let sobel = SobelMagnitude::new();

        for (i, &(width, height)) in [(1, 1), (2, 7), (3, 3), (17, 5), (64, 61)]
            .iter()
            .enumerate()
        {
            let src = random_image(width, height, i as u64)?;
            let expected_blur = apply(&src, &blur, ExecutionStrategy::Serial)?;
            let expected_sobel = apply(&src, &sobel, ExecutionStrategy::Serial)?;

            for strategy in STRATEGIES {
                assert_eq!(apply(&src, &blur, strategy)?, expected_blur, "{strategy}");
                assert_eq!(apply(&src, &sobel, strategy)?, expected_sobel, "{strategy}");
            }
        }

        Ok(())
    }

    #[test]
    fn test_dimension_preservation() -> Result<(), FilterError> {
        let sizes = [1, 2, 3, 100];
        for &width in sizes.iter() {
            for &height in sizes.iter() {
                let src = PixelGrid::from_size_val([width, height].into(), 77)?;
                for strategy in STRATEGIES {
                    let dst = apply(&src, &WeightedSum::box_blur(), strategy)?;
                    assert_eq!(dst.size(), src.size());
                    // a constant image stays constant under the box blur
                    assert!(dst.as_slice().iter().all(|&v| v == 77));
                }
            }
        }

        Ok(())
    }

    #[test]
    fn test_blur_clamping() -> Result<(), FilterError> {
        for val in [0u8, 255] {
            let src = PixelGrid::from_size_val([3, 3].into(), val)?;
            for strategy in STRATEGIES {
                let dst = apply(&src, &WeightedSum::box_blur(), strategy)?;
                assert_eq!(dst.as_slice(), &[val; 9]);
            }
        }

        Ok(())
    }

    #[test]
    fn test_horizontal_blur_border() -> Result<(), FilterError> {
        let src = PixelGrid::new([3, 1].into(), vec![10, 20, 30])?;
        let op = WeightedSum::new(Kernel3::horizontal_box());

        for strategy in STRATEGIES {
            let dst = apply(&src, &op, strategy)?;
            // (10 + 10 + 20) / 3, (10 + 20 + 30) / 3, (20 + 30 + 30) / 3
            assert_eq!(dst.as_slice(), &[13, 20, 26]);
        }

        Ok(())
    }

    #[test]
    fn test_box_blur_impulse() -> Result<(), FilterError> {
        let mut src = PixelGrid::from_size_val([5, 5].into(), 0)?;
        src.as_slice_mut()[12] = 90;

        for strategy in STRATEGIES {
            let dst = apply(&src, &WeightedSum::box_blur(), strategy)?;

            #[rustfmt::skip]
            assert_eq!(
                dst.as_slice(),
                &[
                    0, 0, 0, 0, 0,
                    0, 10, 10, 10, 0,
                    0, 10, 10, 10, 0,
                    0, 10, 10, 10, 0,
                    0, 0, 0, 0, 0,
                ]
            );
        }

        Ok(())
    }

    #[test]
    fn test_box_blur_corner_uses_clamped_neighbours() -> Result<(), FilterError> {
        let mut src = PixelGrid::from_size_val([4, 4].into(), 0)?;
        src.as_slice_mut()[0] = 90;

        for strategy in STRATEGIES {
            let dst = apply(&src, &WeightedSum::box_blur(), strategy)?;
            // the corner sample is replicated 4 times into its own window
            assert_eq!(dst.get(0, 0), Some(40));
            assert_eq!(dst.get(1, 0), Some(20));
            assert_eq!(dst.get(0, 1), Some(20));
            assert_eq!(dst.get(1, 1), Some(10));
            assert_eq!(dst.get(2, 2), Some(0));
        }

        Ok(())
    }

    #[test]
    fn test_sobel_uniform_image() -> Result<(), FilterError> {
        let src = PixelGrid::from_size_val([9, 7].into(), 128)?;
        for strategy in STRATEGIES {
            let dst = apply(&src, &SobelMagnitude::new(), strategy)?;
            assert!(dst.as_slice().iter().all(|&v| v == 0));
        }

        Ok(())
    }

    #[test]
    fn test_sobel_vertical_step_edge() -> Result<(), FilterError> {
        let row = [0u8, 0, 0, 255, 255, 255];
        let src = PixelGrid::new([6, 5].into(), row.repeat(5))?;

        for strategy in STRATEGIES {
            let dst = apply(&src, &SobelMagnitude::new(), strategy)?;
            for y in 0..5 {
                assert_eq!(dst.row(y), Some(&[0u8, 0, 255, 255, 0, 0][..]), "{strategy}");
            }
        }

        Ok(())
    }

    #[test]
    fn test_sobel_step_at_first_column() -> Result<(), FilterError> {
        let src = PixelGrid::new([3, 3].into(), [0u8, 255, 255].repeat(3))?;

        for strategy in STRATEGIES {
            let dst = apply(&src, &SobelMagnitude::new(), strategy)?;
            for y in 0..3 {
                assert_eq!(dst.row(y), Some(&[255u8, 255, 0][..]), "{strategy}");
            }
        }

        Ok(())
    }

    #[test]
    fn test_apply_is_idempotent() -> Result<(), FilterError> {
        let src = random_image(31, 23, 7)?;
        let engine = ConvolutionEngine::new(ExecutionStrategy::ParallelRows);

        let first = engine.apply(&src, &SobelMagnitude::new())?;
        for _ in 0..3 {
            assert_eq!(engine.apply(&src, &SobelMagnitude::new())?, first);
        }

        Ok(())
    }

    #[test]
    fn test_dyn_operator() -> Result<(), FilterError> {
        let src = random_image(8, 8, 3)?;
        let ops: [&dyn StencilOperator; 2] = [&WeightedSum::box_blur(), &SobelMagnitude::new()];

        for op in ops {
            let serial = apply(&src, op, ExecutionStrategy::Serial)?;
            let rows = apply(&src, op, ExecutionStrategy::SerialRows)?;
            assert_eq!(serial, rows);
        }

        let identity = |w: &crate::border::Neighborhood| w[1][1];
        assert_eq!(apply(&src, &identity, ExecutionStrategy::Fixed(3))?, src);

        Ok(())
    }

    #[test]
    fn test_fixed_zero_threads() -> Result<(), FilterError> {
        for size in [[5usize, 5], [2, 2]] {
            let src = PixelGrid::from_size_val(size.into(), 0)?;
            let res = apply(&src, &SobelMagnitude::new(), ExecutionStrategy::Fixed(0));
            assert_eq!(
                res,
                Err(FilterError::ParallelError(ParallelError::InvalidThreadCount(0)))
            );
        }

        Ok(())
    }
}
