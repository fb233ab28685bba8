use std::time::{Duration, Instant};

use edgeblur_image::PixelGrid;
use edgeblur_imgproc::{filter, parallel::ExecutionStrategy, FilterError};

/// The two images derived from one input, with the time spent on each.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The 3x3 box blurred image.
    pub blurred: PixelGrid,
    /// The Sobel edge magnitude image.
    pub edges: PixelGrid,
    /// Wall-clock time of the blur.
    pub blur_time: Duration,
    /// Wall-clock time of the Sobel operator.
    pub sobel_time: Duration,
}

fn timed<F>(f: F) -> Result<(PixelGrid, Duration), FilterError>
where
    F: FnOnce() -> Result<PixelGrid, FilterError>,
{
    let start = Instant::now();
    let image = f()?;
    Ok((image, start.elapsed()))
}

/// Compute the box blur and the Sobel edge map of `src`.
///
/// Both operators only read `src` and write their own output, so they run
/// concurrently with [`rayon::join`].
///
/// # Arguments
///
/// * `src` - The grayscale source image.
/// * `strategy` - The execution strategy used by both operators.
///
/// # Examples
///
/// ```
/// use edgeblur::image::PixelGrid;
/// use edgeblur::imgproc::parallel::ExecutionStrategy;
/// use edgeblur::pipeline::blur_and_edges;
///
/// let src = PixelGrid::from_size_val([8, 8].into(), 128).unwrap();
/// let out = blur_and_edges(&src, ExecutionStrategy::ParallelRows).unwrap();
///
/// assert_eq!(out.blurred, src);
/// assert!(out.edges.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn blur_and_edges(
    src: &PixelGrid,
    strategy: ExecutionStrategy,
) -> Result<PipelineOutput, FilterError> {
    let (blur, sobel) = rayon::join(
        || timed(|| filter::box_blur(src, strategy)),
        || timed(|| filter::sobel(src, strategy)),
    );
    let (blurred, blur_time) = blur?;
    let (edges, sobel_time) = sobel?;

    log::info!(
        "processed {} with {strategy}: blur {:.6}s, sobel {:.6}s",
        src.size(),
        blur_time.as_secs_f64(),
        sobel_time.as_secs_f64()
    );

    Ok(PipelineOutput {
        blurred,
        edges,
        blur_time,
        sobel_time,
    })
}
