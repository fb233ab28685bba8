use edgeblur_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filtering operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel normalization divisor is zero.
    #[error("Kernel divisor must be non zero")]
    ZeroDivisor,

    /// Error to create the output image.
    #[error("Failed to create image. {0}")]
    ImageError(#[from] ImageError),

    /// Error to run the parallel strategy.
    #[error("Failed to run in parallel. {0}")]
    ParallelError(#[from] ParallelError),
}
