#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use edgeblur_image as image;

#[doc(inline)]
pub use edgeblur_imgproc as imgproc;

#[doc(inline)]
pub use edgeblur_io as io;

/// Blur and edge map pipeline.
pub mod pipeline;
