//! Filter operations
//!
//! This module provides the 3x3 stencil operators and the engine that runs them.

/// Filter kernels
pub mod kernels;

/// Stencil operators
mod stencil;
pub use stencil::*;

/// Convolution engine
mod engine;
pub use engine::*;

/// Filter operations
mod ops;
pub use ops::*;
