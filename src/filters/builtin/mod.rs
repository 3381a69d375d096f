//! Built-in filter implementations.
//!
//! This module contains the standard filters that ship with rasterfx.

pub mod convolution;
pub mod gradient;
pub mod color;
pub mod transform;
pub mod balance;

use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    color::register(registry);
    convolution::register(registry);
    gradient::register(registry);
    transform::register(registry);
    balance::register(registry);
}

// Re-export for direct access
pub use convolution::{convolve, ConvolutionFilter};
pub use gradient::{GradientFilter, GradientMagnitude};
pub use color::{Brightness, Grayscale, Invert, Sepia};
pub use transform::{Downsample, Glass, Jitter, JitterMode, Rotate, Translate, Wave, WavePhase};
pub use balance::{ChannelMeans, GrayWorld};
