//! # rasterfx - Raster Image Filtering
//!
//! rasterfx applies a single filter to an RGB image with per-column progress
//! reporting and cooperative cancellation.
//!
//! ## Features
//!
//! - **Kernel convolution**: Box, Gaussian, sharpen and motion blur with clamp-to-edge sampling
//! - **Edge detection**: Sobel, Scharr and Prewitt gradient magnitude
//! - **Color**: Invert, grayscale, sepia, brightness and gray-world balance
//! - **Geometry**: Translate, rotate, wave, downsample and glass remaps
//! - **Progress & cancellation**: Every column reports progress, then checks for cancellation
//! - **Parallel scans**: Optional rayon-backed column batches
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rasterfx::prelude::*;
//!
//! let registry = FilterRegistry::with_builtins();
//! let blur = registry.create("gaussian_blur").unwrap();
//!
//! let source = image::open("input.png").unwrap().to_rgb8();
//! let tracker = ProgressTracker::new();
//! let result = blur.process_image(&source, &tracker).unwrap();
//! result.save("output.png").unwrap();
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Image aliases, kernels, the [`Filter`](core::Filter) trait and errors
//! - [`execution`]: The column scan loop and progress tracking
//! - [`filters`]: Filter registry, JSON configs and built-in filters
//!
//! ## Creating Custom Filters
//!
//! Implement [`Filter::compute_pixel`](core::Filter::compute_pixel); the
//! default scan loop handles progress and cancellation:
//!
//! ```rust
//! use rasterfx::prelude::*;
//!
//! struct SwapRedBlue;
//!
//! impl Filter for SwapRedBlue {
//!     fn metadata(&self) -> FilterMetadata {
//!         FilterMetadata::new("swap_rb", "Swap Red/Blue", Category::Color, "Swap red and blue")
//!     }
//!
//!     fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
//!         let p = source.get_pixel(x, y);
//!         image::Rgb([p[2], p[1], p[0]])
//!     }
//! }
//!
//! let source = Image::from_pixel(2, 2, image::Rgb([1, 2, 3]));
//! let result = SwapRedBlue.process_image(&source, &NullProgress).unwrap();
//! assert_eq!(*result.get_pixel(0, 0), image::Rgb([3, 2, 1]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use rasterfx::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{clamp, Color, Image, BLACK};
    pub use crate::core::kernel::Kernel;

    // Filter trait and metadata
    pub use crate::core::filter::{Category, Filter, FilterMetadata};

    // Errors
    pub use crate::core::error::{Channel, FilterError, FilterResult};

    // Execution
    pub use crate::execution::progress::{
        NullProgress, ProgressCallback, ProgressSink, ProgressTracker, ProgressUpdate,
    };
    pub use crate::execution::scan::{scan_columns, ScanOptions};

    // Filters
    pub use crate::filters::config::{FilterConfig, JobConfig};
    pub use crate::filters::registry::{FilterFactory, FilterRegistry, RegistryEntry};

    // Built-in filters
    pub use crate::filters::builtin::{
        // Convolution
        ConvolutionFilter, GradientFilter, GradientMagnitude,
        // Color
        Brightness, Grayscale, Invert, Sepia, GrayWorld,
        // Transform
        Downsample, Glass, Jitter, JitterMode, Rotate, Translate, Wave, WavePhase,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "rasterfx");
    }

    #[test]
    fn test_registry_filters_run() {
        let registry = FilterRegistry::with_builtins();
        let source = Image::from_fn(6, 4, |x, y| image::Rgb([(x * 40) as u8, (y * 60) as u8, 90]));

        for id in registry.filter_ids() {
            let filter = registry.create(id).unwrap();
            let result = filter.process_image(&source, &NullProgress).unwrap();
            assert_eq!(result.dimensions(), source.dimensions(), "{}", id);
        }
    }

    #[test]
    fn test_config_filter_reports_progress() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        let tracker = ProgressTracker::new().with_callback(Box::new(move |u| sink.lock().push(u)));

        let filter = FilterConfig::Invert.build().unwrap();
        let source = Image::from_pixel(4, 1, image::Rgb([0, 0, 0]));
        filter.process_image(&source, &tracker).unwrap();

        let percents: Vec<u8> = updates
            .lock()
            .iter()
            .filter_map(|u| match u {
                ProgressUpdate::Progress { percent } => Some(*percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents, vec![0, 25, 50, 75]);
    }
}
