//! Dual-kernel gradient operators: Sobel, Scharr, Prewitt.
//!
//! Each operator convolves the image twice, once per directional kernel, and
//! folds the two absolute responses into one value per channel.

use crate::core::error::{FilterError, FilterResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::kernel::Kernel;
use crate::core::types::{channel_from_f64, clamp, Color, Image};
use crate::filters::builtin::convolution::convolve;
use crate::filters::registry::FilterRegistry;
use image::Rgb;
use serde::{Deserialize, Serialize};

/// Register gradient filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Ok(Box::new(GradientFilter::sobel())));
    registry.register(|| Ok(Box::new(GradientFilter::scharr())));
    registry.register(|| Ok(Box::new(GradientFilter::prewitt())));
}

/// How the two directional responses are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMagnitude {
    /// `sqrt(x²) + y²`, i.e. `|x| + y²`. Saturates on almost any vertical
    /// response; kept as the default so existing outputs stay unchanged.
    #[default]
    Legacy,
    /// Conventional `sqrt(x² + y²)`.
    Euclidean,
}

impl GradientMagnitude {
    /// Combine two clamped, absolute responses into one channel value.
    #[inline]
    pub fn combine(self, x: u8, y: u8) -> u8 {
        let x = x as f64;
        let y = y as f64;
        match self {
            GradientMagnitude::Legacy => channel_from_f64(x.powi(2).sqrt() + y.powi(2)),
            GradientMagnitude::Euclidean => channel_from_f64((x.powi(2) + y.powi(2)).sqrt()),
        }
    }
}

/// A pair of same-shaped kernels applied together.
#[derive(Debug, Clone)]
pub struct GradientFilter {
    ox: Kernel,
    oy: Kernel,
    magnitude: GradientMagnitude,
    metadata: FilterMetadata,
}

impl GradientFilter {
    /// Build a gradient filter from an arbitrary kernel pair.
    pub fn new(ox: Kernel, oy: Kernel) -> FilterResult<Self> {
        if !ox.same_shape(&oy) {
            return Err(FilterError::invalid(
                "kernel pair",
                format!(
                    "OX is {}x{} but OY is {}x{}",
                    ox.width(),
                    ox.height(),
                    oy.width(),
                    oy.height()
                ),
            ));
        }
        Ok(Self::pair(
            ox,
            oy,
            FilterMetadata::new(
                "gradient",
                "Gradient",
                Category::Edge,
                "Combine two directional convolutions",
            ),
        ))
    }

    fn pair(ox: Kernel, oy: Kernel, metadata: FilterMetadata) -> Self {
        Self {
            ox,
            oy,
            magnitude: GradientMagnitude::default(),
            metadata,
        }
    }

    /// Sobel operator.
    pub fn sobel() -> Self {
        Self::pair(
            Kernel::from_3x3([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
            Kernel::from_3x3([[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]]),
            FilterMetadata::new("sobel", "Sobel", Category::Edge, "Sobel edge detector"),
        )
    }

    /// Scharr operator.
    pub fn scharr() -> Self {
        Self::pair(
            Kernel::from_3x3([[3.0, 0.0, -3.0], [10.0, 0.0, -10.0], [3.0, 0.0, -3.0]]),
            Kernel::from_3x3([[3.0, 10.0, 3.0], [0.0, 0.0, 0.0], [-3.0, -10.0, -3.0]]),
            FilterMetadata::new("scharr", "Scharr", Category::Edge, "Scharr edge detector"),
        )
    }

    /// Prewitt operator.
    pub fn prewitt() -> Self {
        Self::pair(
            Kernel::from_3x3([[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]),
            Kernel::from_3x3([[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]),
            FilterMetadata::new("prewitt", "Prewitt", Category::Edge, "Prewitt edge detector"),
        )
    }

    /// Choose how the directional responses are combined.
    pub fn with_magnitude(mut self, magnitude: GradientMagnitude) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// The combination in use.
    pub fn magnitude(&self) -> GradientMagnitude {
        self.magnitude
    }

    fn response(source: &Image, kernel: &Kernel, x: u32, y: u32) -> [u8; 3] {
        convolve(source, kernel, x, y).map(|acc| clamp(acc.abs() as i32, 0, 255) as u8)
    }
}

impl Filter for GradientFilter {
    fn metadata(&self) -> FilterMetadata {
        self.metadata.clone()
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let color_x = Self::response(source, &self.ox, x, y);
        let color_y = Self::response(source, &self.oy, x, y);
        Rgb([
            self.magnitude.combine(color_x[0], color_y[0]),
            self.magnitude.combine(color_x[1], color_y[1]),
            self.magnitude.combine(color_x[2], color_y[2]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::progress::NullProgress;

    fn ramp_x() -> Image {
        Image::from_fn(8, 5, |x, _| Rgb([x as u8, x as u8, x as u8]))
    }

    fn ramp_y() -> Image {
        Image::from_fn(5, 8, |_, y| Rgb([y as u8, 0, 0]))
    }

    #[test]
    fn test_uniform_image_has_no_edges() {
        let source = Image::from_pixel(4, 4, Rgb([77, 77, 77]));
        for filter in [GradientFilter::sobel(), GradientFilter::scharr(), GradientFilter::prewitt()] {
            let result = filter.process_image(&source, &NullProgress).unwrap();
            assert!(result.pixels().all(|p| *p == Rgb([0, 0, 0])));
        }
    }

    #[test]
    fn test_legacy_combination_squares_second_response() {
        // Horizontal ramp: only the second kernel responds, with |-8| = 8.
        let source = ramp_x();
        let legacy = GradientFilter::sobel();
        assert_eq!(legacy.compute_pixel(&source, 3, 2), Rgb([64, 64, 64]));

        let euclidean = GradientFilter::sobel().with_magnitude(GradientMagnitude::Euclidean);
        assert_eq!(euclidean.compute_pixel(&source, 3, 2), Rgb([8, 8, 8]));
    }

    #[test]
    fn test_first_response_passes_through_linearly() {
        // Vertical ramp: only the first kernel responds, with |-8| = 8.
        let source = ramp_y();
        let pixel = GradientFilter::sobel().compute_pixel(&source, 2, 3);
        assert_eq!(pixel, Rgb([8, 0, 0]));
    }

    #[test]
    fn test_combine_saturates() {
        assert_eq!(GradientMagnitude::Legacy.combine(0, 16), 255);
        assert_eq!(GradientMagnitude::Legacy.combine(3, 4), 19);
        assert_eq!(GradientMagnitude::Euclidean.combine(3, 4), 5);
        assert_eq!(GradientMagnitude::Euclidean.combine(255, 255), 255);
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let ox = Kernel::identity();
        let oy = Kernel::box_kernel(3, 3).unwrap();
        assert!(matches!(
            GradientFilter::new(ox, oy),
            Err(FilterError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_operator_ids() {
        assert_eq!(GradientFilter::sobel().metadata().id, "sobel");
        assert_eq!(GradientFilter::scharr().metadata().id, "scharr");
        assert_eq!(GradientFilter::prewitt().metadata().id, "prewitt");
    }
}
