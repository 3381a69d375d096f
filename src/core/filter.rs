//! The Filter trait and filter metadata.
//!
//! A filter is a pure per-pixel function of the source image plus its own
//! immutable parameters. The default [`Filter::process_image`] drives the
//! column scan; filters that need whole-image statistics override it.

use crate::core::error::FilterResult;
use crate::core::types::{Color, Image};
use crate::execution::progress::ProgressSink;
use crate::execution::scan::{scan_columns, ScanOptions};
use serde::{Deserialize, Serialize};

/// Category for organizing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Per-pixel color transforms (invert, grayscale, sepia)
    Color,
    /// Tonal adjustments (brightness, color balance)
    Adjust,
    /// Blur effects
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Edge detection
    Edge,
    /// Geometric transforms (translate, rotate)
    Transform,
    /// Distortions (waves, glass, pixelation)
    Distort,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Color => "Color",
            Category::Adjust => "Adjust",
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Edge => "Edge",
            Category::Transform => "Transform",
            Category::Distort => "Distort",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Color,
            Category::Adjust,
            Category::Blur,
            Category::Sharpen,
            Category::Edge,
            Category::Transform,
            Category::Distort,
        ]
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Unique identifier for this filter type (e.g., "gaussian_blur")
    pub id: String,
    /// Human-readable name (e.g., "Gaussian Blur")
    pub name: String,
    /// Category for organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Whether the same input always gives the same output
    pub deterministic: bool,
}

impl FilterMetadata {
    /// Create metadata for a deterministic filter.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            deterministic: true,
        }
    }

    /// Mark the filter as drawing randomness per pixel.
    pub fn nondeterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }
}

/// The core trait implemented by every filter.
///
/// Implementations hold only immutable parameters (or interior-mutable random
/// sources), so one instance may be shared across threads.
pub trait Filter: Send + Sync {
    /// Describe this filter.
    fn metadata(&self) -> FilterMetadata;

    /// Compute the output color for `(x, y)` from the unmodified source image.
    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color;

    /// Produce a new image of identical dimensions, or
    /// [`FilterError::Cancelled`](crate::core::error::FilterError::Cancelled).
    fn process_image(&self, source: &Image, progress: &dyn ProgressSink) -> FilterResult<Image> {
        self.process_image_with(source, progress, &ScanOptions::default())
    }

    /// Same as [`Filter::process_image`] with explicit scan options.
    fn process_image_with(
        &self,
        source: &Image,
        progress: &dyn ProgressSink,
        options: &ScanOptions,
    ) -> FilterResult<Image> {
        scan_columns(source, progress, options, |img, x, y| {
            self.compute_pixel(img, x, y)
        })
    }
}

impl std::fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter({})", self.metadata().id)
    }
}

/// Filter that copies the source unchanged.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct PassthroughFilter;

#[cfg(test)]
impl Filter for PassthroughFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new(
            "passthrough",
            "Passthrough",
            Category::Color,
            "Passes the source through unchanged",
        )
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        *source.get_pixel(x, y)
    }
}
