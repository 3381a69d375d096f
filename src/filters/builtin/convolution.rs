//! Single-kernel convolution filters: box blur, Gaussian blur, sharpen, motion blur.

use crate::core::error::FilterResult;
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::kernel::Kernel;
use crate::core::types::{channel_from_f32, clamp, Color, Image};
use crate::filters::registry::FilterRegistry;
use image::Rgb;
use log::debug;

/// Default Gaussian radius.
pub const GAUSSIAN_RADIUS: usize = 3;
/// Default Gaussian sigma.
pub const GAUSSIAN_SIGMA: f32 = 2.0;
/// Default motion blur kernel size.
pub const MOTION_BLUR_SIZE: usize = 5;

/// Register convolution filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Ok(Box::new(ConvolutionFilter::box_blur())));
    registry.register(|| Ok(Box::new(ConvolutionFilter::gaussian_blur()?)));
    registry.register(|| Ok(Box::new(ConvolutionFilter::sharpen())));
    registry.register(|| Ok(Box::new(ConvolutionFilter::motion_blur(MOTION_BLUR_SIZE)?)));
}

/// Weighted neighborhood sum around `(x, y)` with clamp-to-edge sampling.
///
/// Returns the raw per-channel accumulators before any clamping.
pub fn convolve(source: &Image, kernel: &Kernel, x: u32, y: u32) -> [f32; 3] {
    let max_x = source.width() as i32 - 1;
    let max_y = source.height() as i32 - 1;
    let radius_x = kernel.radius_x();
    let radius_y = kernel.radius_y();
    let mut acc = [0.0f32; 3];

    for l in -radius_y..=radius_y {
        for k in -radius_x..=radius_x {
            let idx = clamp(x as i32 + k, 0, max_x) as u32;
            let idy = clamp(y as i32 + l, 0, max_y) as u32;
            let neighbor = source.get_pixel(idx, idy);
            let weight = kernel.at(k, l);
            acc[0] += neighbor[0] as f32 * weight;
            acc[1] += neighbor[1] as f32 * weight;
            acc[2] += neighbor[2] as f32 * weight;
        }
    }

    acc
}

/// Applies one kernel to every pixel.
#[derive(Debug, Clone)]
pub struct ConvolutionFilter {
    kernel: Kernel,
    metadata: FilterMetadata,
}

impl ConvolutionFilter {
    /// Convolve with an arbitrary kernel.
    pub fn new(kernel: Kernel) -> Self {
        Self::with_metadata(
            kernel,
            FilterMetadata::new(
                "convolution",
                "Convolution",
                Category::Blur,
                "Convolve the image with a custom kernel",
            ),
        )
    }

    fn with_metadata(kernel: Kernel, metadata: FilterMetadata) -> Self {
        debug!(
            "{}: {}x{} kernel",
            metadata.id,
            kernel.width(),
            kernel.height()
        );
        Self { kernel, metadata }
    }

    /// 3×3 uniform box blur.
    pub fn box_blur() -> Self {
        Self::with_metadata(Kernel::from_3x3([[1.0 / 9.0; 3]; 3]), Self::box_blur_metadata())
    }

    /// Box blur with an explicit odd kernel size.
    pub fn box_blur_sized(size_x: usize, size_y: usize) -> FilterResult<Self> {
        Ok(Self::with_metadata(
            Kernel::box_kernel(size_x, size_y)?,
            Self::box_blur_metadata(),
        ))
    }

    fn box_blur_metadata() -> FilterMetadata {
        FilterMetadata::new(
            "box_blur",
            "Box Blur",
            Category::Blur,
            "Average each pixel with its neighborhood",
        )
    }

    /// Gaussian blur with radius 3 and sigma 2.
    pub fn gaussian_blur() -> FilterResult<Self> {
        Self::gaussian_blur_with(GAUSSIAN_RADIUS, GAUSSIAN_SIGMA)
    }

    /// Gaussian blur with explicit parameters.
    pub fn gaussian_blur_with(radius: usize, sigma: f32) -> FilterResult<Self> {
        Ok(Self::with_metadata(
            Kernel::gaussian(radius, sigma)?,
            FilterMetadata::new(
                "gaussian_blur",
                "Gaussian Blur",
                Category::Blur,
                "Blur with a normalized Gaussian kernel",
            ),
        ))
    }

    /// 3×3 sharpen kernel with center weight 9.
    pub fn sharpen() -> Self {
        let kernel = Kernel::from_3x3([
            [-1.0, -1.0, -1.0],
            [-1.0, 9.0, -1.0],
            [-1.0, -1.0, -1.0],
        ]);
        Self::with_metadata(
            kernel,
            FilterMetadata::new(
                "sharpen",
                "Sharpen",
                Category::Sharpen,
                "Emphasize local contrast",
            ),
        )
    }

    /// Diagonal motion blur of the given odd size.
    pub fn motion_blur(size: usize) -> FilterResult<Self> {
        Ok(Self::with_metadata(
            Kernel::motion_blur(size)?,
            FilterMetadata::new(
                "motion_blur",
                "Motion Blur",
                Category::Blur,
                "Smear pixels along the main diagonal",
            ),
        ))
    }

    /// The kernel this filter applies.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl Filter for ConvolutionFilter {
    fn metadata(&self) -> FilterMetadata {
        self.metadata.clone()
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let [r, g, b] = convolve(source, &self.kernel, x, y);
        Rgb([channel_from_f32(r), channel_from_f32(g), channel_from_f32(b)])
    }
}
