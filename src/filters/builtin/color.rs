//! Pointwise color filters: invert, grayscale, sepia, brightness.

use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::types::{clamp, rgb, Color, Image};
use crate::filters::registry::FilterRegistry;
use image::Rgb;

/// Default sepia tint strength.
pub const SEPIA_DEPTH: i32 = 20;
/// Default brightness offset used by the registry.
pub const BRIGHTNESS_FACTOR: i32 = 20;

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Ok(Box::new(Invert)));
    registry.register(|| Ok(Box::new(Grayscale)));
    registry.register(|| Ok(Box::new(Sepia::default())));
    registry.register(|| Ok(Box::new(Brightness::new(BRIGHTNESS_FACTOR))));
}

/// Luma in hundredths: `36R + 53G + 11B`.
///
/// Integer weights keep gray inputs exact, so grayscale is idempotent.
#[inline]
fn luma_hundredths(pixel: &Color) -> i32 {
    36 * pixel[0] as i32 + 53 * pixel[1] as i32 + 11 * pixel[2] as i32
}

/// Luma `0.36R + 0.53G + 0.11B`, truncated.
#[inline]
pub fn luma(pixel: &Color) -> u8 {
    clamp(luma_hundredths(pixel) / 100, 0, 255) as u8
}

/// Inverts each channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl Filter for Invert {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("invert", "Invert Colors", Category::Color, "Invert the colors of an image")
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let p = source.get_pixel(x, y);
        Rgb([255 - p[0], 255 - p[1], 255 - p[2]])
    }
}

/// Replaces each pixel with its luma.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl Filter for Grayscale {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("grayscale", "Grayscale", Category::Color, "Convert an image to grayscale")
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let i = luma(source.get_pixel(x, y));
        Rgb([i, i, i])
    }
}

/// Warm brown tint derived from luma.
#[derive(Debug, Clone, Copy)]
pub struct Sepia {
    depth: i32,
}

impl Sepia {
    /// Sepia with the given tint strength `k`: `(I + 2k, I + k/2, I - k)`.
    pub fn new(depth: i32) -> Self {
        Self { depth }
    }
}

impl Default for Sepia {
    fn default() -> Self {
        Self::new(SEPIA_DEPTH)
    }
}

impl Filter for Sepia {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("sepia", "Sepia", Category::Color, "Apply a sepia tone")
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let i = luma_hundredths(source.get_pixel(x, y)) as i64;
        let k = self.depth as i64;
        let channel = |v: i64| v.clamp(0, 255) as u8;
        Rgb([
            channel((i + 200 * k) / 100),
            channel((i + 50 * k) / 100),
            channel((i - 100 * k) / 100),
        ])
    }
}

/// Adds a constant to every channel.
#[derive(Debug, Clone, Copy)]
pub struct Brightness {
    factor: i32,
}

impl Brightness {
    /// Brightness shift by `factor` (may be negative).
    pub fn new(factor: i32) -> Self {
        Self { factor }
    }

    /// The channel offset.
    pub fn factor(&self) -> i32 {
        self.factor
    }
}

impl Filter for Brightness {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("brightness", "Brightness", Category::Adjust, "Adjust the brightness of an image")
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let p = source.get_pixel(x, y);
        rgb(
            (p[0] as i32).saturating_add(self.factor),
            (p[1] as i32).saturating_add(self.factor),
            (p[2] as i32).saturating_add(self.factor),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::progress::NullProgress;

    fn scenario() -> Image {
        let mut img = Image::new(2, 2);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));
        img.put_pixel(0, 1, Rgb([70, 80, 90]));
        img.put_pixel(1, 1, Rgb([100, 110, 120]));
        img
    }

    #[test]
    fn test_invert_scenario() {
        let result = Invert.process_image(&scenario(), &NullProgress).unwrap();
        assert_eq!(*result.get_pixel(0, 0), Rgb([245, 235, 225]));
        assert_eq!(*result.get_pixel(1, 0), Rgb([215, 205, 195]));
        assert_eq!(*result.get_pixel(0, 1), Rgb([185, 175, 165]));
        assert_eq!(*result.get_pixel(1, 1), Rgb([155, 145, 135]));
    }

    #[test]
    fn test_invert_twice_restores() {
        let source = scenario();
        let once = Invert.process_image(&source, &NullProgress).unwrap();
        let twice = Invert.process_image(&once, &NullProgress).unwrap();
        assert_eq!(twice, source);
    }

    #[test]
    fn test_grayscale_weights() {
        // 0.36 * 100 + 0.53 * 50 + 0.11 * 10 = 36 + 26.5 + 1.1 = 63.6
        let source = Image::from_pixel(1, 1, Rgb([100, 50, 10]));
        assert_eq!(Grayscale.compute_pixel(&source, 0, 0), Rgb([63, 63, 63]));
    }

    #[test]
    fn test_grayscale_is_idempotent_on_gray() {
        for v in [0u8, 107, 189, 214, 239, 255] {
            let source = Image::from_pixel(1, 1, Rgb([v, v, v]));
            assert_eq!(Grayscale.compute_pixel(&source, 0, 0), Rgb([v, v, v]));
        }
    }

    #[test]
    fn test_sepia_offsets() {
        let source = Image::from_pixel(1, 1, Rgb([100, 100, 100]));
        assert_eq!(Sepia::default().compute_pixel(&source, 0, 0), Rgb([140, 110, 80]));

        let dark = Image::from_pixel(1, 1, Rgb([5, 5, 5]));
        assert_eq!(Sepia::default().compute_pixel(&dark, 0, 0), Rgb([45, 15, 0]));

        let bright = Image::from_pixel(1, 1, Rgb([250, 250, 250]));
        assert_eq!(Sepia::default().compute_pixel(&bright, 0, 0), Rgb([255, 255, 230]));
    }

    #[test]
    fn test_brightness_clamps() {
        let source = Image::from_pixel(1, 1, Rgb([250, 0, 128]));
        assert_eq!(Brightness::new(10).compute_pixel(&source, 0, 0), Rgb([255, 10, 138]));
        assert_eq!(Brightness::new(-10).compute_pixel(&source, 0, 0), Rgb([240, 0, 118]));
    }

    #[test]
    fn test_extreme_factors_saturate() {
        let source = Image::from_pixel(1, 1, Rgb([250, 0, 128]));
        assert_eq!(Brightness::new(i32::MAX).compute_pixel(&source, 0, 0), Rgb([255, 255, 255]));
        assert_eq!(Brightness::new(i32::MIN).compute_pixel(&source, 0, 0), Rgb([0, 0, 0]));
        assert_eq!(Sepia::new(i32::MAX).compute_pixel(&source, 0, 0), Rgb([255, 255, 0]));
        assert_eq!(Sepia::new(i32::MIN).compute_pixel(&source, 0, 0), Rgb([0, 0, 255]));
    }
}
