//! Core pixel types and helpers shared by every filter.

use image::{ImageBuffer, Rgb};

/// An 8-bit RGB raster, the only image type filters consume and produce.
pub type Image = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// A single output color.
pub type Color = Rgb<u8>;

/// Solid black, produced by remap filters for out-of-range coordinates.
pub const BLACK: Color = Rgb([0, 0, 0]);

/// Bound `value` to `[min, max]`.
///
/// Unlike [`i32::clamp`] this never panics: when `min > max` the lower bound
/// is checked first.
#[inline]
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

/// Truncate a floating-point channel toward zero, then clamp it to a byte.
#[inline]
pub fn channel_from_f32(value: f32) -> u8 {
    clamp(value as i32, 0, 255) as u8
}

/// Same as [`channel_from_f32`] for `f64` arithmetic.
#[inline]
pub fn channel_from_f64(value: f64) -> u8 {
    clamp(value as i32, 0, 255) as u8
}

/// Build a color from three already-clamped integer channels.
#[inline]
pub fn rgb(r: i32, g: i32, b: i32) -> Color {
    Rgb([
        clamp(r, 0, 255) as u8,
        clamp(g, 0, 255) as u8,
        clamp(b, 0, 255) as u8,
    ])
}

/// Allocate a black image with the same dimensions as `source`.
pub fn blank_like(source: &Image) -> Image {
    Image::new(source.width(), source.height())
}
