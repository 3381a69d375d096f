//! Geometric remap filters: translate, rotate, waves, downsample, glass.
//!
//! Every filter maps a destination pixel to a source coordinate and copies
//! that pixel without interpolation. Coordinates outside the accepted range
//! produce black. Most remaps treat row and column 0 as out of range.
//!
//! The wave phase `2πy/60` (or `2πx/30`) is used directly as radians. Older
//! builds converted it from degrees a second time, which shrank the warp to
//! under a pixel; those outputs are not reproduced.

use crate::core::error::{FilterError, FilterResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::types::{Color, Image, BLACK};
use crate::filters::registry::FilterRegistry;
use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Default translation used by the registry.
pub const TRANSLATE_OFFSET: i32 = 50;
/// Default rotation used by the registry.
pub const ROTATE_DEGREES: i32 = 15;
/// Horizontal displacement of the wave filters, in pixels.
pub const WAVE_AMPLITUDE: f64 = 20.0;
/// Scale applied to jittered coordinates.
pub const JITTER_SCALE: f64 = 10.0;
/// Exclusive upper bound of the integer draw in [`JitterMode::Legacy`].
///
/// A bound of 1 means every draw is 0, so legacy jitter is a constant shift.
pub const LEGACY_JITTER_BOUND: i32 = 1;

/// Register transform filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Ok(Box::new(Translate::new(TRANSLATE_OFFSET)?)));
    registry.register(|| Ok(Box::new(Rotate::new(ROTATE_DEGREES))));
    registry.register(|| Ok(Box::new(Wave::new(WavePhase::Row))));
    registry.register(|| Ok(Box::new(Wave::new(WavePhase::Column))));
    registry.register(|| Ok(Box::new(Downsample::new(Jitter::legacy()))));
    registry.register(|| Ok(Box::new(Glass::new(Jitter::legacy()))));
}

/// `0 < v <= max`; column and row 0 count as out of range.
#[inline]
fn within_open_low(v: i64, max: i64) -> bool {
    v > 0 && v <= max
}

#[inline]
fn sample(source: &Image, sx: i64, sy: i64) -> Color {
    *source.get_pixel(sx as u32, sy as u32)
}

/// Shifts the image left by `offset` columns.
#[derive(Debug, Clone, Copy)]
pub struct Translate {
    offset: i32,
}

impl Translate {
    /// Create a translation. Negative offsets are rejected.
    pub fn new(offset: i32) -> FilterResult<Self> {
        if offset < 0 {
            return Err(FilterError::invalid(
                "offset",
                format!("must be non-negative, got {}", offset),
            ));
        }
        Ok(Self { offset })
    }
}

impl Filter for Translate {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new(
            "translate",
            "Translate",
            Category::Transform,
            "Shift the image horizontally",
        )
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let sx = x as i64 + self.offset as i64;
        if sx >= source.width() as i64 {
            return BLACK;
        }
        sample(source, sx, y as i64)
    }
}

/// Rotates around the image center.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    degrees: i32,
    radian: f64,
}

impl Rotate {
    /// Rotation by whole degrees.
    pub fn new(degrees: i32) -> Self {
        Self {
            degrees,
            radian: degrees as f64 * PI / 180.0,
        }
    }

    /// The rotation angle in degrees.
    pub fn degrees(&self) -> i32 {
        self.degrees
    }
}

impl Filter for Rotate {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new(
            "rotate",
            "Rotate",
            Category::Transform,
            "Rotate the image around its center",
        )
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let cx = (source.width() / 2) as f64;
        let cy = (source.height() / 2) as f64;
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let (sin, cos) = self.radian.sin_cos();
        let sx = (dx * cos - dy * sin + cx) as i64;
        let sy = (dx * sin + dy * cos + cy) as i64;

        if !within_open_low(sx, source.width() as i64 - 1)
            || !within_open_low(sy, source.height() as i64 - 1)
        {
            return BLACK;
        }
        sample(source, sx, sy)
    }
}

/// Which destination coordinate drives the wave phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    /// `sx = x + 20 sin(2πy / 60)`
    Row,
    /// `sx = x + 20 sin(2πx / 30)`
    Column,
}

impl WavePhase {
    fn displacement(self, x: u32, y: u32) -> f64 {
        match self {
            WavePhase::Row => WAVE_AMPLITUDE * (2.0 * PI * y as f64 / 60.0).sin(),
            WavePhase::Column => WAVE_AMPLITUDE * (2.0 * PI * x as f64 / 30.0).sin(),
        }
    }
}

/// Sinusoidal horizontal warp.
#[derive(Debug, Clone, Copy)]
pub struct Wave {
    phase: WavePhase,
}

impl Wave {
    /// Wave driven by the given phase.
    pub fn new(phase: WavePhase) -> Self {
        Self { phase }
    }
}

impl Filter for Wave {
    fn metadata(&self) -> FilterMetadata {
        match self.phase {
            WavePhase::Row => FilterMetadata::new(
                "wave_rows",
                "Waves (rows)",
                Category::Distort,
                "Displace columns by a sine of the row",
            ),
            WavePhase::Column => FilterMetadata::new(
                "wave_columns",
                "Waves (columns)",
                Category::Distort,
                "Displace columns by a sine of the column",
            ),
        }
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let sx = (x as f64 + self.phase.displacement(x, y)) as i64;
        if !within_open_low(sx, source.width() as i64 - 1) {
            return BLACK;
        }
        sample(source, sx, y as i64)
    }
}

/// How jitter filters draw their random term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    /// Integer draw below [`LEGACY_JITTER_BOUND`]; always 0.
    #[default]
    Legacy,
    /// Uniform draw in `[0, 1)`.
    Uniform,
}

/// A seedable random source advanced once per pixel.
#[derive(Debug)]
pub struct Jitter {
    mode: JitterMode,
    rng: Mutex<StdRng>,
}

impl Jitter {
    /// Jitter with an explicit mode and optional seed.
    pub fn new(mode: JitterMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("jitter mode {:?}, seeded: {}", mode, seed.is_some());
        Self {
            mode,
            rng: Mutex::new(rng),
        }
    }

    /// The default, effectively constant, jitter.
    pub fn legacy() -> Self {
        Self::new(JitterMode::Legacy, None)
    }

    /// Uniform jitter from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(JitterMode::Uniform, Some(seed))
    }

    /// The draw mode.
    pub fn mode(&self) -> JitterMode {
        self.mode
    }

    /// Draw the next random term.
    pub fn draw(&self) -> f64 {
        let mut rng = self.rng.lock();
        match self.mode {
            JitterMode::Legacy => rng.gen_range(0..LEGACY_JITTER_BOUND) as f64,
            JitterMode::Uniform => rng.gen::<f64>(),
        }
    }
}

/// Samples every tenth source pixel, producing a magnified corner.
#[derive(Debug)]
pub struct Downsample {
    jitter: Jitter,
}

impl Downsample {
    /// Downsample using the given random source.
    pub fn new(jitter: Jitter) -> Self {
        Self { jitter }
    }
}

impl Filter for Downsample {
    fn metadata(&self) -> FilterMetadata {
        let metadata = FilterMetadata::new(
            "downsample",
            "Downsample",
            Category::Distort,
            "Sample the source on a 10-pixel grid",
        );
        match self.jitter.mode() {
            JitterMode::Legacy => metadata,
            JitterMode::Uniform => metadata.nondeterministic(),
        }
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let sx = ((x as f64 + self.jitter.draw() - 0.5) * JITTER_SCALE).floor() as i64;
        let sy = ((y as f64 + self.jitter.draw() - 0.5) * JITTER_SCALE).floor() as i64;
        if !within_open_low(sx, source.width() as i64 - 1)
            || !within_open_low(sy, source.height() as i64 - 1)
        {
            return BLACK;
        }
        sample(source, sx, sy)
    }
}

/// Frosted-glass displacement by a random offset.
#[derive(Debug)]
pub struct Glass {
    jitter: Jitter,
}

impl Glass {
    /// Glass using the given random source.
    pub fn new(jitter: Jitter) -> Self {
        Self { jitter }
    }
}

impl Filter for Glass {
    fn metadata(&self) -> FilterMetadata {
        let metadata = FilterMetadata::new(
            "glass",
            "Glass",
            Category::Distort,
            "Displace each pixel by a random offset",
        );
        match self.jitter.mode() {
            JitterMode::Legacy => metadata,
            JitterMode::Uniform => metadata.nondeterministic(),
        }
    }

    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        let sx = x as i64 + ((self.jitter.draw() - 0.5) * JITTER_SCALE).floor() as i64;
        let sy = y as i64 + ((self.jitter.draw() - 0.5) * JITTER_SCALE).floor() as i64;
        if !within_open_low(sx, source.width() as i64 - 1)
            || !within_open_low(sy, source.height() as i64 - 1)
        {
            return BLACK;
        }
        sample(source, sx, sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::progress::NullProgress;
    use image::Rgb;

    fn coordinates(width: u32, height: u32) -> Image {
        Image::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
    }

    #[test]
    fn test_translate_shifts_left() {
        let source = coordinates(6, 2);
        let filter = Translate::new(2).unwrap();
        assert_eq!(filter.compute_pixel(&source, 0, 1), Rgb([2, 1, 200]));
        assert_eq!(filter.compute_pixel(&source, 3, 0), Rgb([5, 0, 200]));
        assert_eq!(filter.compute_pixel(&source, 4, 0), BLACK);
    }

    #[test]
    fn test_translate_beyond_width_is_black() {
        let source = coordinates(5, 4);
        let result = Translate::new(5)
            .unwrap()
            .process_image(&source, &NullProgress)
            .unwrap();
        assert!(result.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_translate_zero_keeps_column_zero() {
        let source = coordinates(3, 3);
        let result = Translate::new(0)
            .unwrap()
            .process_image(&source, &NullProgress)
            .unwrap();
        assert_eq!(result, source);
    }

    #[test]
    fn test_translate_rejects_negative_offset() {
        assert!(Translate::new(-1).is_err());
    }

    #[test]
    fn test_rotate_zero_blacks_out_first_row_and_column() {
        let source = coordinates(5, 5);
        let result = Rotate::new(0).process_image(&source, &NullProgress).unwrap();
        for x in 0..5 {
            assert_eq!(*result.get_pixel(x, 0), BLACK);
            assert_eq!(*result.get_pixel(0, x), BLACK);
        }
        assert_eq!(*result.get_pixel(3, 2), Rgb([3, 2, 200]));
        assert_eq!(*result.get_pixel(4, 4), Rgb([4, 4, 200]));
    }

    #[test]
    fn test_rotate_half_turn() {
        let source = coordinates(5, 5);
        let filter = Rotate::new(180);
        // (1, 1) maps to (2 - -1, 2 - -1) = (3, 3) up to float error
        let p = filter.compute_pixel(&source, 1, 1);
        assert!(p == Rgb([3, 3, 200]) || p == Rgb([2, 2, 200]) || p == Rgb([3, 2, 200]) || p == Rgb([2, 3, 200]));
        // The center maps to itself
        assert_eq!(filter.compute_pixel(&source, 2, 2), Rgb([2, 2, 200]));
    }

    #[test]
    fn test_wave_rows_peak_displacement() {
        let source = coordinates(60, 60);
        let filter = Wave::new(WavePhase::Row);
        // sin(2π·15/60) = 1, so x shifts by 20
        assert_eq!(filter.compute_pixel(&source, 10, 15), Rgb([30, 15, 200]));
        // Row 0 has no displacement but column 0 is out of range
        assert_eq!(filter.compute_pixel(&source, 0, 0), BLACK);
        assert_eq!(filter.compute_pixel(&source, 45, 15), BLACK);
    }

    #[test]
    fn test_wave_columns_phase() {
        let source = coordinates(60, 4);
        let filter = Wave::new(WavePhase::Column);
        // sin(2π·15/30) = sin(π), a tiny positive residue
        assert_eq!(filter.compute_pixel(&source, 15, 3), Rgb([15, 3, 200]));
        // sin(2π·7.5/30) peaks between columns; column 8 shifts by 19.8 -> 27
        assert_eq!(filter.compute_pixel(&source, 8, 1), Rgb([27, 1, 200]));
    }

    #[test]
    fn test_legacy_jitter_always_zero() {
        let jitter = Jitter::legacy();
        assert!((0..100).all(|_| jitter.draw() == 0.0));
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = Jitter::seeded(7);
        let b = Jitter::seeded(7);
        for _ in 0..10 {
            let v = a.draw();
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, b.draw());
        }
    }

    #[test]
    fn test_downsample_legacy_grid() {
        let source = Image::from_fn(40, 40, |x, y| Rgb([x as u8, y as u8, 0]));
        let filter = Downsample::new(Jitter::legacy());
        // x = 2 -> (2 - 0.5) * 10 = 15
        assert_eq!(filter.compute_pixel(&source, 2, 3), Rgb([15, 25, 0]));
        // x = 0 -> -5, out of range
        assert_eq!(filter.compute_pixel(&source, 0, 3), BLACK);
        // x = 4 -> 35; x = 5 -> 45 beyond the image
        assert_eq!(filter.compute_pixel(&source, 4, 1), Rgb([35, 5, 0]));
        assert_eq!(filter.compute_pixel(&source, 5, 1), BLACK);
        assert!(filter.metadata().deterministic);
    }

    #[test]
    fn test_glass_legacy_constant_shift() {
        let source = coordinates(20, 20);
        let filter = Glass::new(Jitter::legacy());
        assert_eq!(filter.compute_pixel(&source, 10, 12), Rgb([5, 7, 200]));
        assert_eq!(filter.compute_pixel(&source, 5, 12), BLACK);
        assert_eq!(filter.compute_pixel(&source, 6, 6), Rgb([1, 1, 200]));
    }

    #[test]
    fn test_glass_uniform_stays_within_radius() {
        let source = coordinates(30, 30);
        let filter = Glass::new(Jitter::seeded(42));
        assert!(!filter.metadata().deterministic);
        for _ in 0..50 {
            let p = filter.compute_pixel(&source, 15, 15);
            assert!((10..=19).contains(&p[0]), "{:?}", p);
            assert!((10..=19).contains(&p[1]), "{:?}", p);
        }
    }

    #[test]
    fn test_seeded_glass_is_reproducible() {
        let source = coordinates(16, 16);
        let a = Glass::new(Jitter::seeded(3))
            .process_image(&source, &NullProgress)
            .unwrap();
        let b = Glass::new(Jitter::seeded(3))
            .process_image(&source, &NullProgress)
            .unwrap();
        assert_eq!(a, b);
    }
}
