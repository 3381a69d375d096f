//! Gray-world color balance.
//!
//! Two passes: whole-image channel statistics first, then a per-pixel rescale
//! through the shared column scan. The first pass neither reports progress nor
//! polls cancellation.

use crate::core::error::{Channel, FilterError, FilterResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::types::{channel_from_f64, Color, Image};
use crate::execution::progress::ProgressSink;
use crate::execution::scan::{scan_columns, ScanOptions};
use crate::filters::registry::FilterRegistry;
use image::Rgb;
use log::{debug, warn};

/// Register balance filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Ok(Box::new(GrayWorld::new())));
}

/// Per-channel means.
///
/// Channel sums are divided by `width + height` rather than the pixel count.
/// The divisor cancels in the per-pixel ratio `average / mean`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMeans {
    /// Red channel mean.
    pub red: f64,
    /// Green channel mean.
    pub green: f64,
    /// Blue channel mean.
    pub blue: f64,
}

impl ChannelMeans {
    /// Accumulate statistics over every pixel of `source`.
    pub fn from_image(source: &Image) -> Self {
        let mut sums = [0.0f64; 3];
        for pixel in source.pixels() {
            sums[0] += pixel[0] as f64;
            sums[1] += pixel[1] as f64;
            sums[2] += pixel[2] as f64;
        }

        let divisor = (source.width() as f64 + source.height() as f64).max(1.0);
        Self {
            red: sums[0] / divisor,
            green: sums[1] / divisor,
            blue: sums[2] / divisor,
        }
    }

    /// Mean of one channel.
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// `(red + green + blue) / 3`.
    pub fn average(&self) -> f64 {
        (self.red + self.green + self.blue) / 3.0
    }
}

/// Rescales each channel so the image average becomes neutral gray.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayWorld {
    allow_degenerate: bool,
}

impl GrayWorld {
    /// Gray world that rejects images with an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave zero-mean channels unscaled instead of failing.
    pub fn with_allow_degenerate(mut self, allow: bool) -> Self {
        self.allow_degenerate = allow;
        self
    }

    /// Per-channel multipliers `average / mean`.
    pub fn scale_factors(&self, means: &ChannelMeans) -> FilterResult<[f64; 3]> {
        let average = means.average();
        let mut factors = [1.0; 3];

        for channel in Channel::ALL {
            let mean = means.get(channel);
            if mean == 0.0 {
                if !self.allow_degenerate {
                    return Err(FilterError::DivideByZero { channel });
                }
                warn!("{} channel mean is 0; leaving it unscaled", channel);
                continue;
            }
            factors[channel.index()] = average / mean;
        }

        Ok(factors)
    }
}

impl Filter for GrayWorld {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new(
            "gray_world",
            "Gray World",
            Category::Adjust,
            "Balance colors so the image average is neutral gray",
        )
    }

    /// The balanced color depends on whole-image statistics, which only
    /// [`Filter::process_image`] computes; in isolation the source pixel is
    /// returned unchanged.
    fn compute_pixel(&self, source: &Image, x: u32, y: u32) -> Color {
        *source.get_pixel(x, y)
    }

    fn process_image_with(
        &self,
        source: &Image,
        progress: &dyn ProgressSink,
        options: &ScanOptions,
    ) -> FilterResult<Image> {
        if source.width() == 0 || source.height() == 0 {
            return scan_columns(source, progress, options, |img, x, y| *img.get_pixel(x, y));
        }

        let means = ChannelMeans::from_image(source);
        let factors = self.scale_factors(&means)?;
        debug!("gray world means {:?}, factors {:?}", means, factors);

        let average = means.average();
        let scaled = |value: u8, channel: Channel| -> u8 {
            let mean = means.get(channel);
            if mean == 0.0 {
                value
            } else {
                channel_from_f64(value as f64 * average / mean)
            }
        };

        scan_columns(source, progress, options, |img, x, y| {
            let p = img.get_pixel(x, y);
            Rgb([
                scaled(p[0], Channel::Red),
                scaled(p[1], Channel::Green),
                scaled(p[2], Channel::Blue),
            ])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::progress::{NullProgress, ProgressTracker};

    #[test]
    fn test_means_use_width_plus_height() {
        let source = Image::from_pixel(3, 1, Rgb([30, 60, 90]));
        let means = ChannelMeans::from_image(&source);
        assert_eq!(means.red, 22.5);
        assert_eq!(means.green, 45.0);
        assert_eq!(means.blue, 67.5);
        assert_eq!(means.average(), 45.0);
    }

    #[test]
    fn test_uniform_color_becomes_gray() {
        let source = Image::from_pixel(3, 1, Rgb([30, 60, 90]));
        let result = GrayWorld::new().process_image(&source, &NullProgress).unwrap();
        assert!(result.pixels().all(|p| *p == Rgb([60, 60, 60])));
    }

    #[test]
    fn test_zero_channel_fails() {
        let source = Image::from_pixel(2, 2, Rgb([10, 0, 20]));
        let err = GrayWorld::new()
            .process_image(&source, &NullProgress)
            .unwrap_err();
        assert!(matches!(err, FilterError::DivideByZero { channel: Channel::Green }));
    }

    #[test]
    fn test_zero_channel_left_unscaled_when_allowed() {
        let source = Image::from_pixel(2, 2, Rgb([10, 0, 20]));
        let result = GrayWorld::new()
            .with_allow_degenerate(true)
            .process_image(&source, &NullProgress)
            .unwrap();
        assert!(result.pixels().all(|p| *p == Rgb([10, 0, 10])));
    }

    #[test]
    fn test_cancellation_honored_in_second_pass() {
        let source = Image::from_pixel(4, 4, Rgb([1, 2, 3]));
        let tracker = ProgressTracker::new();
        tracker.cancel();
        let result = GrayWorld::new().process_image(&source, &tracker);
        assert!(matches!(result, Err(FilterError::Cancelled)));
    }

    #[test]
    fn test_balance_scales_channels_independently() {
        let mut source = Image::from_pixel(2, 1, Rgb([100, 100, 100]));
        source.put_pixel(1, 0, Rgb([200, 100, 0]));
        // Sums 300/200/100 over (2 + 1): means 100, 66.67, 33.33; average 66.67
        let result = GrayWorld::new().process_image(&source, &NullProgress).unwrap();
        assert_eq!(*result.get_pixel(0, 0), Rgb([66, 100, 200]));
        assert_eq!(*result.get_pixel(1, 0), Rgb([133, 100, 0]));
    }

    #[test]
    fn test_empty_image() {
        let source = Image::new(0, 3);
        let result = GrayWorld::new().process_image(&source, &NullProgress).unwrap();
        assert_eq!(result.dimensions(), (0, 3));
    }
}
