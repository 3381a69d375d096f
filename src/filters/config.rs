//! Serializable filter selection.
//!
//! A [`FilterConfig`] names one filter and its parameters; [`FilterConfig::build`]
//! validates them and constructs the filter. Configs are read from JSON:
//!
//! ```json
//! { "filter": "gaussian_blur", "radius": 2, "sigma": 1.5 }
//! ```

use crate::core::error::FilterResult;
use crate::core::filter::Filter;
use crate::execution::scan::ScanOptions;
use crate::filters::builtin::balance::GrayWorld;
use crate::filters::builtin::color::{Brightness, Grayscale, Invert, Sepia, BRIGHTNESS_FACTOR, SEPIA_DEPTH};
use crate::filters::builtin::convolution::{
    ConvolutionFilter, GAUSSIAN_RADIUS, GAUSSIAN_SIGMA, MOTION_BLUR_SIZE,
};
use crate::filters::builtin::gradient::{GradientFilter, GradientMagnitude};
use crate::filters::builtin::transform::{
    Downsample, Glass, Jitter, JitterMode, Rotate, Translate, Wave, WavePhase, ROTATE_DEGREES,
    TRANSLATE_OFFSET,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_brightness() -> i32 {
    BRIGHTNESS_FACTOR
}

fn default_sepia() -> i32 {
    SEPIA_DEPTH
}

fn default_box_size() -> usize {
    3
}

fn default_radius() -> usize {
    GAUSSIAN_RADIUS
}

fn default_sigma() -> f32 {
    GAUSSIAN_SIGMA
}

fn default_motion_size() -> usize {
    MOTION_BLUR_SIZE
}

fn default_offset() -> i32 {
    TRANSLATE_OFFSET
}

fn default_degrees() -> i32 {
    ROTATE_DEGREES
}

fn default_phase() -> WavePhase {
    WavePhase::Row
}

/// One filter and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterConfig {
    /// [`Invert`].
    Invert,
    /// [`Grayscale`].
    Grayscale,
    /// [`Sepia`] with tint strength `depth`.
    Sepia {
        /// Tint strength `k`.
        #[serde(default = "default_sepia")]
        depth: i32,
    },
    /// [`Brightness`] shifted by `factor`.
    Brightness {
        /// Offset added to every channel.
        #[serde(default = "default_brightness")]
        factor: i32,
    },
    /// Box blur of `size_x` by `size_y`.
    BoxBlur {
        /// Odd kernel width.
        #[serde(default = "default_box_size")]
        size_x: usize,
        /// Odd kernel height.
        #[serde(default = "default_box_size")]
        size_y: usize,
    },
    /// Gaussian blur.
    GaussianBlur {
        /// Kernel radius; side is `2 * radius + 1`.
        #[serde(default = "default_radius")]
        radius: usize,
        /// Spread; must be non-zero.
        #[serde(default = "default_sigma")]
        sigma: f32,
    },
    /// 3×3 sharpen.
    Sharpen,
    /// Diagonal motion blur.
    MotionBlur {
        /// Odd kernel side.
        #[serde(default = "default_motion_size")]
        size: usize,
    },
    /// Sobel edges.
    Sobel {
        /// How the two responses combine.
        #[serde(default)]
        magnitude: GradientMagnitude,
    },
    /// Scharr edges.
    Scharr {
        /// How the two responses combine.
        #[serde(default)]
        magnitude: GradientMagnitude,
    },
    /// Prewitt edges.
    Prewitt {
        /// How the two responses combine.
        #[serde(default)]
        magnitude: GradientMagnitude,
    },
    /// [`Translate`] left by `offset` columns.
    Translate {
        /// Non-negative shift.
        #[serde(default = "default_offset")]
        offset: i32,
    },
    /// [`Rotate`] by `degrees`.
    Rotate {
        /// Angle in whole degrees.
        #[serde(default = "default_degrees")]
        degrees: i32,
    },
    /// [`Wave`] driven by `phase`.
    Wave {
        /// Row- or column-driven phase.
        #[serde(default = "default_phase")]
        phase: WavePhase,
    },
    /// [`Downsample`] with optional seeded jitter.
    Downsample {
        /// Random draw mode.
        #[serde(default)]
        jitter: JitterMode,
        /// Fixed RNG seed; entropy when absent.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// [`Glass`] with optional seeded jitter.
    Glass {
        /// Random draw mode.
        #[serde(default)]
        jitter: JitterMode,
        /// Fixed RNG seed; entropy when absent.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// [`GrayWorld`] balance.
    GrayWorld {
        /// Leave zero-mean channels unscaled instead of failing.
        #[serde(default)]
        allow_degenerate: bool,
    },
}

impl FilterConfig {
    /// Validate parameters and construct the filter.
    pub fn build(&self) -> FilterResult<Box<dyn Filter>> {
        debug!("building filter from {:?}", self);
        let filter: Box<dyn Filter> = match *self {
            FilterConfig::Invert => Box::new(Invert),
            FilterConfig::Grayscale => Box::new(Grayscale),
            FilterConfig::Sepia { depth } => Box::new(Sepia::new(depth)),
            FilterConfig::Brightness { factor } => Box::new(Brightness::new(factor)),
            FilterConfig::BoxBlur { size_x, size_y } => {
                Box::new(ConvolutionFilter::box_blur_sized(size_x, size_y)?)
            }
            FilterConfig::GaussianBlur { radius, sigma } => {
                Box::new(ConvolutionFilter::gaussian_blur_with(radius, sigma)?)
            }
            FilterConfig::Sharpen => Box::new(ConvolutionFilter::sharpen()),
            FilterConfig::MotionBlur { size } => Box::new(ConvolutionFilter::motion_blur(size)?),
            FilterConfig::Sobel { magnitude } => {
                Box::new(GradientFilter::sobel().with_magnitude(magnitude))
            }
            FilterConfig::Scharr { magnitude } => {
                Box::new(GradientFilter::scharr().with_magnitude(magnitude))
            }
            FilterConfig::Prewitt { magnitude } => {
                Box::new(GradientFilter::prewitt().with_magnitude(magnitude))
            }
            FilterConfig::Translate { offset } => Box::new(Translate::new(offset)?),
            FilterConfig::Rotate { degrees } => Box::new(Rotate::new(degrees)),
            FilterConfig::Wave { phase } => Box::new(Wave::new(phase)),
            FilterConfig::Downsample { jitter, seed } => {
                Box::new(Downsample::new(Jitter::new(jitter, seed)))
            }
            FilterConfig::Glass { jitter, seed } => Box::new(Glass::new(Jitter::new(jitter, seed))),
            FilterConfig::GrayWorld { allow_degenerate } => {
                Box::new(GrayWorld::new().with_allow_degenerate(allow_degenerate))
            }
        };
        Ok(filter)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> FilterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> FilterResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// A complete processing job: the filter plus scan options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// The filter to run.
    #[serde(flatten)]
    pub filter: FilterConfig,
    /// How the scan loop runs.
    #[serde(default)]
    pub scan: ScanOptions,
}

impl JobConfig {
    /// Parse a job from a JSON string.
    pub fn from_json(json: &str) -> FilterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a job from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> FilterResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
