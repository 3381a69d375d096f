//! Error types for Rasterfx.
//!
//! Uses thiserror for structured errors. Every filter operation either fully
//! succeeds, is cancelled, or fails fast on invalid construction parameters.

use std::fmt;
use thiserror::Error;

/// A color channel of an RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red, index 0.
    Red,
    /// Green, index 1.
    Green,
    /// Blue, index 2.
    Blue,
}

impl Channel {
    /// All channels in R, G, B order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Index of this channel inside an `Rgb<u8>` pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Top-level error type for Rasterfx.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A construction parameter is out of range.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A gray-world channel mean was zero.
    #[error("Division by zero: {channel} channel mean is 0")]
    DivideByZero {
        /// The empty channel.
        channel: Channel,
    },

    /// The scan stopped on request; no image was produced.
    #[error("Processing cancelled by user")]
    Cancelled,

    /// No filter is registered under this id.
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    /// Decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON config could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl FilterError {
    /// Shorthand for an [`FilterError::InvalidParameter`].
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Cancellation is a normal alternate outcome, not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FilterError::Cancelled)
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            FilterError::InvalidParameter { parameter, reason } => {
                Some(format!("Adjust '{}': {}", parameter, reason))
            }
            FilterError::DivideByZero { channel } => Some(format!(
                "The image has no {} component; enable allow_degenerate to leave it unscaled",
                channel
            )),
            FilterError::UnknownFilter(_) => {
                Some("Use 'list' to see available filters".to_string())
            }
            _ => None,
        }
    }
}

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_index_order() {
        let indices: Vec<usize> = Channel::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancelled_is_not_a_failure_kind() {
        assert!(FilterError::Cancelled.is_cancelled());
        assert!(!FilterError::invalid("sigma", "must be non-zero").is_cancelled());
    }

    #[test]
    fn test_error_messages() {
        let err = FilterError::DivideByZero {
            channel: Channel::Green,
        };
        assert_eq!(err.to_string(), "Division by zero: green channel mean is 0");

        let err = FilterError::invalid("sigma", "must be non-zero");
        assert!(err.to_string().contains("sigma"));
        assert!(err.suggested_fix().unwrap().contains("sigma"));
    }
}
