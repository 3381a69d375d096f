//! Core types and traits for the rasterfx filtering engine.
//!
//! This module contains the foundational pieces every filter builds on:
//! - Image and color aliases plus channel helpers
//! - Convolution kernels
//! - The [`Filter`] trait and its metadata
//! - Error types

pub mod types;
pub mod error;
pub mod kernel;
pub mod filter;

// Re-export commonly used types
pub use types::{clamp, Color, Image, BLACK};
pub use error::{Channel, FilterError, FilterResult};
pub use kernel::Kernel;
pub use filter::{Category, Filter, FilterMetadata};
