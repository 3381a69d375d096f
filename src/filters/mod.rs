//! Filter module.
//!
//! Contains the filter registry, serializable configs, and built-in filter
//! implementations.

pub mod registry;
pub mod config;
pub mod builtin;

pub use registry::{FilterRegistry, FilterFactory};
pub use config::{FilterConfig, JobConfig};
