//! Execution support.
//!
//! This module drives the column scan and reports progress while it runs.

pub mod progress;
pub mod scan;

pub use progress::{NullProgress, ProgressSink, ProgressTracker, ProgressUpdate};
pub use scan::{scan_columns, ScanOptions};
