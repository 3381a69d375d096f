//! The column-major raster scan shared by every filter.
//!
//! Progress and cancellation are polled once per column: the percentage of
//! columns already completed is reported first, then the cancellation flag is
//! checked. A cancelled scan never yields a partial image.

use crate::core::error::{FilterError, FilterResult};
use crate::core::types::{blank_like, Color, Image};
use crate::execution::progress::ProgressSink;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Scan loop options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Compute columns on the rayon thread pool.
    pub parallel: bool,
    /// Number of columns scheduled per parallel batch.
    pub batch_columns: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            batch_columns: 16,
        }
    }
}

impl ScanOptions {
    /// Create sequential scan options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable parallel column batches.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of columns per parallel batch.
    pub fn with_batch_columns(mut self, columns: usize) -> Self {
        self.batch_columns = columns.max(1);
        self
    }
}

/// `floor(100 * x / width)`.
#[inline]
pub fn column_percent(x: u32, width: u32) -> u8 {
    if width == 0 {
        return 100;
    }
    ((x as u64 * 100) / width as u64) as u8
}

/// Produce a new image by evaluating `pixel` for every coordinate,
/// column by column.
pub fn scan_columns<F>(
    source: &Image,
    progress: &dyn ProgressSink,
    options: &ScanOptions,
    pixel: F,
) -> FilterResult<Image>
where
    F: Fn(&Image, u32, u32) -> Color + Sync,
{
    let (width, height) = source.dimensions();
    progress.started(width, height);

    if progress.is_cancelled() {
        info!("scan cancelled before the first column");
        return Err(FilterError::Cancelled);
    }

    debug!(
        "scanning {}x{} image ({})",
        width,
        height,
        if options.parallel { "parallel" } else { "sequential" }
    );

    let result = if options.parallel {
        scan_parallel(source, progress, options.batch_columns.max(1) as u32, &pixel)?
    } else {
        scan_sequential(source, progress, &pixel)?
    };

    progress.completed();
    Ok(result)
}

fn scan_sequential<F>(source: &Image, progress: &dyn ProgressSink, pixel: &F) -> FilterResult<Image>
where
    F: Fn(&Image, u32, u32) -> Color,
{
    let (width, height) = source.dimensions();
    let mut result = blank_like(source);

    for x in 0..width {
        progress.report(column_percent(x, width));
        if progress.is_cancelled() {
            info!("scan cancelled at column {}/{}", x, width);
            return Err(FilterError::Cancelled);
        }
        for y in 0..height {
            result.put_pixel(x, y, pixel(source, x, y));
        }
    }

    Ok(result)
}

fn scan_parallel<F>(
    source: &Image,
    progress: &dyn ProgressSink,
    batch: u32,
    pixel: &F,
) -> FilterResult<Image>
where
    F: Fn(&Image, u32, u32) -> Color + Sync,
{
    let (width, height) = source.dimensions();
    let mut result = blank_like(source);

    let mut start = 0;
    while start < width {
        let end = start.saturating_add(batch).min(width);

        // Poll every column of the batch in order before scheduling it.
        for x in start..end {
            progress.report(column_percent(x, width));
            if progress.is_cancelled() {
                info!("scan cancelled at column {}/{}", x, width);
                return Err(FilterError::Cancelled);
            }
        }

        let columns: Vec<Vec<Color>> = (start..end)
            .into_par_iter()
            .map(|x| (0..height).map(|y| pixel(source, x, y)).collect())
            .collect();

        for (x, column) in (start..end).zip(columns) {
            for (y, color) in (0..height).zip(column) {
                result.put_pixel(x, y, color);
            }
        }

        start = end;
    }

    Ok(result)
}
