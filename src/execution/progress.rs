//! Progress reporting and cooperative cancellation.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// The handle a filter polls while scanning an image.
///
/// Filters call [`ProgressSink::report`] and then [`ProgressSink::is_cancelled`]
/// once per column, never per pixel.
pub trait ProgressSink {
    /// Report percent complete (0..100).
    fn report(&self, percent: u8);

    /// Check whether the caller requested cancellation.
    fn is_cancelled(&self) -> bool;

    /// Called once before the first column.
    fn started(&self, _width: u32, _height: u32) {}

    /// Called once after the last column when the scan was not cancelled.
    fn completed(&self) {}
}

/// A sink that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _percent: u8) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// A scan has started.
    Started {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
    /// Percentage of columns completed.
    Progress {
        /// `floor(100 * x / width)` for the column about to be computed.
        percent: u8,
    },
    /// The scan finished and a full result exists.
    Completed {
        /// Wall time of the scan.
        elapsed_ms: u64,
    },
    /// Cancellation was requested.
    Cancelled,
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks scan progress and allows cancellation from another thread.
pub struct ProgressTracker {
    /// Whether cancellation was requested.
    cancelled: AtomicBool,
    /// Last percentage reported by the scan.
    percent: AtomicU8,
    /// Start time of the current scan.
    start_time: Mutex<Option<Instant>>,
    /// Progress callback.
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            percent: AtomicU8::new(0),
            start_time: Mutex::new(None),
            callback: None,
        }
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: ProgressCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.send_update(ProgressUpdate::Cancelled);
        }
    }

    /// Clear a previous cancellation so the tracker can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
        self.percent.store(0, Ordering::Relaxed);
        *self.start_time.lock() = None;
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    /// Milliseconds since the current scan started.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .lock()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn send_update(&self, update: ProgressUpdate) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("cancelled", &self.cancelled.load(Ordering::Relaxed))
            .field("percent", &self.percent())
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl ProgressSink for ProgressTracker {
    fn report(&self, percent: u8) {
        let percent = percent.min(100);
        self.percent.store(percent, Ordering::Relaxed);
        self.send_update(ProgressUpdate::Progress { percent });
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn started(&self, width: u32, height: u32) {
        *self.start_time.lock() = Some(Instant::now());
        self.send_update(ProgressUpdate::Started { width, height });
    }

    fn completed(&self) {
        self.send_update(ProgressUpdate::Completed {
            elapsed_ms: self.elapsed_ms(),
        });
    }
}

impl<T: ProgressSink + ?Sized> ProgressSink for Arc<T> {
    fn report(&self, percent: u8) {
        (**self).report(percent)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn started(&self, width: u32, height: u32) {
        (**self).started(width, height)
    }

    fn completed(&self) {
        (**self).completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_cancellation() {
        let tracker = ProgressTracker::new();
        assert!(!tracker.is_cancelled());

        tracker.cancel();
        assert!(tracker.is_cancelled());

        tracker.reset();
        assert!(!tracker.is_cancelled());
    }

    #[test]
    fn test_report_is_capped() {
        let tracker = ProgressTracker::new();
        tracker.report(42);
        assert_eq!(tracker.percent(), 42);
        tracker.report(250);
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn test_callback_invoked() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let tracker = ProgressTracker::new().with_callback(Box::new(move |_| {
            call_count_clone.fetch_add(1, Ordering::Relaxed);
        }));

        tracker.started(4, 4);
        tracker.report(50);
        tracker.completed();
        assert_eq!(call_count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_cancel_notifies_once() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        let tracker = ProgressTracker::new().with_callback(Box::new(move |u| sink.lock().push(u)));

        tracker.cancel();
        tracker.cancel();
        assert_eq!(*updates.lock(), vec![ProgressUpdate::Cancelled]);
    }

    #[test]
    fn test_null_progress_never_cancels() {
        let sink = NullProgress;
        sink.report(10);
        assert!(!sink.is_cancelled());
    }
}
