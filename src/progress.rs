//! Progress reporting for bulk loads.
//!
//! [`VideoReader::load_with_options`](crate::VideoReader::load_with_options)
//! decodes every frame of a file, which can take a while. Attach a
//! [`ProgressCallback`] through [`LoadOptions`](crate::LoadOptions) to watch
//! it happen.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ndarray::Array4;
//! use videoreader::{LoadOptions, ProgressCallback, ProgressInfo, VideoReader};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.1}% decoded");
//!         }
//!     }
//! }
//!
//! let reader = VideoReader::open("input.avi")?;
//! let options = LoadOptions::new().with_progress(Arc::new(PrintProgress));
//! let mut frames = Array4::<u8>::zeros((0, 0, 0, 0));
//! reader.load_with_options(&mut frames, &options)?;
//! # Ok::<(), videoreader::VideoReaderError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of bulk-load progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames decoded so far.
    pub current: u64,
    /// Frames expected, as recorded by the container.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0), `None` for zero-frame videos.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the load started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
}

/// Trait for receiving progress updates during a bulk load.
///
/// Callbacks observe but cannot halt the load.
pub trait ProgressCallback: Send + Sync {
    /// Called every `batch_size` decoded frames and once at the end.
    fn on_progress(&self, info: &ProgressInfo);
}

pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64, batch_size: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            since_last_report: 0,
        }
    }

    /// Record one decoded frame.
    pub(crate) fn advance(&mut self) {
        self.current += 1;
        self.since_last_report += 1;

        if self.since_last_report >= self.batch_size {
            self.report();
            self.since_last_report = 0;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.report();
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed();

        let percentage = (self.total > 0)
            .then(|| (self.current as f32 / self.total as f32) * 100.0);

        let estimated_remaining = (self.current > 0 && self.total > 0).then(|| {
            let remaining = self.total.saturating_sub(self.current);
            elapsed.mul_f64(remaining as f64 / self.current as f64)
        });

        self.callback.on_progress(&ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
        });
    }
}
