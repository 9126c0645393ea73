//! Bulk-load configuration.
//!
//! [`LoadOptions`] threads a progress callback through
//! [`VideoReader::load_with_options`](crate::VideoReader::load_with_options)
//! without widening the plain [`load`](crate::VideoReader::load) signature.
//!
//! Decoding itself has no knobs: frames are always converted to RGB24 at the
//! stream's own resolution with bicubic interpolation.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Options for [`VideoReader::load_with_options`](crate::VideoReader::load_with_options).
#[derive(Clone)]
pub struct LoadOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) batch_size: u64,
}

impl Debug for LoadOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoadOptions")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadOptions {
    /// No progress callback, batch size 1.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Fire the progress callback every `size` frames. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Progress cadence in frames.
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }
}
