//! Core [`VideoReader`] implementation.
//!
//! `VideoReader` is the main entry point for the crate. It remembers a file
//! path and the metadata of the file's first video stream, and hands out
//! [`FrameIterator`]s that decode the file from the start. It holds no open
//! file between calls.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ndarray::{Array3, Array4, Axis};

use crate::config::LoadOptions;
use crate::error::VideoReaderError;
use crate::ffmpeg::LibraryVersions;
use crate::iterator::FrameIterator;
use crate::metadata::VideoStreamInfo;
use crate::probe::VideoProbe;
use crate::progress::ProgressTracker;

/// Reads the frames of one video file into planar RGB arrays.
///
/// Opening a reader probes the file once and caches its metadata. Each
/// [`begin`](VideoReader::begin) call opens the file again and decodes from
/// frame 0; iterators from the same reader do not affect each other.
///
/// A reader is copied with [`try_clone`](VideoReader::try_clone), which
/// probes the file again rather than copying any decode state.
///
/// # Example
///
/// ```no_run
/// use ndarray::Array4;
/// use videoreader::VideoReader;
///
/// let reader = VideoReader::open("input.avi")?;
/// println!("{reader}");
///
/// let mut video = Array4::<u8>::zeros((0, 0, 0, 0));
/// reader.load(&mut video)?;
/// assert_eq!(video.dim().1, 3);
/// # Ok::<(), videoreader::VideoReaderError>(())
/// ```
#[derive(Debug)]
pub struct VideoReader {
    file_path: PathBuf,
    info: VideoStreamInfo,
    summary: String,
}

impl VideoReader {
    /// Open a video file and cache its metadata.
    ///
    /// The file is closed again before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`VideoReaderError::FileNotReadable`] if the file cannot be
    /// opened and [`VideoReaderError::Codec`] if no video stream can be
    /// decoded from it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VideoReaderError> {
        let file_path = path.as_ref().to_path_buf();
        log::debug!("Opening video reader for {}", file_path.display());

        let info = VideoProbe::probe(&file_path)?;
        let summary = info.describe(&file_path, LibraryVersions::current());

        Ok(Self {
            file_path,
            info,
            summary,
        })
    }

    /// Construct an independent reader for the same path.
    ///
    /// The file is probed again; nothing but the path is taken from `self`.
    pub fn try_clone(&self) -> Result<Self, VideoReaderError> {
        Self::open(&self.file_path)
    }

    /// Make `self` an independent reader for `source`'s path.
    ///
    /// On error `self` is left as it was.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), VideoReaderError> {
        *self = source.try_clone()?;
        Ok(())
    }

    /// Probe the file again and refresh the cached metadata.
    ///
    /// On error the previous metadata is kept.
    pub fn reopen(&mut self) -> Result<(), VideoReaderError> {
        *self = Self::open(&self.file_path)?;
        Ok(())
    }

    /// Path this reader was opened with.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Cached stream metadata.
    pub fn info(&self) -> &VideoStreamInfo {
        &self.info
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Frame count recorded by the container.
    pub fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    /// Duration in microseconds.
    pub fn duration(&self) -> i64 {
        self.info.duration
    }

    /// Short codec identifier.
    pub fn codec_name(&self) -> &str {
        &self.info.codec_name
    }

    /// Descriptive codec name.
    pub fn codec_long_name(&self) -> &str {
        &self.info.codec_long_name
    }

    /// One-line human readable description of the file.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// A fresh iterator at frame 0, or at the end for zero-frame videos.
    ///
    /// # Errors
    ///
    /// Any error [`VideoReader::open`] can return, since the file is opened
    /// again, plus scaler setup failures.
    pub fn begin(&self) -> Result<FrameIterator<'_>, VideoReaderError> {
        FrameIterator::new(self)
    }

    /// The end iterator.
    pub fn end(&self) -> FrameIterator<'_> {
        FrameIterator::end()
    }

    /// Same as [`begin`](VideoReader::begin); reads better in `for` loops.
    ///
    /// ```no_run
    /// # use videoreader::VideoReader;
    /// let reader = VideoReader::open("input.avi")?;
    /// for frame in reader.frames()? {
    ///     let frame = frame?;
    ///     assert_eq!(frame.dim().0, 3);
    /// }
    /// # Ok::<(), videoreader::VideoReaderError>(())
    /// ```
    pub fn frames(&self) -> Result<FrameIterator<'_>, VideoReaderError> {
        self.begin()
    }

    /// Decode every frame into `data` as `(frame_count, 3, height, width)`.
    ///
    /// `data` is replaced with a zeroed array when its shape differs or it is
    /// not in standard contiguous layout.
    pub fn load(&self, data: &mut Array4<u8>) -> Result<(), VideoReaderError> {
        self.load_with_options(data, &LoadOptions::default())
    }

    /// [`load`](VideoReader::load) with progress reporting.
    pub fn load_with_options(
        &self,
        data: &mut Array4<u8>,
        options: &LoadOptions,
    ) -> Result<(), VideoReaderError> {
        let shape = self.info.video_shape();
        if data.dim() != shape || !data.is_standard_layout() {
            *data = Array4::zeros(shape);
        }

        let mut tracker =
            ProgressTracker::new(options.progress.clone(), self.frame_count(), options.batch_size);
        let mut decoded = 0u64;

        let mut iterator = self.begin()?;
        while !iterator.is_end() {
            let index = iterator.position() as usize;
            let mut slot = data.index_axis_mut(Axis(0), index);
            if !iterator.read_step(&mut slot)? {
                break;
            }
            decoded += 1;
            tracker.advance();
        }
        tracker.finish();

        if decoded < self.frame_count() {
            log::warn!(
                "Loaded {decoded} of {} frames from {}; remaining slots were not written",
                self.frame_count(),
                self.file_path.display(),
            );
        }
        Ok(())
    }

    /// Decode every frame into a newly allocated array.
    pub fn read_all(&self) -> Result<Array4<u8>, VideoReaderError> {
        let mut data = Array4::zeros(self.info.video_shape());
        self.load(&mut data)?;
        Ok(data)
    }

    /// Decode the frame at `index` by walking a fresh iterator up to it.
    ///
    /// # Errors
    ///
    /// Returns [`VideoReaderError::IndexOutOfRange`] if `index` is not below
    /// the frame count or the container ends before reaching it.
    pub fn frame(&self, index: u64) -> Result<Array3<u8>, VideoReaderError> {
        if index >= self.frame_count() {
            return Err(VideoReaderError::IndexOutOfRange { position: index });
        }
        let mut iterator = self.begin()?;
        iterator.advance_by(index)?;
        if iterator.is_end() {
            return Err(VideoReaderError::IndexOutOfRange { position: index });
        }
        let mut frame = Array3::zeros(self.info.frame_shape());
        if !iterator.read_step(&mut frame.view_mut())? {
            return Err(VideoReaderError::IndexOutOfRange { position: index });
        }
        Ok(frame)
    }
}

impl Display for VideoReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_readable() {
        let error = VideoReader::open("no/such/video.avi").unwrap_err();
        assert!(matches!(error, VideoReaderError::FileNotReadable { .. }));
        assert!(error.to_string().contains("no/such/video.avi"));
    }
}
