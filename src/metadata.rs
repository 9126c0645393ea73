//! Video stream metadata.
//!
//! [`VideoStreamInfo`] is harvested once by [`VideoProbe`](crate::VideoProbe)
//! and cached by [`VideoReader`](crate::VideoReader) for its lifetime. It is a
//! plain value: cloning it never touches the file.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use ffmpeg_next::Rational;

use crate::ffmpeg::{LibraryVersions, format_version};

/// Microseconds per second, the unit of [`VideoStreamInfo::duration`].
pub const TIME_BASE_MICROSECONDS: i64 = 1_000_000;

/// Metadata for the first video stream of a file.
///
/// `frame_count` is the count stored in the container and may be zero for
/// containers that do not record it. When it is zero, `frame_rate` carries
/// no information about the decoded frames and iteration yields nothing.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoStreamInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames recorded by the container for this stream.
    pub frame_count: u64,
    /// Frames per second.
    pub frame_rate: f64,
    /// Duration in microseconds.
    pub duration: i64,
    /// Short codec identifier (e.g. `"h264"`, `"mpeg4"`).
    pub codec_name: String,
    /// Descriptive codec name (e.g. `"H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10"`).
    pub codec_long_name: String,
    /// Stream time base after correction for misreported `N/1` values.
    pub time_base: Rational,
    /// Index of the selected stream inside the container.
    pub stream_index: usize,
}

impl VideoStreamInfo {
    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.duration as f64 / TIME_BASE_MICROSECONDS as f64
    }

    /// Shape of one decoded frame: `(3, height, width)`.
    pub fn frame_shape(&self) -> (usize, usize, usize) {
        (3, self.height as usize, self.width as usize)
    }

    /// Shape of a fully loaded video: `(frame_count, 3, height, width)`.
    pub fn video_shape(&self) -> (usize, usize, usize, usize) {
        (
            self.frame_count as usize,
            3,
            self.height as usize,
            self.width as usize,
        )
    }

    /// Build the one-line human readable summary for `path`.
    pub fn describe(&self, path: &Path, versions: LibraryVersions) -> String {
        format!(
            "Video file: {}; FFmpeg: avformat-{}; avcodec-{}; avutil-{}; swscale-{}; \
             Codec: {} ({}); Time: {:.2} s ({} @ {:.2}Hz); Size (w x h): {} x {} pixels",
            path.display(),
            format_version(versions.avformat),
            format_version(versions.avcodec),
            format_version(versions.avutil),
            format_version(versions.swscale),
            self.codec_long_name,
            self.codec_name,
            self.duration_seconds(),
            self.frame_count,
            self.frame_rate,
            self.width,
            self.height,
        )
    }
}

impl Display for VideoStreamInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}x{} {} ({} frames, {:.2} fps, {:.2} s)",
            self.width,
            self.height,
            self.codec_name,
            self.frame_count,
            self.frame_rate,
            self.duration_seconds(),
        )
    }
}

/// Derive frames per second from a frame count and a duration in microseconds.
///
/// Falls back to `average_frame_rate` when either input is zero, and to `0.0`
/// when that is unusable too.
pub fn compute_frame_rate(frame_count: u64, duration: i64, average_frame_rate: Rational) -> f64 {
    if frame_count > 0 && duration > 0 {
        return frame_count as f64 * TIME_BASE_MICROSECONDS as f64 / duration as f64;
    }
    if average_frame_rate.denominator() != 0 && average_frame_rate.numerator() > 0 {
        average_frame_rate.numerator() as f64 / average_frame_rate.denominator() as f64
    } else {
        0.0
    }
}

/// Rescale `ticks` of `time_base` into microseconds.
pub fn ticks_to_microseconds(ticks: i64, time_base: Rational) -> i64 {
    if time_base.denominator() == 0 {
        return 0;
    }
    let scaled = ticks as i128 * time_base.numerator() as i128 * TIME_BASE_MICROSECONDS as i128
        / time_base.denominator() as i128;
    scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
