//! Lightweight video file probing.
//!
//! [`VideoProbe`] opens a file, reads the metadata of its first video stream,
//! and closes everything again without decoding a single frame.
//! [`VideoReader`](crate::VideoReader) uses it at construction time; it is
//! also handy on its own for inspecting many files quickly.

use std::path::Path;

use crate::error::VideoReaderError;
use crate::ffmpeg::LibraryVersions;
use crate::metadata::{VideoStreamInfo, compute_frame_rate, ticks_to_microseconds};
use crate::session::VideoSession;

/// Lightweight video file probe.
///
/// # Example
///
/// ```no_run
/// use videoreader::VideoProbe;
///
/// let info = VideoProbe::probe("input.avi")?;
/// println!("{}x{}, {} frames", info.width, info.height, info.frame_count);
/// # Ok::<(), videoreader::VideoReaderError>(())
/// ```
pub struct VideoProbe;

impl VideoProbe {
    /// Probe a video file and return the metadata of its first video stream.
    ///
    /// # Errors
    ///
    /// Returns [`VideoReaderError::FileNotReadable`] if the file cannot be
    /// opened, and [`VideoReaderError::Codec`] if it has no video stream or
    /// no usable decoder.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<VideoStreamInfo, VideoReaderError> {
        let path = path.as_ref();
        log::debug!("Probing {}", path.display());

        let session = VideoSession::open(path)?;
        let info = stream_info(&session);
        // Dropping the session closes the decoder, then the container.
        drop(session);

        log::debug!("Probed {}: {info}", path.display());
        Ok(info)
    }

    /// Probe a video file and also return its formatted summary line.
    pub fn probe_with_summary<P: AsRef<Path>>(
        path: P,
    ) -> Result<(VideoStreamInfo, String), VideoReaderError> {
        let path = path.as_ref();
        let info = Self::probe(path)?;
        let summary = info.describe(path, LibraryVersions::current());
        Ok((info, summary))
    }

    /// Probe several files. Failures are reported per file rather than
    /// aborting the batch.
    pub fn probe_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<VideoStreamInfo, VideoReaderError>> {
        paths.iter().map(|path| Self::probe(path)).collect()
    }
}

fn stream_info(session: &VideoSession) -> VideoStreamInfo {
    let duration = if session.container_duration > 0 {
        session.container_duration
    } else {
        ticks_to_microseconds(session.stream_duration, session.time_base)
    };

    VideoStreamInfo {
        width: session.decoder.width(),
        height: session.decoder.height(),
        frame_count: session.frame_count,
        frame_rate: compute_frame_rate(session.frame_count, duration, session.average_frame_rate),
        duration,
        codec_name: session.codec_name.clone(),
        codec_long_name: session.codec_long_name.clone(),
        time_base: session.time_base,
        stream_index: session.stream_index,
    }
}
