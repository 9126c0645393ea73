//! Shared container and decoder negotiation.
//!
//! Both [`VideoProbe`](crate::VideoProbe) and
//! [`FrameIterator`](crate::FrameIterator) need the same thing from a file:
//! an open demuxer, the first video stream, and a decoder opened for that
//! stream's codec. [`VideoSession::open`] does that once and hands back an
//! owned value. Each caller gets its own session; nothing is shared between
//! them.

use std::{fs, path::Path};

use ffmpeg_next::{
    Error as FfmpegError, Rational, codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder, format::context::Input, media::Type,
};

use crate::error::VideoReaderError;
use crate::ffmpeg::ensure_initialized;

pub(crate) const STREAM_INFO_UNREADABLE: &str = "cannot find stream info";
pub(crate) const NO_VIDEO_STREAM: &str = "cannot find any video stream";
pub(crate) const UNSUPPORTED_CODEC: &str = "unsupported codec required";
pub(crate) const CODEC_OPEN_FAILED: &str = "cannot open supported codec";

/// An open demuxer plus an opened decoder for its first video stream.
///
/// Fields drop in declaration order, so the decoder is closed before the
/// container it was reading from.
pub(crate) struct VideoSession {
    pub(crate) decoder: VideoDecoder,
    pub(crate) input_context: Input,
    pub(crate) stream_index: usize,
    /// Stream time base after [`correct_time_base`].
    pub(crate) time_base: Rational,
    /// Stream-level frame count as stored in the container (may be zero).
    pub(crate) frame_count: u64,
    /// Container duration in microseconds, or zero when unknown.
    pub(crate) container_duration: i64,
    /// Stream duration in `time_base` ticks, or zero when unknown.
    pub(crate) stream_duration: i64,
    pub(crate) average_frame_rate: Rational,
    pub(crate) codec_name: String,
    pub(crate) codec_long_name: String,
}

impl VideoSession {
    /// Open `path`, select its first video stream and open a decoder for it.
    ///
    /// # Errors
    ///
    /// [`VideoReaderError::FileNotReadable`] if the file or its container
    /// cannot be opened, [`VideoReaderError::Codec`] for every later
    /// negotiation failure. Anything acquired before the failure is dropped
    /// on the way out.
    pub(crate) fn open(path: &Path) -> Result<Self, VideoReaderError> {
        ensure_initialized()?;

        let file_metadata = fs::metadata(path).map_err(|error| VideoReaderError::FileNotReadable {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        if !file_metadata.is_file() {
            return Err(VideoReaderError::FileNotReadable {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }
        fs::File::open(path).map_err(|error| VideoReaderError::FileNotReadable {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let input_context = ffmpeg_next::format::input(&path).map_err(|error| match error {
            FfmpegError::InvalidData => VideoReaderError::FileNotReadable {
                path: path.to_path_buf(),
                reason: error.to_string(),
            },
            other => {
                log::debug!("Stream info lookup failed for {}: {other}", path.display());
                VideoReaderError::codec(path, STREAM_INFO_UNREADABLE)
            }
        })?;

        let (stream_index, time_base, frame_count, stream_duration, average_frame_rate, parameters) = {
            let stream = input_context
                .streams()
                .find(|stream| stream.parameters().medium() == Type::Video)
                .ok_or_else(|| VideoReaderError::codec(path, NO_VIDEO_STREAM))?;
            (
                stream.index(),
                correct_time_base(stream.time_base()),
                stream.frames().max(0) as u64,
                stream.duration().max(0),
                stream.avg_frame_rate(),
                stream.parameters(),
            )
        };

        let codec = ffmpeg_next::decoder::find(parameters.id())
            .ok_or_else(|| VideoReaderError::codec(path, UNSUPPORTED_CODEC))?;
        let codec_name = codec.name().to_string();
        let codec_long_name = codec.description().to_string();

        let decoder = CodecContext::from_parameters(parameters)
            .and_then(|context| context.decoder().open_as(codec))
            .and_then(|opened| opened.video())
            .map_err(|error| {
                log::debug!("Decoder open failed for {}: {error}", path.display());
                VideoReaderError::codec(path, CODEC_OPEN_FAILED)
            })?;

        let container_duration = input_context.duration().max(0);

        log::debug!(
            "Opened video stream {stream_index} of {} ({codec_name}, {}x{})",
            path.display(),
            decoder.width(),
            decoder.height(),
        );

        Ok(Self {
            decoder,
            input_context,
            stream_index,
            time_base,
            frame_count,
            container_duration,
            stream_duration,
            average_frame_rate,
            codec_name,
            codec_long_name,
        })
    }
}

/// Repair time bases some encoders write as `N/1` with `N > 1000`.
///
/// The denominator of such a time base is forced to `1000`. Any other value
/// is returned unchanged.
pub fn correct_time_base(time_base: Rational) -> Rational {
    if time_base.numerator() > 1000 && time_base.denominator() == 1 {
        Rational::new(time_base.numerator(), 1000)
    } else {
        time_base
    }
}
