//! Error types for the `videoreader` crate.
//!
//! This module defines [`VideoReaderError`], the single error type returned by
//! every fallible operation in the crate. Open and negotiation failures carry
//! the offending file path so a caller holding many readers can tell them
//! apart without extra logging.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `videoreader` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VideoReaderError {
    /// The file could not be opened, or FFmpeg did not recognise a container
    /// in it.
    #[error("Failed to open video file at {path}: {reason}")]
    FileNotReadable {
        /// Path that was passed to [`crate::VideoReader::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Stream or codec negotiation failed after the container was opened.
    ///
    /// Raised when stream info is unreadable, when the file has no video
    /// stream, when no decoder is registered for the codec, when the decoder
    /// cannot be opened, or when the frame buffers or the pixel-format
    /// converter cannot be set up.
    #[error("FFmpeg could not prepare {path} for decoding: {reason}")]
    Codec {
        /// Path of the file being negotiated.
        path: PathBuf,
        /// Short reason string, e.g. `"cannot find any video stream"`.
        reason: String,
    },

    /// A frame read was attempted past the logical end of the video.
    #[error("Frame position {position} is out of range")]
    IndexOutOfRange {
        /// The iterator position at the time of the read.
        position: u64,
    },

    /// The decoder rejected a packet while iterating.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while writing exported frames.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while exporting a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl VideoReaderError {
    pub(crate) fn codec(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VideoReaderError::Codec {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<FfmpegError> for VideoReaderError {
    fn from(error: FfmpegError) -> Self {
        VideoReaderError::FfmpegError(error.to_string())
    }
}
