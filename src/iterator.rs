//! Forward-only frame cursor.
//!
//! [`FrameIterator`] owns a private decode session for one
//! [`VideoReader`]: its own demuxer, decoder, frame buffers and RGB scaler.
//! Every iterator starts at frame 0 and moves forward one decoded frame per
//! step. Two iterators over the same reader never share state, so holding
//! both means decoding the file twice.
//!
//! Once the last frame has been consumed (or the container runs dry) the
//! iterator releases everything it owns and becomes the *end* iterator.
//!
//! # Example
//!
//! ```no_run
//! use ndarray::Array3;
//! use videoreader::VideoReader;
//!
//! let reader = VideoReader::open("input.avi")?;
//! let mut frame = Array3::<u8>::zeros((0, 0, 0));
//! let mut cursor = reader.begin()?;
//! while cursor != reader.end() {
//!     let position = cursor.position();
//!     cursor.read(&mut frame)?;
//!     println!("frame {position}: {:?}", frame.dim());
//! }
//! # Ok::<(), videoreader::VideoReaderError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ptr;

use ffmpeg_next::{
    Packet,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ndarray::{Array3, ArrayViewMut3};

use crate::conversion::write_planar;
use crate::error::VideoReaderError;
use crate::reader::VideoReader;
use crate::session::VideoSession;

/// Position held by an iterator that has reached the end.
pub const END_POSITION: u64 = u64::MAX;

const RGB_ALLOCATION_FAILED: &str = "cannot allocate RGB frame buffer";
const SCALER_INIT_FAILED: &str = "cannot initialize software scaler";

/// Everything an active iterator owns.
///
/// Fields drop in declaration order: the two frame buffers first, then the
/// scaler, then the decoder and finally the container.
struct DecodeState {
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    scaler: ScalingContext,
    session: VideoSession,
    eof_sent: bool,
}

impl DecodeState {
    fn open(reader: &VideoReader) -> Result<Self, VideoReaderError> {
        let path = reader.path();
        let (width, height) = (reader.width(), reader.height());

        let session = VideoSession::open(path)?;

        let rgb_frame = VideoFrame::new(Pixel::RGB24, width, height);
        // SAFETY: only inspects the first data pointer of a frame we own.
        if width > 0 && height > 0 && unsafe { rgb_frame.is_empty() } {
            return Err(VideoReaderError::codec(path, RGB_ALLOCATION_FAILED));
        }

        let scaler = ScalingContext::get(
            session.decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BICUBIC,
        )
        .map_err(|error| {
            log::debug!("Scaler setup failed for {}: {error}", path.display());
            VideoReaderError::codec(path, SCALER_INIT_FAILED)
        })?;

        Ok(Self {
            decoded_frame: VideoFrame::empty(),
            rgb_frame,
            scaler,
            session,
            eof_sent: false,
        })
    }

    /// Pull packets until the decoder hands out a frame.
    ///
    /// Packets of other streams are dropped unread. Returns `Ok(false)` once
    /// the container is exhausted and the decoder has been drained.
    fn decode_next(&mut self) -> Result<bool, VideoReaderError> {
        loop {
            if self
                .session
                .decoder
                .receive_frame(&mut self.decoded_frame)
                .is_ok()
            {
                return Ok(true);
            }

            if self.eof_sent {
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.session.input_context) {
                Ok(()) => {
                    if packet.stream() == self.session.stream_index {
                        self.session
                            .decoder
                            .send_packet(&packet)
                            .map_err(|error| VideoReaderError::VideoDecodeError(error.to_string()))?;
                    }
                }
                Err(error) => {
                    log::debug!("Container read stopped: {error}");
                    self.session
                        .decoder
                        .send_eof()
                        .map_err(|error| VideoReaderError::VideoDecodeError(error.to_string()))?;
                    self.eof_sent = true;
                }
            }
        }
    }

    /// Convert the last decoded frame to RGB24 and transpose it into `output`.
    fn convert_into(&mut self, output: &mut ArrayViewMut3<'_, u8>) -> Result<(), VideoReaderError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        write_planar(&self.rgb_frame, output)
    }
}

/// A forward-only cursor over the frames of a [`VideoReader`].
///
/// Obtain one with [`VideoReader::begin`]. Besides the explicit
/// [`advance`](FrameIterator::advance) / [`read`](FrameIterator::read) API it
/// implements [`Iterator`], yielding one owned `(3, height, width)` frame per
/// step.
///
/// Two iterators are equal when they belong to the same reader and sit at the
/// same position. All end iterators are equal to each other.
pub struct FrameIterator<'a> {
    reader: Option<&'a VideoReader>,
    position: u64,
    state: Option<DecodeState>,
}

impl<'a> FrameIterator<'a> {
    /// Open a fresh decode session positioned at frame 0.
    ///
    /// A reader with zero frames yields an iterator that is already at the end.
    pub(crate) fn new(reader: &'a VideoReader) -> Result<Self, VideoReaderError> {
        log::debug!("Creating FrameIterator for {}", reader.path().display());
        let state = DecodeState::open(reader)?;

        let mut iterator = Self {
            reader: Some(reader),
            position: 0,
            state: Some(state),
        };
        if reader.frame_count() == 0 {
            iterator.reset();
        }
        Ok(iterator)
    }

    /// The end iterator. Owns no resources.
    pub fn end() -> Self {
        Self {
            reader: None,
            position: END_POSITION,
            state: None,
        }
    }

    /// Number of frames consumed so far, or [`END_POSITION`] at the end.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// `true` once the iterator has released its session.
    pub fn is_end(&self) -> bool {
        self.state.is_none()
    }

    /// The reader this iterator walks, `None` at the end.
    pub fn reader(&self) -> Option<&'a VideoReader> {
        self.reader
    }

    /// Decode the next frame without converting it.
    ///
    /// At the end this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`VideoReaderError::VideoDecodeError`] if the decoder rejects a
    /// packet. The iterator is at the end afterwards.
    pub fn advance(&mut self) -> Result<(), VideoReaderError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        match state.decode_next() {
            Ok(decoded) => {
                self.complete_step(decoded);
                Ok(())
            }
            Err(error) => {
                self.reset();
                Err(error)
            }
        }
    }

    /// Advance `count` frames, one decode at a time. There is no seeking.
    pub fn advance_by(&mut self, count: u64) -> Result<(), VideoReaderError> {
        for _ in 0..count {
            if self.is_end() {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    /// Decode the next frame and write it into `frame` as `(3, height, width)`.
    ///
    /// `frame` is replaced with a zeroed array of the right shape first if its
    /// shape does not match the reader.
    ///
    /// # Errors
    ///
    /// Returns [`VideoReaderError::IndexOutOfRange`] when called on an end
    /// iterator, and decode or conversion errors otherwise.
    pub fn read(&mut self, frame: &mut Array3<u8>) -> Result<(), VideoReaderError> {
        let reader = self.readable_reader()?;
        let shape = reader.info().frame_shape();
        if frame.dim() != shape {
            *frame = Array3::zeros(shape);
        }
        self.read_step(&mut frame.view_mut()).map(|_| ())
    }

    /// Decode and convert one frame into a view of the right shape.
    ///
    /// Returns whether a frame was written. `Ok(false)` means the container
    /// ended first; `output` is left untouched and the iterator is at the end.
    pub(crate) fn read_step(
        &mut self,
        output: &mut ArrayViewMut3<'_, u8>,
    ) -> Result<bool, VideoReaderError> {
        self.readable_reader()?;
        let Some(state) = self.state.as_mut() else {
            return Err(VideoReaderError::IndexOutOfRange {
                position: self.position,
            });
        };

        let result = state.decode_next().and_then(|decoded| {
            if decoded {
                state.convert_into(output)?;
            }
            Ok(decoded)
        });

        match result {
            Ok(decoded) => {
                self.complete_step(decoded);
                Ok(decoded)
            }
            Err(error) => {
                self.reset();
                Err(error)
            }
        }
    }

    /// Open a new session on the same reader and advance it to this
    /// iterator's position. An end iterator clones to an end iterator.
    pub fn try_clone(&self) -> Result<Self, VideoReaderError> {
        match self.reader {
            Some(reader) => {
                let mut copy = Self::new(reader)?;
                copy.advance_by(self.position)?;
                Ok(copy)
            }
            None => Ok(Self::end()),
        }
    }

    /// Release every owned resource and become the end iterator.
    ///
    /// Safe to call any number of times.
    pub fn reset(&mut self) {
        if let Some(state) = self.state.take() {
            if let Some(reader) = self.reader {
                log::debug!(
                    "Releasing decode session for {} at frame {}",
                    reader.path().display(),
                    self.position,
                );
            }
            drop(state);
        }
        self.position = END_POSITION;
        self.reader = None;
    }

    fn readable_reader(&self) -> Result<&'a VideoReader, VideoReaderError> {
        match self.reader {
            Some(reader) if self.state.is_some() && self.position <= reader.frame_count() => {
                Ok(reader)
            }
            _ => Err(VideoReaderError::IndexOutOfRange {
                position: self.position,
            }),
        }
    }

    fn complete_step(&mut self, decoded: bool) {
        let frame_count = self.reader.map_or(0, VideoReader::frame_count);

        if !decoded {
            if self.position < frame_count {
                log::warn!(
                    "Container ended after {} of {frame_count} frames",
                    self.position
                );
            }
            self.reset();
            return;
        }

        self.position += 1;
        log::trace!("Decoded frame {}", self.position - 1);
        if self.position >= frame_count {
            self.reset();
        }
    }
}

impl PartialEq for FrameIterator<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_reader = match (self.reader, other.reader) {
            (Some(left), Some(right)) => ptr::eq(left, right),
            (None, None) => true,
            _ => false,
        };
        same_reader && self.position == other.position
    }
}

impl Eq for FrameIterator<'_> {}

impl Debug for FrameIterator<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameIterator")
            .field("path", &self.reader.map(VideoReader::path))
            .field("position", &self.position)
            .field("active", &self.state.is_some())
            .finish()
    }
}

impl Iterator for FrameIterator<'_> {
    type Item = Result<Array3<u8>, VideoReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let shape = match self.readable_reader() {
            Ok(reader) => reader.info().frame_shape(),
            Err(_) => return None,
        };

        let mut frame = Array3::zeros(shape);
        match self.read_step(&mut frame.view_mut()) {
            Ok(true) => Some(Ok(frame)),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.reader {
            Some(reader) if !self.is_end() => {
                let remaining = reader.frame_count().saturating_sub(self.position);
                (0, usize::try_from(remaining).ok())
            }
            _ => (0, Some(0)),
        }
    }
}
