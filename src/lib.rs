//! # videoreader
//!
//! Read video files into dense pixel arrays for numerical code.
//!
//! `videoreader` opens a video container with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), decodes the
//! first video stream frame by frame, converts every frame to RGB and hands
//! it out as an [`ndarray`] array laid out channel-first:
//! `(3, height, width)` per frame, `(frames, 3, height, width)` for a whole
//! file.
//!
//! ## Quick Start
//!
//! ### Load a whole video
//!
//! ```no_run
//! use videoreader::VideoReader;
//!
//! let reader = VideoReader::open("input.avi")?;
//! println!("{reader}");
//! let video = reader.read_all()?;
//! assert_eq!(video.dim(), (reader.frame_count() as usize, 3, 48, 64));
//! # Ok::<(), videoreader::VideoReaderError>(())
//! ```
//!
//! ### Walk frames one at a time
//!
//! ```no_run
//! use ndarray::Array3;
//! use videoreader::VideoReader;
//!
//! let reader = VideoReader::open("input.avi")?;
//! let mut frame = Array3::<u8>::zeros((0, 0, 0));
//! let mut cursor = reader.begin()?;
//! while !cursor.is_end() {
//!     cursor.read(&mut frame)?;
//! }
//! # Ok::<(), videoreader::VideoReaderError>(())
//! ```
//!
//! ## Behaviour
//!
//! - The reader probes the file once when opened and keeps no file handle
//!   afterwards.
//! - Every iterator opens the file again and decodes from frame 0. There is
//!   no seeking; skipping ahead decodes the skipped frames.
//! - The frame count is whatever the container records. Containers that do
//!   not record one report zero frames and iterate nothing.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

mod config;
pub mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod iterator;
pub mod metadata;
pub mod probe;
pub mod progress;
pub mod reader;
mod session;

pub use config::LoadOptions;
pub use conversion::{planar_to_image, save_frame};
pub use error::VideoReaderError;
pub use ffmpeg::{FfmpegLogLevel, LibraryVersions, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use iterator::{END_POSITION, FrameIterator};
pub use metadata::VideoStreamInfo;
pub use probe::VideoProbe;
pub use progress::{ProgressCallback, ProgressInfo};
pub use reader::VideoReader;
pub use session::correct_time_base;
