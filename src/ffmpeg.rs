//! FFmpeg initialisation and log level control.
//!
//! FFmpeg has its own internal logging system, separate from the Rust
//! [`log`](https://crates.io/crates/log) crate. The first time a file is
//! opened, `videoreader` initialises FFmpeg and silences its console output
//! entirely. Use [`set_ffmpeg_log_level`] afterwards to bring FFmpeg's own
//! diagnostics back.
//!
//! # Example
//!
//! ```no_run
//! use videoreader::{FfmpegLogLevel, VideoReader};
//!
//! let reader = VideoReader::open("input.avi")?;
//! videoreader::set_ffmpeg_log_level(FfmpegLogLevel::Warning);
//! # Ok::<(), videoreader::VideoReaderError>(())
//! ```

use std::sync::Once;

use ffmpeg_next::util::log::Level;

use crate::error::VideoReaderError;

static INITIALIZE: Once = Once::new();

/// FFmpeg internal log verbosity level.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log conditions after which the process will abort.
    Panic,
    /// Only log unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings.
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }

    fn from_ffmpeg_level(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }

    /// Parse a level name as accepted by the CLI (`"quiet"`, `"warning"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "quiet" => Some(FfmpegLogLevel::Quiet),
            "panic" => Some(FfmpegLogLevel::Panic),
            "fatal" => Some(FfmpegLogLevel::Fatal),
            "error" => Some(FfmpegLogLevel::Error),
            "warning" | "warn" => Some(FfmpegLogLevel::Warning),
            "info" => Some(FfmpegLogLevel::Info),
            "verbose" => Some(FfmpegLogLevel::Verbose),
            "debug" => Some(FfmpegLogLevel::Debug),
            "trace" => Some(FfmpegLogLevel::Trace),
            _ => None,
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// This controls what FFmpeg prints to stderr. It does **not** affect
/// Rust-side `log` crate output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// Get the current FFmpeg internal log verbosity level.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from_ffmpeg_level)
}

/// Initialise FFmpeg once per process.
///
/// The first successful call also sets FFmpeg's log level to
/// [`FfmpegLogLevel::Quiet`]. Later calls are free.
pub(crate) fn ensure_initialized() -> Result<(), VideoReaderError> {
    ffmpeg_next::init()?;
    INITIALIZE.call_once(|| {
        log::debug!("FFmpeg initialised, silencing FFmpeg console output");
        set_ffmpeg_log_level(FfmpegLogLevel::Quiet);
    });
    Ok(())
}

/// Versions of the FFmpeg libraries this crate is linked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryVersions {
    /// `libavformat` version, packed as `major << 16 | minor << 8 | micro`.
    pub avformat: u32,
    /// `libavcodec` version.
    pub avcodec: u32,
    /// `libavutil` version.
    pub avutil: u32,
    /// `libswscale` version.
    pub swscale: u32,
}

impl LibraryVersions {
    /// Query the linked library versions.
    pub fn current() -> Self {
        Self {
            avformat: ffmpeg_next::format::version(),
            avcodec: ffmpeg_next::codec::version(),
            avutil: ffmpeg_next::util::version(),
            swscale: ffmpeg_next::software::scaling::version(),
        }
    }
}

/// Render a packed FFmpeg version integer as `major.minor.micro`.
pub fn format_version(version: u32) -> String {
    format!(
        "{}.{}.{}",
        version >> 16,
        (version >> 8) & 0xff,
        version & 0xff
    )
}
