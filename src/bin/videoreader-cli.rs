use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use videoreader::{FfmpegLogLevel, VideoReader, VideoReaderError, save_frame};

const CLI_AFTER_HELP: &str = "Examples:\n  videoreader-cli info input.avi\n  videoreader-cli info input.avi --json\n  videoreader-cli dump input.avi --out frames --every 5 --progress";

#[derive(Debug, Parser)]
#[command(
    name = "videoreader-cli",
    version,
    about = "Inspect video files and dump their decoded frames",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<FfmpegLogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print stream metadata for a video file.
    #[command(visible_alias = "probe")]
    Info {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Decode every frame and write a selection of them as images.
    Dump {
        /// Input video path.
        input: PathBuf,
        /// Output directory for frame images.
        #[arg(long)]
        out: PathBuf,
        /// Write every Nth frame.
        #[arg(long, default_value_t = 1)]
        every: u64,
        /// Output image extension (png, jpg, bmp, tiff).
        #[arg(long, default_value = "png")]
        ext: String,
        /// Show a progress bar.
        #[arg(long)]
        progress: bool,
    },
}

fn parse_log_level(value: &str) -> Result<FfmpegLogLevel, String> {
    FfmpegLogLevel::from_name(value).ok_or_else(|| {
        format!(
            "unknown FFmpeg log level '{value}' (expected quiet, panic, fatal, error, warning, info, verbose, debug or trace)"
        )
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), VideoReaderError> {
    let level = cli.log_level;

    match cli.command {
        Commands::Info { input, json } => {
            let reader = VideoReader::open(&input)?;
            apply_log_level(level);
            print_info(&reader, json);
            Ok(())
        }
        Commands::Dump {
            input,
            out,
            every,
            ext,
            progress,
        } => {
            let reader = VideoReader::open(&input)?;
            apply_log_level(level);
            dump_frames(&reader, &out, every.max(1), &ext, progress)
        }
    }
}

// Opening a reader silences FFmpeg, so an explicit level is applied afterwards.
fn apply_log_level(level: Option<FfmpegLogLevel>) {
    if let Some(level) = level {
        videoreader::set_ffmpeg_log_level(level);
    }
}

fn print_info(reader: &VideoReader, as_json: bool) {
    let info = reader.info();
    if as_json {
        let value = json!({
            "path": reader.path().display().to_string(),
            "width": info.width,
            "height": info.height,
            "frame_count": info.frame_count,
            "frame_rate": info.frame_rate,
            "duration_us": info.duration,
            "codec": info.codec_name,
            "codec_long_name": info.codec_long_name,
            "time_base": format!("{}/{}", info.time_base.numerator(), info.time_base.denominator()),
            "stream_index": info.stream_index,
        });
        println!("{value:#}");
        return;
    }

    println!("{}", reader.path().display().to_string().bold());
    println!("  {:<12} {} ({})", "codec".cyan(), info.codec_name, info.codec_long_name);
    println!("  {:<12} {} x {}", "size".cyan(), info.width, info.height);
    println!("  {:<12} {}", "frames".cyan(), info.frame_count);
    println!("  {:<12} {:.3}", "fps".cyan(), info.frame_rate);
    println!("  {:<12} {:.2} s", "duration".cyan(), info.duration_seconds());
    println!("  {}", reader.summary().dimmed());
}

fn dump_frames(
    reader: &VideoReader,
    out: &Path,
    every: u64,
    ext: &str,
    show_progress: bool,
) -> Result<(), VideoReaderError> {
    fs::create_dir_all(out)?;

    let bar = if show_progress {
        let bar = ProgressBar::new(reader.frame_count());
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta})")
        {
            bar.set_style(style);
        }
        Some(bar)
    } else {
        None
    };

    let mut cursor = reader.begin()?;
    let mut written = 0u64;

    while !cursor.is_end() {
        let index = cursor.position();
        if index % every == 0 {
            let Some(frame) = cursor.next() else {
                break;
            };
            save_frame(frame?.view(), out.join(format!("frame_{index:06}.{ext}")))?;
            written += 1;
        } else {
            cursor.advance()?;
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    println!(
        "{} wrote {written} frame(s) to {}",
        "done:".green().bold(),
        out.display()
    );
    Ok(())
}
