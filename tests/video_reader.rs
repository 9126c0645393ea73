//! VideoReader integration tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`.

use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use ndarray::{Array4, Axis};
use videoreader::{LoadOptions, ProgressCallback, ProgressInfo, VideoReader, VideoReaderError};

fn small_video_path() -> &'static str {
    "tests/fixtures/sample_10f_64x48.avi"
}

fn audio_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

fn no_frame_count_path() -> &'static str {
    "tests/fixtures/sample_no_frame_count.mkv"
}

fn truncated_video_path() -> &'static str {
    "tests/fixtures/sample_truncated.avi"
}

// ── metadata ───────────────────────────────────────────────────────

#[test]
fn open_reports_metadata() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    assert_eq!(reader.frame_count(), 10);
    assert_eq!(reader.width(), 64);
    assert_eq!(reader.height(), 48);
    assert_eq!(reader.codec_name(), "mpeg4");
    assert!(!reader.codec_long_name().is_empty());
    assert!(reader.duration() > 0);
    assert!(
        (reader.frame_rate() - 25.0).abs() < 1.0,
        "unexpected frame rate {}",
        reader.frame_rate(),
    );
}

#[test]
fn summary_describes_file() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let summary = reader.to_string();
    assert!(summary.starts_with("Video file: tests/fixtures/sample_10f_64x48.avi;"));
    assert!(summary.contains("avformat-"));
    assert!(summary.contains("(mpeg4)"));
    assert!(summary.contains("Size (w x h): 64 x 48 pixels"));
    assert_eq!(summary, reader.summary());
}

#[test]
fn first_video_stream_is_selected_behind_audio() {
    let path = audio_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    assert_eq!(reader.info().stream_index, 1);
    assert_eq!(reader.codec_name(), "h264");
    assert_eq!((reader.width(), reader.height()), (160, 120));
}

// ── bulk load ──────────────────────────────────────────────────────

#[test]
fn load_has_expected_shape() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let mut video = Array4::<u8>::zeros((0, 0, 0, 0));
    reader.load(&mut video).expect("Failed to load");
    assert_eq!(video.dim(), (10, 3, 48, 64));
    assert!(video.iter().any(|&value| value != 0), "decoded frames are blank");
}

#[test]
fn load_replaces_non_contiguous_buffer() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    // Right shape, wrong memory order.
    let mut video = Array4::<u8>::zeros((64, 48, 3, 10));
    video.swap_axes(0, 3);
    video.swap_axes(1, 2);
    assert_eq!(video.dim(), (10, 3, 48, 64));
    assert!(!video.is_standard_layout());

    reader.load(&mut video).expect("Failed to load");
    assert!(video.is_standard_layout());
    assert_eq!(video.dim(), (10, 3, 48, 64));
}

#[test]
fn load_matches_single_frame_reads() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let video = reader.read_all().expect("Failed to load");

    for index in [0u64, 4, 9] {
        let frame = reader.frame(index).expect("Failed to read frame");
        assert_eq!(
            video.index_axis(Axis(0), index as usize),
            frame,
            "bulk and single reads differ at frame {index}",
        );
    }
}

#[test]
fn load_drains_reordering_decoder() {
    let path = audio_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let decoded = reader
        .frames()
        .expect("Failed to begin")
        .filter(|frame| frame.is_ok())
        .count() as u64;
    assert_eq!(decoded, reader.frame_count());
}

#[test]
fn load_reports_progress() {
    struct Count(AtomicU64);

    impl ProgressCallback for Count {
        fn on_progress(&self, info: &ProgressInfo) {
            self.0.store(info.current, Ordering::SeqCst);
        }
    }

    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let counter = Arc::new(Count(AtomicU64::new(0)));
    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let options = LoadOptions::new()
        .with_progress(counter.clone())
        .with_batch_size(3);
    let mut video = Array4::<u8>::zeros((0, 0, 0, 0));
    reader
        .load_with_options(&mut video, &options)
        .expect("Failed to load");

    assert_eq!(counter.0.load(Ordering::SeqCst), 10);
}

// ── copies ─────────────────────────────────────────────────────────

#[test]
fn clone_reprobes_same_metadata() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let copy = reader.try_clone().expect("Failed to clone");
    assert_eq!(copy.info(), reader.info());
    assert_eq!(copy.path(), reader.path());
    assert_eq!(copy.summary(), reader.summary());
}

#[test]
fn clone_does_not_share_decode_state() {
    let path = small_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let copy = reader.try_clone().expect("Failed to clone");

    let mut original_cursor = reader.begin().expect("Failed to begin");
    original_cursor.advance_by(6).expect("Failed to advance");

    let mut copy_cursor = copy.begin().expect("Failed to begin");
    assert_eq!(copy_cursor.position(), 0);
    let first = copy_cursor.next().expect("no frame").expect("decode error");
    assert_eq!(first, reader.frame(0).expect("Failed to read frame"));
    assert_eq!(original_cursor.position(), 6);
}

#[test]
fn clone_from_and_reopen_keep_metadata() {
    let small = small_video_path();
    let other = audio_video_path();
    if !Path::new(small).exists() || !Path::new(other).exists() {
        return;
    }

    let source = VideoReader::open(small).expect("Failed to open fixture");
    let mut target = VideoReader::open(other).expect("Failed to open fixture");
    target.try_clone_from(&source).expect("Failed to clone");
    assert_eq!(target.info(), source.info());

    target.reopen().expect("Failed to reopen");
    assert_eq!(target.info(), source.info());
}

// ── short containers ───────────────────────────────────────────────

#[test]
fn zero_frame_count_loads_empty_array() {
    let path = no_frame_count_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    assert_eq!(reader.frame_count(), 0);
    assert_eq!(reader.width(), 64);
    assert_eq!(reader.height(), 48);

    let mut video = Array4::<u8>::zeros((2, 3, 4, 5));
    reader.load(&mut video).expect("Failed to load");
    assert_eq!(video.dim(), (0, 3, 48, 64));

    assert!(matches!(
        reader.frame(0),
        Err(VideoReaderError::IndexOutOfRange { position: 0 })
    ));
}

#[test]
fn truncated_container_ends_load_early() {
    let path = truncated_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    assert_eq!(reader.frame_count(), 10);

    let decoded = reader
        .frames()
        .expect("Failed to begin")
        .collect::<Result<Vec<_>, _>>()
        .expect("Decode error")
        .len();
    assert!(decoded > 0 && decoded < 10, "decoded {decoded} frames");

    let video = reader.read_all().expect("Failed to load");
    assert_eq!(video.dim(), (10, 3, 48, 64));
    assert!(video.index_axis(Axis(0), 0).iter().any(|&value| value != 0));
    assert!(video.index_axis(Axis(0), 9).iter().all(|&value| value == 0));
}

#[test]
fn frame_past_truncation_reports_requested_index() {
    let path = truncated_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open fixture");
    let error = reader.frame(9).expect_err("frame 9 is past the truncation");
    assert!(
        matches!(error, VideoReaderError::IndexOutOfRange { position: 9 }),
        "unexpected error {error:?}"
    );
}
