//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions.

use std::path::Path;

use videoreader::{VideoProbe, VideoReader, VideoReaderError};

#[test]
fn open_nonexistent_file() {
    let result = VideoReader::open("this_file_does_not_exist.avi");
    match result {
        Err(VideoReaderError::FileNotReadable { path, .. }) => {
            assert_eq!(path, Path::new("this_file_does_not_exist.avi"));
        }
        other => panic!("expected FileNotReadable, got {other:?}"),
    }
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.avi");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = VideoReader::open(&invalid_file_path);
    assert!(
        matches!(
            result,
            Err(VideoReaderError::FileNotReadable { .. } | VideoReaderError::Codec { .. })
        ),
        "Expected an open or codec error, got {result:?}",
    );
}

#[test]
fn open_directory_is_not_readable() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let result = VideoReader::open(temporary_directory.path());
    match result {
        Err(VideoReaderError::FileNotReadable { path, .. }) => {
            assert_eq!(path, temporary_directory.path());
        }
        other => panic!("expected FileNotReadable, got {other:?}"),
    }
}

#[test]
fn no_video_stream_error() {
    let path = "tests/fixtures/sample_audio_only.m4a";
    if !Path::new(path).exists() {
        return;
    }

    let error = VideoReader::open(path).expect_err("audio-only file should not open");
    match &error {
        VideoReaderError::Codec { path: error_path, reason } => {
            assert_eq!(error_path, Path::new(path));
            assert_eq!(reason, "cannot find any video stream");
        }
        other => panic!("expected Codec error, got {other:?}"),
    }
    assert!(error.to_string().contains("cannot find any video stream"));
}

#[test]
fn probe_matches_reader_metadata() {
    let path = "tests/fixtures/sample_10f_64x48.avi";
    if !Path::new(path).exists() {
        return;
    }

    let probed = VideoProbe::probe(path).expect("Failed to probe");
    let reader = VideoReader::open(path).expect("Failed to open");
    assert_eq!(&probed, reader.info());

    let (_, summary) = VideoProbe::probe_with_summary(path).expect("Failed to probe");
    assert_eq!(summary, reader.summary());
}

#[test]
fn frame_out_of_range() {
    let path = "tests/fixtures/sample_10f_64x48.avi";
    if !Path::new(path).exists() {
        return;
    }

    let reader = VideoReader::open(path).expect("Failed to open test video");
    let error = reader.frame(10).expect_err("frame 10 of 10 should not exist");
    assert!(matches!(
        error,
        VideoReaderError::IndexOutOfRange { position: 10 }
    ));
    assert!(error.to_string().contains("out of range"));
}
