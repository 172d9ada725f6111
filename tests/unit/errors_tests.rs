/*!
 * Tests for error types and conversions
 */

use srtfix::errors::{AppError, SubtitleError};

#[test]
fn test_subtitleError_malformedTimecodeLine_shouldDisplayCorrectly() {
    let error = SubtitleError::MalformedTimecodeLine { block: 3, line: "garbage".to_string() };
    let display = format!("{}", error);
    assert!(display.contains("Malformed timecode line"));
    assert!(display.contains("block 3"));
    assert!(display.contains("garbage"));
}

#[test]
fn test_subtitleError_invalidTimestamp_shouldDisplayCorrectly() {
    let error = SubtitleError::InvalidTimestamp("00:AB:01,000".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid timestamp"));
    assert!(display.contains("00:AB:01,000"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let subtitle_error = SubtitleError::InvalidTimestamp("x".to_string());
    let app_error: AppError = subtitle_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Subtitle error"));
    assert!(display.contains("Invalid timestamp"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_config_shouldDisplayCorrectly() {
    let error = AppError::Config("bad suffix".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Configuration error"));
    assert!(display.contains("bad suffix"));
}

#[test]
fn test_appError_debug_shouldBeImplemented() {
    let error = AppError::File("test".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("File"));
}
