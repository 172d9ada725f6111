/*!
 * # srtfix - SRT subtitle repair
 *
 * A Rust library for repairing malformed SRT subtitle files.
 *
 * ## Features
 *
 * - Tolerant SRT parsing (CRLF, BOM, whitespace-only separators, `.` or `,` decimals)
 * - Overlap correction between consecutive captions
 * - Explicit handling of captions that end before they start
 * - Punctuation normalization for ASCII and full-width/CJK marks
 * - Re-serialization with sequential indices
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Timestamp codec, SRT parsing and serialization
 * - `timecodes`: Overlap correction and timecode validation
 * - `formatting`: Punctuation normalization
 * - `app_controller`: The repair pipeline and its file-level wrapper
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod timecodes;
pub mod formatting;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{repair, Controller, RepairOutcome, RepairReport, RunOutcome};
pub use subtitle_processor::{ParsedSrt, SubtitleEntry};
pub use timecodes::InvertedRangePolicy;
pub use errors::{AppError, SubtitleError};
