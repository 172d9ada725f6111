use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::formatting::PunctuationNormalizer;

// @module: SRT parsing, timestamp codec and serialization

// @const: Single SRT timestamp, comma or dot before the fraction
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+):([0-9]{1,2}):([0-9]{1,2})[,.]([0-9]{1,6})$").unwrap()
});

// @const: Blank line between blocks (whitespace-only lines count as blank)
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @const: Arrow between start and end timestamps
static TIMECODE_ARROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*-->\s*").unwrap()
});

const UTF8_BOM: char = '\u{feff}';

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Index line as it appeared in the source file
    pub index: String,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Caption text, joined onto a single line
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(index: impl Into<String>, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            index: index.into(),
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    /// Display duration, zero when the range is inverted
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }

    /// True when the entry ends before it starts
    pub fn has_inverted_range(&self) -> bool {
        self.end_time_ms < self.start_time_ms
    }

    /// Parse an SRT timestamp to milliseconds, reporting malformed input
    ///
    /// Accepts `HH:MM:SS,mmm` and `HH:MM:SS.mmm`. The hour field may have more
    /// than two digits. The fraction holds one to six digits and is read as a
    /// fraction of a second, truncated to whole milliseconds.
    pub fn try_parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let trimmed = timestamp.trim();
        let invalid = || SubtitleError::InvalidTimestamp(trimmed.to_string());

        let caps = TIMESTAMP_REGEX.captures(trimmed).ok_or_else(invalid)?;

        let hours: u64 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u64 = caps[2].parse().map_err(|_| invalid())?;
        let seconds: u64 = caps[3].parse().map_err(|_| invalid())?;
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        // Right-pad so ",5" means 500ms, then keep the millisecond digits
        let fraction = format!("{:0<6}", &caps[4]);
        let millis: u64 = fraction[..3].parse().map_err(|_| invalid())?;

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(invalid)
    }

    /// Parse an SRT timestamp to milliseconds, falling back to 0 when malformed
    pub fn parse_timestamp(timestamp: &str) -> u64 {
        Self::try_parse_timestamp(timestamp).unwrap_or(0)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)
    }
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A timestamp that did not parse and was replaced by 0ms
    InvalidTimestamp {
        /// 1-based block number
        block: usize,
        /// The raw timestamp text
        value: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::InvalidTimestamp { block, value } => {
                write!(f, "Invalid timestamp '{}' in block {}, using 00:00:00,000", value, block)
            }
        }
    }
}

/// Result of parsing SRT text
#[derive(Debug, Clone, Default)]
pub struct ParsedSrt {
    /// Entries sorted by start time
    pub entries: Vec<SubtitleEntry>,
    /// Blocks dropped for having fewer than two lines
    pub dropped_blocks: usize,
    /// Recovered problems
    pub warnings: Vec<ParseWarning>,
}

/// Read and parse an SRT file
pub fn read_srt_file<P: AsRef<Path>>(path: P, strict_timestamps: bool) -> Result<ParsedSrt> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path)?;

    parse_srt_string(&content, strict_timestamps)
        .map_err(AppError::from)
        .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))
}

/// Parse SRT format string into subtitle entries sorted by start time
///
/// Blocks with fewer than two non-empty lines are dropped. A timecode line
/// that does not split into exactly two timestamps on `-->` fails the whole
/// parse. Malformed timestamps become 0ms and a warning, unless
/// `strict_timestamps` is set, in which case they are errors.
pub fn parse_srt_string(content: &str, strict_timestamps: bool) -> Result<ParsedSrt, SubtitleError> {
    let content = content.trim_start_matches(UTF8_BOM).trim();
    let mut parsed = ParsedSrt::default();

    if content.is_empty() {
        return Ok(parsed);
    }

    for (block_idx, block) in BLOCK_SEPARATOR_REGEX.split(content).enumerate() {
        let block_num = block_idx + 1;
        let lines: Vec<&str> = block
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() < 2 {
            debug!("Dropping truncated block {} ({} line(s))", block_num, lines.len());
            parsed.dropped_blocks += 1;
            continue;
        }

        let timecode_line = lines[1];
        let parts: Vec<&str> = TIMECODE_ARROW_REGEX.split(timecode_line).collect();
        let [start_str, end_str] = parts.as_slice() else {
            return Err(SubtitleError::MalformedTimecodeLine {
                block: block_num,
                line: timecode_line.to_string(),
            });
        };

        let start_time_ms = decode_timestamp(start_str, block_num, strict_timestamps, &mut parsed.warnings)?;
        let end_time_ms = decode_timestamp(end_str, block_num, strict_timestamps, &mut parsed.warnings)?;

        parsed.entries.push(SubtitleEntry {
            index: lines[0].to_string(),
            start_time_ms,
            end_time_ms,
            text: lines[2..].join(" "),
        });
    }

    // Stable, so entries sharing a start time keep their file order
    parsed.entries.sort_by_key(|entry| entry.start_time_ms);

    Ok(parsed)
}

fn decode_timestamp(
    value: &str,
    block: usize,
    strict_timestamps: bool,
    warnings: &mut Vec<ParseWarning>,
) -> Result<u64, SubtitleError> {
    match SubtitleEntry::try_parse_timestamp(value) {
        Ok(ms) => Ok(ms),
        Err(e) if strict_timestamps => Err(e),
        Err(_) => {
            let warning = ParseWarning::InvalidTimestamp { block, value: value.to_string() };
            warn!("{}", warning);
            warnings.push(warning);
            Ok(0)
        }
    }
}

/// Serialize entries to SRT text
///
/// Each entry becomes its output position, the `start --> end` line, the
/// caption text and a blank line. Trailing whitespace is trimmed from the
/// result, so the output has no final newline.
pub fn serialize_entries(entries: &[SubtitleEntry], normalize_punctuation: bool) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(entries.len() * 4);

    for (position, entry) in entries.iter().enumerate() {
        lines.push((position + 1).to_string());
        lines.push(format!("{} --> {}", entry.format_start_time(), entry.format_end_time()));
        lines.push(if normalize_punctuation {
            PunctuationNormalizer::normalize(&entry.text)
        } else {
            entry.text.clone()
        });
        lines.push(String::new());
    }

    let mut output = lines.join("\n");
    output.truncate(output.trim_end().len());
    output
}

/// Write entries to an SRT file, creating parent directories as needed
pub fn write_srt_file<P: AsRef<Path>>(path: P, entries: &[SubtitleEntry], normalize_punctuation: bool) -> Result<()> {
    FileManager::write_to_file(path, &serialize_entries(entries, normalize_punctuation))
}
