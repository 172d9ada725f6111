/*!
 * Timecode correction and validation for subtitle entries.
 *
 * Correction works on entries sorted by start time:
 * - Overlaps between neighbours are removed by pulling the earlier end back
 * - Inverted ranges (end before start) are handled by an explicit policy
 *
 * Validation reports what is still wrong without changing anything.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::SubtitleEntry;

/// What to do with an entry whose end time precedes its start time
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvertedRangePolicy {
    /// Raise the end time to the start time
    #[default]
    ZeroDuration,
    /// Remove the entry
    Drop,
    /// Leave the entry untouched
    Keep,
}

impl std::fmt::Display for InvertedRangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDuration => write!(f, "zero_duration"),
            Self::Drop => write!(f, "drop"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

/// Counts of changes made by a correction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Entries whose end time was pulled back to the next start
    pub clamped: usize,
    /// Inverted entries raised to zero duration
    pub inverted_fixed: usize,
    /// Inverted entries removed
    pub inverted_dropped: usize,
}

impl CorrectionReport {
    /// Report for an inverted-range pass that affected `affected` entries
    pub fn for_policy(policy: InvertedRangePolicy, affected: usize) -> Self {
        match policy {
            InvertedRangePolicy::ZeroDuration => Self { inverted_fixed: affected, ..Default::default() },
            InvertedRangePolicy::Drop => Self { inverted_dropped: affected, ..Default::default() },
            InvertedRangePolicy::Keep => Self::default(),
        }
    }
}

/// Remove overlaps between adjacent entries
///
/// Entries must already be sorted by start time. A single forward pass is
/// enough: once `end[i] <= start[i+1]` holds, it also holds against every
/// later start. Only end times change, and only downwards.
pub fn fix_overlaps(entries: &mut [SubtitleEntry]) -> usize {
    let mut clamped = 0;

    for i in 0..entries.len().saturating_sub(1) {
        let next_start = entries[i + 1].start_time_ms;
        let current = &mut entries[i];

        if current.end_time_ms > next_start {
            debug!(
                "Clamping entry {} end {} -> {}",
                current.index,
                SubtitleEntry::format_timestamp(current.end_time_ms),
                SubtitleEntry::format_timestamp(next_start)
            );
            current.end_time_ms = next_start;
            clamped += 1;
        }
    }

    clamped
}

/// Apply an inverted-range policy, returning how many entries it affected
pub fn resolve_inverted_ranges(entries: &mut Vec<SubtitleEntry>, policy: InvertedRangePolicy) -> usize {
    match policy {
        InvertedRangePolicy::Keep => 0,
        InvertedRangePolicy::ZeroDuration => {
            let mut fixed = 0;
            for entry in entries.iter_mut().filter(|e| e.has_inverted_range()) {
                debug!("Entry {} ends before it starts, using zero duration", entry.index);
                entry.end_time_ms = entry.start_time_ms;
                fixed += 1;
            }
            fixed
        }
        InvertedRangePolicy::Drop => {
            let before = entries.len();
            entries.retain(|e| !e.has_inverted_range());
            before - entries.len()
        }
    }
}

/// Overlap corrector with a configurable inverted-range policy
#[derive(Debug, Clone, Default)]
pub struct TimecodeCorrector {
    policy: InvertedRangePolicy,
}

impl TimecodeCorrector {
    /// Create a corrector with the given policy
    pub fn new(policy: InvertedRangePolicy) -> Self {
        Self { policy }
    }

    /// Apply the inverted-range policy, then fix overlaps
    ///
    /// Dropped entries never shorten their neighbours. Clamping sets an end to
    /// the next start, which is never below its own start, so no new
    /// inversions appear afterwards.
    pub fn correct(&self, entries: &mut Vec<SubtitleEntry>) -> CorrectionReport {
        let affected = resolve_inverted_ranges(entries, self.policy);
        let clamped = fix_overlaps(entries);

        CorrectionReport {
            clamped,
            ..CorrectionReport::for_policy(self.policy, affected)
        }
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End time is before start time
    InvalidTimeRange {
        start_ms: u64,
        end_ms: u64,
    },
    /// Overlaps with the previous entry
    OverlapsWithEntry {
        other_position: usize,
        overlap_ms: u64,
    },
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms > end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::OverlapsWithEntry { other_position, overlap_ms } => {
                write!(
                    f,
                    "Overlaps with entry {} by {}ms",
                    other_position, overlap_ms
                )
            }
        }
    }
}

/// Result of timecode validation for a single entry
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// 1-based position of the entry in the validated slice
    pub position: usize,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeEntryResult {
    /// Whether the entry passed validation
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Result of validating all timecodes in a collection
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Results for each entry
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Number of overlapping neighbours
    pub overlap_count: usize,
    /// Number of entries ending before they start
    pub inverted_count: usize,
}

impl TimecodeValidationResult {
    /// Overall pass/fail status
    pub fn passed(&self) -> bool {
        self.overlap_count == 0 && self.inverted_count == 0
    }

    /// Total number of issues
    pub fn total_issues(&self) -> usize {
        self.overlap_count + self.inverted_count
    }

    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed()).collect()
    }
}

/// Timecode validator for subtitle entries
pub struct TimecodeValidator;

impl TimecodeValidator {
    /// Validate entries in their current order
    pub fn validate_collection(entries: &[SubtitleEntry]) -> TimecodeValidationResult {
        let mut entry_results: Vec<TimecodeEntryResult> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut issues = Vec::new();
                if entry.has_inverted_range() {
                    issues.push(TimecodeIssue::InvalidTimeRange {
                        start_ms: entry.start_time_ms,
                        end_ms: entry.end_time_ms,
                    });
                }
                TimecodeEntryResult { position: i + 1, issues }
            })
            .collect();

        let inverted_count = entry_results.iter().filter(|r| !r.passed()).count();
        let mut overlap_count = 0;

        for (i, pair) in entries.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if current.end_time_ms > next.start_time_ms {
                overlap_count += 1;
                entry_results[i + 1].issues.push(TimecodeIssue::OverlapsWithEntry {
                    other_position: i + 1,
                    overlap_ms: current.end_time_ms - next.start_time_ms,
                });
            }
        }

        debug!(
            "Timecode validation: {} entries, {} overlaps, {} inverted",
            entries.len(),
            overlap_count,
            inverted_count
        );

        TimecodeValidationResult {
            entry_results,
            overlap_count,
            inverted_count,
        }
    }
}
