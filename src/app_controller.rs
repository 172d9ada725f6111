use anyhow::{Result, Context};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::subtitle_processor::{self, ParseWarning, ParsedSrt, SubtitleEntry};
use crate::timecodes::{self, CorrectionReport, TimecodeCorrector, TimecodeValidator};

// @module: Application controller for subtitle repair

/// Summary of one repair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Entries written to the output
    pub entries: usize,
    /// Blocks dropped for having fewer than two lines
    pub dropped_blocks: usize,
    /// Overlaps present in the sorted input
    pub overlaps_found: usize,
    /// Changes made by the timecode corrector
    pub correction: CorrectionReport,
    /// Recovered timestamp problems
    pub warnings: Vec<ParseWarning>,
}

/// Output text and summary of a repair
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// The repaired SRT text
    pub output: String,
    /// What was changed
    pub report: RepairReport,
}

/// Result of a file-level run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Output file written
    Written {
        output_path: PathBuf,
        report: RepairReport,
    },
    /// Output file already existed and overwriting was not allowed
    Skipped {
        output_path: PathBuf,
    },
}

/// Repair SRT text with the default configuration
pub fn repair(content: &str) -> Result<String, SubtitleError> {
    Controller::default().process(content).map(|outcome| outcome.output)
}

/// Main application controller for subtitle repair
#[derive(Debug, Clone, Default)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path used when the caller does not choose one
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, &self.config.output_suffix)
    }

    /// Repair SRT text: parse, sort, correct timecodes, serialize
    pub fn process(&self, content: &str) -> Result<RepairOutcome, SubtitleError> {
        let parsed = subtitle_processor::parse_srt_string(content, self.config.repair.strict_timestamps)?;
        let (entries, report) = self.repair_parsed(parsed);
        let output = subtitle_processor::serialize_entries(&entries, self.config.repair.normalize_punctuation);

        Ok(RepairOutcome { output, report })
    }

    fn repair_parsed(&self, parsed: ParsedSrt) -> (Vec<SubtitleEntry>, RepairReport) {
        let ParsedSrt { mut entries, dropped_blocks, warnings } = parsed;

        let before = TimecodeValidator::validate_collection(&entries);
        if !before.passed() {
            debug!(
                "Input has {} overlap(s) and {} inverted range(s)",
                before.overlap_count, before.inverted_count
            );
        }

        let policy = self.config.repair.inverted_range_policy;
        let correction = if self.config.repair.fix_overlaps {
            TimecodeCorrector::new(policy).correct(&mut entries)
        } else {
            let affected = timecodes::resolve_inverted_ranges(&mut entries, policy);
            CorrectionReport::for_policy(policy, affected)
        };

        let report = RepairReport {
            entries: entries.len(),
            dropped_blocks,
            overlaps_found: before.overlap_count,
            correction,
            warnings,
        };

        (entries, report)
    }

    /// Repair `input_file` into `output_file`
    ///
    /// An existing output is left alone unless `force_overwrite` is set.
    pub fn run(&self, input_file: &Path, output_file: &Path, force_overwrite: bool) -> Result<RunOutcome> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)).into());
        }

        if !FileManager::is_srt_file(input_file) {
            warn!("Input file does not have an .srt extension: {:?}", input_file);
        }

        if output_file.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_file);
            return Ok(RunOutcome::Skipped { output_path: output_file.to_path_buf() });
        }

        info!("Repairing subtitles: {:?}", input_file);

        let parsed = subtitle_processor::read_srt_file(input_file, self.config.repair.strict_timestamps)?;
        let (entries, report) = self.repair_parsed(parsed);

        subtitle_processor::write_srt_file(output_file, &entries, self.config.repair.normalize_punctuation)?;

        info!(
            "Wrote {} entries to {:?} ({} overlap(s) fixed, {} block(s) dropped, {} warning(s))",
            report.entries,
            output_file,
            report.correction.clamped,
            report.dropped_blocks,
            report.warnings.len()
        );

        Ok(RunOutcome::Written { output_path: output_file.to_path_buf(), report })
    }
}
