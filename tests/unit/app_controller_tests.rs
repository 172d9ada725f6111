/*!
 * Tests for application controller functionality
 */

use std::path::Path;
use anyhow::Result;
use srtfix::app_config::Config;
use srtfix::app_controller::{repair, Controller};
use srtfix::subtitle_processor::{self, ParseWarning};
use srtfix::formatting::PunctuationNormalizer;
use srtfix::timecodes::TimecodeValidator;
use srtfix::{InvertedRangePolicy, SubtitleError};
use crate::common;

/// Test the documented overlap scenario
#[test]
fn test_process_withOverlapScenario_shouldClampAndNormalize() -> Result<()> {
    common::init_logging();
    let outcome = Controller::default().process(common::OVERLAPPING_SRT)?;

    assert_eq!(outcome.output, common::OVERLAPPING_SRT_FIXED);
    assert_eq!(outcome.report.entries, 2);
    assert_eq!(outcome.report.overlaps_found, 1);
    assert_eq!(outcome.report.correction.clamped, 1);
    assert!(outcome.report.warnings.is_empty());

    Ok(())
}

/// Test the convenience function
#[test]
fn test_repair_withOverlapScenario_shouldMatchController() -> Result<()> {
    assert_eq!(repair(common::OVERLAPPING_SRT)?, common::OVERLAPPING_SRT_FIXED);
    Ok(())
}

/// Test that a single-line block yields empty output
#[test]
fn test_process_withOnlyTruncatedBlock_shouldProduceNothing() -> Result<()> {
    let outcome = Controller::default().process("1\n\n")?;

    assert_eq!(outcome.output, "");
    assert_eq!(outcome.report.entries, 0);
    assert_eq!(outcome.report.dropped_blocks, 1);

    Ok(())
}

/// Test that the repaired output satisfies the ordering, overlap and punctuation invariants
#[test]
fn test_process_withMessyInput_shouldSatisfyInvariants() -> Result<()> {
    let input = "4\n00:00:09,000 --> 00:00:12,000\n...and then!\n\n\
2\n00:00:02,000 --> 00:00:08,000\n(whispers) Quiet.\n\n\
3\n00:00:03,000 --> 00:00:07,000\n《书名》\n\n\
1\n00:00:00,500 --> 00:00:04,000\n\"Start\"\n\n\
5\n00:00:11,000 --> 00:00:10,000\nBackwards\n";

    let outcome = Controller::default().process(input)?;
    let reparsed = subtitle_processor::parse_srt_string(&outcome.output, true)?.entries;

    assert_eq!(reparsed.len(), 5);
    assert!(TimecodeValidator::validate_collection(&reparsed).passed());
    for (position, entry) in reparsed.iter().enumerate() {
        assert_eq!(entry.index, (position + 1).to_string());
        for edge in [entry.text.chars().next(), entry.text.chars().last()].into_iter().flatten() {
            assert!(!PunctuationNormalizer::is_punctuation(edge), "{:?}", entry.text);
        }
    }
    for pair in reparsed.windows(2) {
        assert!(pair[0].start_time_ms <= pair[1].start_time_ms);
    }

    Ok(())
}

/// Test idempotence of the whole pipeline on its own output
#[test]
fn test_process_onOwnOutput_shouldBeStable() -> Result<()> {
    let controller = Controller::default();
    let once = controller.process(common::OVERLAPPING_SRT)?;
    let twice = controller.process(&once.output)?;

    assert_eq!(twice.output, once.output);
    assert_eq!(twice.report.correction.clamped, 0);

    Ok(())
}

/// Test that the timecode line error aborts processing
#[test]
fn test_process_withMalformedTimecodeLine_shouldFail() {
    let err = Controller::default()
        .process("1\nnot a timecode\ntext\n")
        .unwrap_err();

    assert!(matches!(err, SubtitleError::MalformedTimecodeLine { block: 1, .. }));
}

/// Test lenient and strict handling of bad timestamps
#[test]
fn test_process_withBadTimestamp_shouldWarnOrFailByMode() -> Result<()> {
    let input = "1\n00:00:01,000 --> 00:AB:01,000\nText\n";

    let lenient = Controller::default().process(input)?;
    assert_eq!(
        lenient.report.warnings,
        vec![ParseWarning::InvalidTimestamp { block: 1, value: "00:AB:01,000".to_string() }]
    );
    // End fell back to 0 and was raised to the start
    assert!(lenient.output.contains("00:00:01,000 --> 00:00:01,000"));
    assert_eq!(lenient.report.correction.inverted_fixed, 1);

    let mut config = Config::default();
    config.repair.strict_timestamps = true;
    let strict = Controller::with_config(config)?;
    assert!(matches!(strict.process(input), Err(SubtitleError::InvalidTimestamp(_))));

    Ok(())
}

/// Test the configurable inverted-range policies
#[test]
fn test_process_withInvertedRangePolicies_shouldFollowConfig() -> Result<()> {
    let input = "1\n00:00:05,000 --> 00:00:01,000\nBackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nFine\n";

    let mut config = Config::default();
    config.repair.inverted_range_policy = InvertedRangePolicy::Drop;
    let dropped = Controller::with_config(config.clone())?.process(input)?;
    assert_eq!(dropped.report.entries, 1);
    assert_eq!(dropped.output, "1\n00:00:06,000 --> 00:00:07,000\nFine");

    config.repair.inverted_range_policy = InvertedRangePolicy::Keep;
    let kept = Controller::with_config(config)?.process(input)?;
    assert!(kept.output.contains("00:00:05,000 --> 00:00:01,000"));

    Ok(())
}

/// Test that a dropped caption does not shorten the caption before it
#[test]
fn test_process_withDropPolicyBetweenOverlaps_shouldClampAgainstKeptCaption() -> Result<()> {
    let input = "1\n00:00:01,000 --> 00:00:06,000\nA\n\n\
2\n00:00:03,000 --> 00:xx:00,000\nB\n\n\
3\n00:00:05,000 --> 00:00:07,000\nC\n";

    let mut config = Config::default();
    config.repair.inverted_range_policy = InvertedRangePolicy::Drop;
    let outcome = Controller::with_config(config)?.process(input)?;

    assert_eq!(
        outcome.output,
        "1\n00:00:01,000 --> 00:00:05,000\nA\n\n2\n00:00:05,000 --> 00:00:07,000\nC"
    );
    assert_eq!(outcome.report.correction.inverted_dropped, 1);
    assert_eq!(outcome.report.correction.clamped, 1);

    Ok(())
}

/// Test that disabling features leaves text and timings alone
#[test]
fn test_process_withFeaturesDisabled_shouldOnlyRenumber() -> Result<()> {
    let mut config = Config::default();
    config.repair.fix_overlaps = false;
    config.repair.normalize_punctuation = false;

    let outcome = Controller::with_config(config)?.process(common::OVERLAPPING_SRT)?;

    assert!(outcome.output.contains("00:00:01,000 --> 00:00:03,500\nHello, world!"));
    assert_eq!(outcome.report.correction.clamped, 0);
    assert_eq!(outcome.report.overlaps_found, 1);

    Ok(())
}

/// Test that an invalid configuration is rejected
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.output_suffix = String::new();

    let message = format!("{:#}", Controller::with_config(config).unwrap_err());

    assert!(message.contains("Configuration validation failed"));
    assert!(message.contains("output suffix"));
}

/// Test the default output path
#[test]
fn test_default_output_path_withConfiguredSuffix_shouldUseIt() -> Result<()> {
    let mut config = Config::default();
    config.output_suffix = ".clean".to_string();
    let controller = Controller::with_config(config)?;

    assert_eq!(controller.config().output_suffix, ".clean");
    assert_eq!(
        controller.default_output_path(Path::new("dir/movie.srt")),
        Path::new("dir/movie.clean.srt")
    );

    Ok(())
}
