// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srtfix::app_config::{self, Config};
use srtfix::{Controller, InvertedRangePolicy, RunOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for InvertedRangePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliInvertedPolicy {
    ZeroDuration,
    Drop,
    Keep,
}

impl From<CliInvertedPolicy> for InvertedRangePolicy {
    fn from(cli_policy: CliInvertedPolicy) -> Self {
        match cli_policy {
            CliInvertedPolicy::ZeroDuration => InvertedRangePolicy::ZeroDuration,
            CliInvertedPolicy::Drop => InvertedRangePolicy::Drop,
            CliInvertedPolicy::Keep => InvertedRangePolicy::Keep,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Repair an SRT subtitle file (default command)
    #[command(alias = "repair")]
    Fix(FixArgs),

    /// Generate shell completions for srtfix
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct FixArgs {
    /// Input SRT file to repair
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (defaults to <name>_fixed.<ext> next to the input)
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "srtfix.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Fail on malformed timestamps instead of using 00:00:00,000
    #[arg(long)]
    strict: bool,

    /// Leave caption punctuation untouched
    #[arg(long)]
    keep_punctuation: bool,

    /// Do not shorten overlapping captions
    #[arg(long)]
    no_overlap_fix: bool,

    /// What to do with captions that end before they start
    #[arg(long, value_enum)]
    inverted: Option<CliInvertedPolicy>,

    /// Save the effective configuration to the config path
    #[arg(long)]
    save_config: bool,
}

/// srtfix - SRT subtitle repair
///
/// Fixes overlapping captions, normalizes punctuation and renumbers
/// entries of an SRT subtitle file.
#[derive(Parser, Debug)]
#[command(name = "srtfix")]
#[command(version)]
#[command(about = "Repair malformed SRT subtitle files")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srtfix parses an SRT file, sorts captions by start time, shortens captions that overlap the next one, strips leading and trailing punctuation, and writes a renumbered SRT file.

EXAMPLES:
    srtfix movie.srt                          # Writes movie_fixed.srt
    srtfix -o clean.srt movie.srt             # Choose the output file
    srtfix -f movie.srt                       # Overwrite an existing output
    srtfix --strict movie.srt                 # Reject malformed timestamps
    srtfix --inverted drop movie.srt          # Drop captions that end before they start
    srtfix completions bash > srtfix.bash     # Generate bash completions

CONFIGURATION:
    Settings are read from srtfix.json when it exists. Use --config-path to
    choose another file and --save-config to write the effective settings.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    fix: FixArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Trace here so the configured level is the only filter; lowered right after
    if CustomLogger::init(LevelFilter::Trace).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtfix", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Fix(args)) => run_fix(args),
        None => run_fix(cli.fix),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_fix(options: FixArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let input_path = options.input_path.clone().ok_or_else(|| {
        anyhow!("INPUT_PATH is required when no subcommand is specified")
    })?;

    let config = load_config(&options)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let controller = Controller::with_config(config)?;

    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| controller.default_output_path(&input_path));

    match controller.run(&input_path, &output_path, options.force_overwrite)? {
        RunOutcome::Written { output_path, .. } => info!("Success: {:?}", output_path),
        RunOutcome::Skipped { .. } => {}
    }

    Ok(())
}

// @loads: Config file (if present) with command line overrides applied
fn load_config(options: &FixArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&options.config_path)?;

    if options.strict {
        config.repair.strict_timestamps = true;
    }

    if options.keep_punctuation {
        config.repair.normalize_punctuation = false;
    }

    if options.no_overlap_fix {
        config.repair.fix_overlaps = false;
    }

    if let Some(policy) = &options.inverted {
        config.repair.inverted_range_policy = policy.clone().into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    if options.save_config {
        config.save(&options.config_path)?;
        info!("Saved configuration to {:?}", options.config_path);
    }

    Ok(config)
}
