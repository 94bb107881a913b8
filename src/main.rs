// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap::error::ErrorKind;
use clap_complete::{generate, Shell};
use log::{error, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};

use srtsync::app_config::{self, Config};
use srtsync::app_controller::{Controller, Operation};
use srtsync::errors::AppError;
use srtsync::file_utils::Endpoint;
use srtsync::timestamp::{self, TimestampPolicy};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Off => app_config::LogLevel::Off,
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

// @parses: Unsigned duration argument such as 1h2m3s
fn parse_time_arg(value: &str) -> Result<u32, String> {
    timestamp::parse_duration(value).map_err(|e| e.to_string())
}

// @parses: Signed duration argument such as -1m30s
fn parse_offset_arg(value: &str) -> Result<i64, String> {
    timestamp::parse_signed_duration(value).map_err(|e| e.to_string())
}

// @parses: Finite positive scale factor
fn parse_factor_arg(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(factor) if factor.is_finite() && factor > 0.0 => Ok(factor),
        _ => Err(format!("'{}' is not a positive number", value)),
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the subtitle nearest TIME whose text contains every WORD
    Search {
        /// Time to search around (e.g. 1h2m3s, 90s, 500)
        #[arg(value_parser = parse_time_arg)]
        time: u32,

        /// Words that must appear, in this order (put words starting with '-' after '--')
        words: Vec<String>,
    },

    /// Shift all subtitles by TIME (-TIME moves them earlier)
    Shift {
        /// Signed offset (e.g. +2s, -1m30s)
        #[arg(allow_hyphen_values = true, value_parser = parse_offset_arg)]
        offset: i64,
    },

    /// Multiply all time stamps by FACTOR
    Scale {
        /// Scale factor (e.g. 1.04271)
        #[arg(value_parser = parse_factor_arg)]
        factor: f64,
    },

    /// Linearly sync subtitles so two cues start at the given times
    Sync {
        /// Number of the first anchor subtitle
        index1: usize,
        /// Wanted start of the first anchor
        #[arg(value_parser = parse_time_arg)]
        time1: u32,
        /// Number of the second anchor subtitle
        index2: usize,
        /// Wanted start of the second anchor
        #[arg(value_parser = parse_time_arg)]
        time2: u32,
    },

    /// Generate shell completions for srtsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtsync - shift, scale, resync and search SRT subtitles
///
/// Reads subtitles from standard input (or --input), applies one operation and
/// writes the result to standard output (or --output).
#[derive(Parser, Debug)]
#[command(name = "srtsync")]
#[command(version)]
#[command(about = "Shift, scale, resync and search SRT subtitles")]
#[command(arg_required_else_help = true)]
#[command(long_about = "srtsync retimes SRT subtitle files and looks up subtitles by time and text.

EXAMPLES:
    srtsync search 1h2m hello world < movie.srt  # Subtitle near 1:02:00 with 'hello' then 'world'
    srtsync shift -1m30s < in.srt > out.srt      # Move everything 90 seconds earlier
    srtsync scale 1.04271 -i in.srt -o out.srt   # 25 fps subtitles on a 23.976 fps video
    srtsync sync 12 2m3s 640 1h31m7s < in.srt    # Subtitle 12 at 2:03, subtitle 640 at 1:31:07
    srtsync completions bash > srtsync.bash      # Generate bash completions

TIMES:
    Durations are numbers followed by h, m or s (case-insensitive); a bare
    number is milliseconds. Tokens may be chained: 1h2m3s500.

CONFIGURATION:
    Settings are read from srtsync.json when it exists (see --config).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Subtitle file to read ('-' or absent for standard input)
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Subtitle file to write ('-' or absent for standard output)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long = "config", global = true, default_value = "srtsync.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Reject malformed clock times instead of reading them leniently
    #[arg(long, global = true)]
    strict_timestamps: bool,
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
        // The logger itself accepts everything; log::max_level does the filtering.
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Label and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("error", "1;31"),
            Level::Warn => ("warn ", "1;33"),
            Level::Info => ("info ", "1;32"),
            Level::Debug => ("debug", "1;36"),
            Level::Trace => ("trace", "1;35"),
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
            let (label, color) = Self::style_for_level(record.level());

            // Subtitles go to stdout, so diagnostics must stay on stderr.
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    if let Err(e) = CustomLogger::init(LevelFilter::Warn) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };

    let operation = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtsync", &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Commands::Search { time, words } => Operation::Search { time_ms: time, words },
        Commands::Shift { offset } => Operation::Shift { delta_ms: offset },
        Commands::Scale { factor } => Operation::Scale { factor },
        Commands::Sync { index1, time1, index2, time2 } => Operation::Sync {
            index1,
            time1_ms: time1,
            index2,
            time2_ms: time2,
        },
    };

    let config = match load_config(&cli.config_path, cli.log_level, cli.strict_timestamps) {
        Ok(config) => config,
        Err(e) => return failure_exit(e),
    };
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Running {:?}", operation);

    let controller = Controller::with_config(config);
    match controller.run(&operation, &Endpoint::from_arg(cli.input), &Endpoint::from_arg(cli.output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => failure_exit(e),
    }
}

// @loads: Config file with command line overrides applied
fn load_config(config_path: &str, log_level: Option<CliLogLevel>, strict_timestamps: bool) -> Result<Config, AppError> {
    let mut config = Config::load_or_default(config_path)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }
    if strict_timestamps {
        config.subtitles.timestamp_policy = TimestampPolicy::Strict;
    }

    Ok(config)
}

// @handles: Help, version and malformed arguments
fn usage_exit(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = e.print();
            ExitCode::from(AppError::Usage(e.to_string()).exit_code() as u8)
        }
        _ => {
            let _ = e.print();
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr);
            let _ = CommandLineOptions::command().write_help(&mut stderr);
            ExitCode::from(AppError::Usage(e.to_string()).exit_code() as u8)
        }
    }
}

// @handles: Report an application error and pick the exit code
fn failure_exit(e: AppError) -> ExitCode {
    if e.is_not_found() {
        eprintln!("Not found.");
    } else {
        error!("{}", e);
    }
    ExitCode::from(e.exit_code() as u8)
}
