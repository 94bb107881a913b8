use anyhow::Context;
use log::{debug, info};

use crate::app_config::Config;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::{Endpoint, FileManager};
use crate::search;
use crate::subtitle_processor::SubtitleCollection;
use crate::transform::{self, TransformReport};

// @module: Application controller for subtitle retiming and lookup

/// One requested operation on a subtitle file
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Print the cue nearest `time_ms` containing every word
    Search { time_ms: u32, words: Vec<String> },
    /// Move every cue by a signed offset
    Shift { delta_ms: i64 },
    /// Multiply every timestamp by a factor
    Scale { factor: f64 },
    /// Two-point linear resync, indices 1-based
    Sync {
        index1: usize,
        time1_ms: u32,
        index2: usize,
        time2_ms: u32,
    },
}

/// What has to happen after an operation ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this block; the subtitles themselves are not written back
    Print(String),
    /// The subtitles were modified and must be written out
    Save,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Load subtitles from a file or standard input
    pub fn load(&self, input: &Endpoint) -> Result<SubtitleCollection, AppError> {
        let reader = FileManager::open_input(input)?;
        let subtitles = SubtitleCollection::from_reader(reader, self.config.subtitles.timestamp_policy)
            .with_context(|| format!("Failed to load subtitles from {}", input))?;
        debug!("{}", subtitles);
        Ok(subtitles)
    }

    /// Apply an operation to loaded subtitles
    pub fn execute(&self, operation: &Operation, subtitles: &mut SubtitleCollection) -> Result<Outcome, AppError> {
        match operation {
            Operation::Search { time_ms, words } => {
                let index = search::search(subtitles, *time_ms, words.as_slice())?;
                info!("Found subtitle {}", index + 1);
                let block = subtitles
                    .format_cue(index)
                    .ok_or(SubtitleError::IndexOutOfRange { index: index + 1, count: subtitles.len() })?;
                Ok(Outcome::Print(block))
            }
            Operation::Shift { delta_ms } => {
                let report = transform::shift(subtitles, *delta_ms);
                self.check_report(report)?;
                Ok(Outcome::Save)
            }
            Operation::Scale { factor } => {
                if !factor.is_finite() || *factor <= 0.0 {
                    return Err(AppError::Usage(format!("scale factor must be a positive number, got {}", factor)));
                }
                let report = transform::scale(subtitles, *factor);
                self.check_report(report)?;
                Ok(Outcome::Save)
            }
            Operation::Sync { index1, time1_ms, index2, time2_ms } => {
                let sync = transform::resync(subtitles, *index1, *time1_ms, *index2, *time2_ms)?;
                self.check_report(sync.transform)?;
                Ok(Outcome::Save)
            }
        }
    }

    // @checks: Clamped transform output against configuration
    fn check_report(&self, report: TransformReport) -> Result<(), AppError> {
        if report.clamped == 0 {
            return Ok(());
        }
        if self.config.subtitles.reject_clamped {
            return Err(SubtitleError::TimeRangeExceeded { clamped: report.clamped }.into());
        }
        debug!("Keeping {} clamped subtitle(s) in the output", report.clamped);
        Ok(())
    }

    /// Load, run one operation, and print or save the result
    pub fn run(&self, operation: &Operation, input: &Endpoint, output: &Endpoint) -> Result<(), AppError> {
        let mut subtitles = self.load(input)?;

        match self.execute(operation, &mut subtitles)? {
            Outcome::Print(block) => {
                FileManager::write_output(&Endpoint::Stdio, block.as_bytes())?;
            }
            Outcome::Save => {
                FileManager::write_output(output, subtitles.to_srt_string().as_bytes())?;
                debug!("Wrote {} subtitles to {}", subtitles.len(), output);
            }
        }

        Ok(())
    }
}
