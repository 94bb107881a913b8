/*!
 * Integration tests for the load, operate, save workflow
 */

use std::fs;
use anyhow::Result;
use srtsync::app_config::Config;
use srtsync::app_controller::{Controller, Operation, Outcome};
use srtsync::errors::{AppError, SubtitleError};
use srtsync::file_utils::Endpoint;
use srtsync::subtitle_processor::SubtitleCollection;
use srtsync::timestamp::TimestampPolicy;
use crate::common;

fn sample() -> Result<SubtitleCollection> {
    Ok(SubtitleCollection::parse_srt_string(common::SAMPLE_SRT, TimestampPolicy::Permissive)?)
}

#[test]
fn test_run_withShiftBetweenFiles_shouldWriteShiftedCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "in.srt", common::SAMPLE_SRT)?;
    let output = temp_dir.path().join("out.srt");

    let controller = Controller::with_config(Config::default());
    controller
        .run(
            &Operation::Shift { delta_ms: 1_500 },
            &Endpoint::File(input.clone()),
            &Endpoint::File(output.clone()),
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let written = fs::read_to_string(&output)?;
    assert!(written.starts_with("1\r\n00:00:02,500 --> 00:00:05,500\r\n"));
    assert!(written.contains("3\r\n00:00:11,500 --> 00:00:15,500\r\n"));
    assert_eq!(fs::read_to_string(&input)?, common::SAMPLE_SRT);
    Ok(())
}

#[test]
fn test_run_withMismatchedNumbering_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::SAMPLE_SRT.replace("\n2\n", "\n3\n");
    let input = common::create_test_file(temp_dir.path(), "in.srt", &broken)?;
    let output = temp_dir.path().join("out.srt");

    let controller = Controller::with_config(Config::default());
    let result = controller.run(
        &Operation::Scale { factor: 2.0 },
        &Endpoint::File(input),
        &Endpoint::File(output.clone()),
    );

    assert!(matches!(result, Err(AppError::Subtitle(SubtitleError::Parse { line: 5, .. }))));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_execute_withSearch_shouldPrintBlockWithoutMutation() -> Result<()> {
    let mut subtitles = sample()?;
    let before = subtitles.clone();
    let controller = Controller::with_config(Config::default());

    let outcome = controller
        .execute(
            &Operation::Search { time_ms: 9_000, words: vec!["multiple".to_string()] },
            &mut subtitles,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    assert_eq!(
        outcome,
        Outcome::Print("2\r\n00:00:05,000 --> 00:00:09,000\r\nIt contains\r\nmultiple lines.\r\n".to_string())
    );
    assert_eq!(subtitles, before);
    Ok(())
}

#[test]
fn test_execute_withSearchMiss_shouldReturnNotFound() -> Result<()> {
    let mut subtitles = sample()?;
    let controller = Controller::with_config(Config::default());

    let result = controller.execute(
        &Operation::Search { time_ms: 0, words: vec!["absent".to_string()] },
        &mut subtitles,
    );

    assert!(result.as_ref().is_err_and(|e| e.is_not_found()));
    Ok(())
}

#[test]
fn test_execute_withSync_shouldAlignAnchors() -> Result<()> {
    let mut subtitles = sample()?;
    let controller = Controller::with_config(Config::default());

    let outcome = controller
        .execute(
            &Operation::Sync { index1: 1, time1_ms: 2_000, index2: 3, time2_ms: 20_000 },
            &mut subtitles,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    assert_eq!(outcome, Outcome::Save);
    assert_eq!(common::start_times(&subtitles), vec![2_000, 10_000, 20_000]);
    Ok(())
}

#[test]
fn test_execute_withInvalidScale_shouldBeUsageError() -> Result<()> {
    let mut subtitles = sample()?;
    let controller = Controller::with_config(Config::default());

    for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = controller.execute(&Operation::Scale { factor }, &mut subtitles);
        assert!(matches!(result, Err(AppError::Usage(_))), "{}", factor);
    }
    Ok(())
}

#[test]
fn test_execute_withClampingAndRejectConfig_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.subtitles.reject_clamped = true;
    let controller = Controller::with_config(config);
    let mut subtitles = sample()?;

    let result = controller.execute(&Operation::Shift { delta_ms: -2_000 }, &mut subtitles);
    assert!(matches!(
        result,
        Err(AppError::Subtitle(SubtitleError::TimeRangeExceeded { clamped: 1 }))
    ));

    let lenient = Controller::with_config(Config::default());
    let mut subtitles = sample()?;
    assert!(lenient.execute(&Operation::Shift { delta_ms: -2_000 }, &mut subtitles).is_ok());
    Ok(())
}

#[test]
fn test_load_withStrictConfig_shouldRejectSloppyTimes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "sloppy.srt",
        "1\n0:00:01,000 --> 0:00:02,000\nHi\n",
    )?;

    let mut config = Config::default();
    config.subtitles.timestamp_policy = TimestampPolicy::Strict;
    let strict = Controller::with_config(config);
    assert!(matches!(
        strict.load(&Endpoint::File(input.clone())),
        Err(AppError::Subtitle(SubtitleError::Parse { line: 2, .. }))
    ));

    let permissive = Controller::with_config(Config::default());
    assert!(permissive.load(&Endpoint::File(input)).is_ok());
    Ok(())
}
