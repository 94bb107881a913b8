/*!
 * Linear retiming of subtitle cues.
 *
 * Every operation here is an affine map `new = round(old * factor) + sign * offset`
 * applied to the on and off time of every cue:
 * - shifting uses `factor = 1`
 * - scaling uses `Sign::Zero`
 * - resync derives both from two anchor cues
 */

use log::{debug, info, warn};

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleCollection;

/// Direction of the constant offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// Sign of a signed millisecond value
    pub fn of(value: i64) -> Self {
        match value {
            v if v < 0 => Self::Negative,
            0 => Self::Zero,
            _ => Self::Positive,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Negative => -1,
            Self::Zero => 0,
            Self::Positive => 1,
        }
    }
}

/// Outcome of a transform pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformReport {
    /// Number of cues touched
    pub entries: usize,
    /// Number of cues with a time that had to be clamped into `[0, u32::MAX]`
    pub clamped: usize,
}

/// Parameters derived by [`resync`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncReport {
    pub factor: f64,
    pub shift_ms: i64,
    pub transform: TransformReport,
}

// @returns: Retimed value and whether it was clamped
fn retime(ms: u32, factor: f64, delta: i64) -> (u32, bool) {
    let scaled = (f64::from(ms) * factor).round();
    let shifted = scaled + delta as f64;

    if shifted < 0.0 {
        (0, true)
    } else if shifted > f64::from(u32::MAX) {
        (u32::MAX, true)
    } else {
        (shifted as u32, false)
    }
}

/// Scale and shift every cue in place.
///
/// With `sign = Sign::Zero` the offset is ignored. Times that would fall
/// below zero or past the 32-bit millisecond range saturate.
pub fn transform(
    subtitles: &mut SubtitleCollection,
    factor: f64,
    sign: Sign,
    offset_ms: u32,
) -> TransformReport {
    let delta = sign.as_i64() * i64::from(offset_ms);
    let mut report = TransformReport::default();

    for entry in subtitles.entries_mut() {
        let (start, start_clamped) = retime(entry.start_time_ms, factor, delta);
        let (end, end_clamped) = retime(entry.end_time_ms, factor, delta);
        entry.start_time_ms = start;
        entry.end_time_ms = end;

        report.entries += 1;
        if start_clamped || end_clamped {
            report.clamped += 1;
        }
    }

    debug!(
        "Transformed {} entries (factor {}, offset {}ms)",
        report.entries, factor, delta
    );
    if report.clamped > 0 {
        warn!(
            "{} subtitle(s) fell outside the representable time range and were clamped",
            report.clamped
        );
    }

    report
}

/// Shift every cue by a signed number of milliseconds
pub fn shift(subtitles: &mut SubtitleCollection, delta_ms: i64) -> TransformReport {
    let offset = u32::try_from(delta_ms.unsigned_abs()).unwrap_or(u32::MAX);
    transform(subtitles, 1.0, Sign::of(delta_ms), offset)
}

/// Multiply every timestamp by `factor`
pub fn scale(subtitles: &mut SubtitleCollection, factor: f64) -> TransformReport {
    transform(subtitles, factor, Sign::Zero, 0)
}

/// Linearly resynchronize so that cue `index1` starts at `time1` and cue
/// `index2` starts at `time2`. Indices are 1-based.
pub fn resync(
    subtitles: &mut SubtitleCollection,
    index1: usize,
    time1: u32,
    index2: usize,
    time2: u32,
) -> Result<SyncReport, SubtitleError> {
    let t1_old = subtitles.get_numbered(index1)?.start_time_ms;
    let t2_old = subtitles.get_numbered(index2)?.start_time_ms;

    if t1_old == t2_old {
        return Err(SubtitleError::DivideByZero {
            index1,
            index2,
            time_ms: t1_old,
        });
    }

    let factor = (f64::from(time2) - f64::from(time1)) / (f64::from(t2_old) - f64::from(t1_old));
    // Saturating cast: steep negative factors can push the shift past i64.
    let shift_ms = (f64::from(time1) - (f64::from(t1_old) * factor).round()) as i64;
    if factor <= 0.0 {
        warn!("Anchors reverse the timeline (factor {})", factor);
    }

    info!("scaled by {}, shifted by {}s", factor, shift_ms as f64 / 1e3);

    let sign = if shift_ms < 0 { Sign::Negative } else { Sign::Positive };
    let offset = u32::try_from(shift_ms.unsigned_abs()).unwrap_or(u32::MAX);
    let report = transform(subtitles, factor, sign, offset);

    Ok(SyncReport {
        factor,
        shift_ms,
        transform: report,
    })
}
