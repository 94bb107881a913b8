use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

// @module: Clock time and duration conversions

const MS_PER_SECOND: u32 = 1_000;
const MS_PER_MINUTE: u32 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u32 = 60 * MS_PER_MINUTE;

/// How strictly `HH:MM:SS,mmm` clock strings are checked
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Read fields by fixed position and never reject input
    #[default]
    Permissive,
    /// Validate layout and field ranges before converting
    Strict,
}

/// Parse a clock time such as `01:02:03,456` into milliseconds.
///
/// Under [`TimestampPolicy::Permissive`] the four fields are read at byte
/// offsets 0, 3, 6 and 9 and the separators are skipped without being looked
/// at, so `01:02:03.456` parses the same as `01:02:03,456`. Malformed input
/// yields some number rather than an error. Hours wider than two digits, as
/// [`format_clock_time`] writes past 99 hours, shift the fixed offsets and
/// lose minutes and seconds; read such files with [`TimestampPolicy::Strict`].
pub fn parse_clock_time(text: &str, policy: TimestampPolicy) -> Result<u32, SubtitleError> {
    match policy {
        TimestampPolicy::Permissive => Ok(parse_clock_time_permissive(text)),
        TimestampPolicy::Strict => parse_clock_time_strict(text),
    }
}

fn parse_clock_time_permissive(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let field = |offset: usize| bytes.get(offset..).map_or(0, leading_int);

    let total = field(0)
        .wrapping_mul(60)
        .wrapping_add(field(3))
        .wrapping_mul(60)
        .wrapping_add(field(6))
        .wrapping_mul(1000)
        .wrapping_add(field(9));
    // Out-of-range values wrap around in 32 bits.
    total as u32
}

// @parses: Leading integer with optional whitespace and sign, 0 if none
fn leading_int(bytes: &[u8]) -> i64 {
    let mut rest = bytes;
    while let [first, tail @ ..] = rest {
        if first.is_ascii_whitespace() {
            rest = tail;
        } else {
            break;
        }
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let value = rest
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| acc.wrapping_mul(10).wrapping_add(i64::from(b - b'0')));

    if negative { value.wrapping_neg() } else { value }
}

fn parse_clock_time_strict(text: &str) -> Result<u32, SubtitleError> {
    let trimmed = text.trim();
    let invalid = |reason: &str| SubtitleError::Timestamp(format!("{:?}: {}", trimmed, reason));

    let (hours, rest) = trimmed
        .split_once(':')
        .ok_or_else(|| invalid("expected HH:MM:SS,mmm"))?;
    let rest = rest.as_bytes();

    if hours.len() < 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("hours must be at least two digits"));
    }
    if rest.len() != 9 {
        return Err(invalid("expected HH:MM:SS,mmm"));
    }
    if rest[2] != b':' {
        return Err(invalid("missing ':' between minutes and seconds"));
    }
    if !rest[5].is_ascii_punctuation() {
        return Err(invalid("missing fraction separator"));
    }

    let digits = |range: std::ops::Range<usize>| -> Result<u32, SubtitleError> {
        let field = &rest[range];
        if !field.iter().all(u8::is_ascii_digit) {
            return Err(invalid("non-digit in time field"));
        }
        Ok(field.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
    };

    let minutes = digits(0..2)?;
    let seconds = digits(3..5)?;
    let millis = digits(6..9)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }

    let hours: u32 = hours.parse().map_err(|_| invalid("hours out of range"))?;
    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| invalid("exceeds the 32-bit millisecond range"))
}

/// Format milliseconds as `HH:MM:SS,mmm`.
///
/// Hours are zero-padded to two digits and simply grow wider past 99.
pub fn format_clock_time(ms: u32) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

// @returns: Multiplier for a duration unit suffix
fn unit_multiplier(unit: u8) -> u32 {
    match unit {
        b'h' | b'H' => MS_PER_HOUR,
        b'm' | b'M' => MS_PER_MINUTE,
        b's' | b'S' => MS_PER_SECOND,
        _ => 1,
    }
}

/// Parse a loose duration such as `1h2m3s`, `90s` or `500` into milliseconds.
///
/// Each token is a number followed by an optional unit; a bare number counts
/// as milliseconds. Any other character after a number is consumed and the
/// number is taken as milliseconds. Signs are not accepted here, see
/// [`parse_signed_duration`].
pub fn parse_duration(text: &str) -> Result<u32, SubtitleError> {
    let bytes = text.as_bytes();
    let overflow = || SubtitleError::Timestamp(format!("{:?}: duration too large", text));

    let mut total: u32 = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let digits_end = bytes[pos..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |n| pos + n);

        let mut value: u32 = 0;
        for b in &bytes[pos..digits_end] {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or_else(overflow)?;
        }
        pos = digits_end;

        if let Some(&unit) = bytes.get(pos) {
            value = value.checked_mul(unit_multiplier(unit)).ok_or_else(overflow)?;
            pos += 1;
        }
        total = total.checked_add(value).ok_or_else(overflow)?;
    }

    Ok(total)
}

/// Parse a duration with an optional leading `+` or `-`.
pub fn parse_signed_duration(text: &str) -> Result<i64, SubtitleError> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let ms = i64::from(parse_duration(body)?);
    Ok(if negative { -ms } else { ms })
}
