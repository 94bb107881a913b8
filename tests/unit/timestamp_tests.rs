/*!
 * Tests for clock time and duration parsing
 */

use srtsync::errors::SubtitleError;
use srtsync::timestamp::{
    format_clock_time, parse_clock_time, parse_duration, parse_signed_duration, TimestampPolicy,
};

#[test]
fn test_parse_clock_time_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = parse_clock_time(ts, TimestampPolicy::Permissive).unwrap();
    assert_eq!(ms, 5_025_678);
    assert_eq!(format_clock_time(ms), ts);
}

#[test]
fn test_parse_clock_time_withAnySeparator_shouldIgnoreIt() {
    for ts in ["00:01:02,003", "00:01:02.003", "00:01:02:003"] {
        assert_eq!(parse_clock_time(ts, TimestampPolicy::Permissive).unwrap(), 62_003);
        assert_eq!(parse_clock_time(ts, TimestampPolicy::Strict).unwrap(), 62_003);
    }
}

#[test]
fn test_clock_time_roundTrip_withSampledRange_shouldBeExact() {
    let mut ms = 0u32;
    while ms <= 359_999_999 {
        let text = format_clock_time(ms);
        assert_eq!(parse_clock_time(&text, TimestampPolicy::Permissive).unwrap(), ms, "{}", text);
        assert_eq!(parse_clock_time(&text, TimestampPolicy::Strict).unwrap(), ms, "{}", text);
        ms += 7_919;
    }
    let max = format_clock_time(359_999_999);
    assert_eq!(max, "99:59:59,999");
    assert_eq!(parse_clock_time(&max, TimestampPolicy::Permissive).unwrap(), 359_999_999);
}

#[test]
fn test_format_clock_time_withMoreThan99Hours_shouldWidenHours() {
    assert_eq!(format_clock_time(360_000_000), "100:00:00,000");
    assert_eq!(format_clock_time(u32::MAX), "1193:02:47,295");
    assert_eq!(parse_clock_time("100:00:00,000", TimestampPolicy::Strict).unwrap(), 360_000_000);
}

#[test]
fn test_parse_clock_time_withWideHours_shouldOnlyRoundTripWhenStrict() {
    let wide = format_clock_time(360_000_000 + 61_001);
    assert_eq!(wide, "100:01:01,001");
    assert_eq!(parse_clock_time(&wide, TimestampPolicy::Strict).unwrap(), 360_061_001);
    assert_ne!(parse_clock_time(&wide, TimestampPolicy::Permissive).unwrap(), 360_061_001);
}

#[test]
fn test_parse_clock_time_withGarbage_shouldStayPermissive() {
    assert!(parse_clock_time("garbage", TimestampPolicy::Permissive).is_ok());
    assert_eq!(parse_clock_time("", TimestampPolicy::Permissive).unwrap(), 0);
}

#[test]
fn test_parse_clock_time_withGarbage_shouldFailWhenStrict() {
    for bad in ["garbage", "", "00:61:00,000", "00:00:60,000", "0:00:00,000", "00-00-00,000", "00:00:00,00"] {
        let result = parse_clock_time(bad, TimestampPolicy::Strict);
        assert!(matches!(result, Err(SubtitleError::Timestamp(_))), "{:?}", bad);
    }
}

#[test]
fn test_parse_duration_withUnits_shouldSumTokens() {
    assert_eq!(parse_duration("1h2m3s").unwrap(), 3_723_000);
    assert_eq!(parse_duration("90s").unwrap(), 90_000);
    assert_eq!(parse_duration("500").unwrap(), 500);
    assert_eq!(parse_duration("1H30M").unwrap(), 5_400_000);
    assert_eq!(parse_duration("2s250").unwrap(), 2_250);
    assert_eq!(parse_duration("").unwrap(), 0);
}

#[test]
fn test_parse_duration_withOverflow_shouldFail() {
    assert!(parse_duration("5000h").is_err());
    assert!(parse_duration("99999999999").is_err());
}

#[test]
fn test_parse_signed_duration_withLeadingSign_shouldApplyIt() {
    assert_eq!(parse_signed_duration("-1m30s").unwrap(), -90_000);
    assert_eq!(parse_signed_duration("+2s").unwrap(), 2_000);
    assert_eq!(parse_signed_duration("750").unwrap(), 750);
}
