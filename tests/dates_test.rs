use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lineupcli::dates::*;
use serde_json::json;

// Helper function to build a naive date-time
fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// Helper function to build an aware UTC instant
fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> CanonicalInstant {
    CanonicalInstant::Aware(Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap())
}

#[test]
fn test_normalize_date_only_formats() {
    let expected = CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0));

    for input in [
        "2025-03-08",
        "2025/03/08",
        "03/08/2025",
        "3/8/2025",
        "March 8, 2025",
        "march 8 2025",
        "Mar 8th, 2025",
        "8 March 2025",
        "  2025-03-08  ",
    ] {
        assert_eq!(normalize(input, None).unwrap(), expected, "input: {}", input);
    }
}

#[test]
fn test_normalize_naive_date_times() {
    let expected = CanonicalInstant::Naive(naive(2025, 3, 8, 14, 30, 0));

    assert_eq!(normalize("2025-03-08 14:30:00", None).unwrap(), expected);
    assert_eq!(normalize("2025-03-08T14:30:00", None).unwrap(), expected);
    assert_eq!(normalize("2025-03-08 14:30", None).unwrap(), expected);
    assert_eq!(normalize("2025/03/08 14:30:00", None).unwrap(), expected);
    assert_eq!(normalize("03/08/2025 14:30", None).unwrap(), expected);
    assert_eq!(normalize("March 8, 2025 14:30", None).unwrap(), expected);
}

#[test]
fn test_normalize_offsets_convert_to_utc() {
    assert_eq!(
        normalize("2025-03-08 14:30:00-05:00", None).unwrap(),
        utc(2025, 3, 8, 19, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08T14:30:00Z", None).unwrap(),
        utc(2025, 3, 8, 14, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08 14:30:00Z", None).unwrap(),
        utc(2025, 3, 8, 14, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08T14:30:00+0100", None).unwrap(),
        utc(2025, 3, 8, 13, 30, 0)
    );

    // API played_at values carry milliseconds
    let played_at = normalize("2025-03-08T21:04:11.123Z", None).unwrap();
    assert_eq!(played_at.epoch_millis().unwrap(), 1741467851123);
}

#[test]
fn test_normalize_applies_timezone_hint_to_naive_values() {
    // US/Pacific is still on PST (UTC-8) on March 8th 2025
    assert_eq!(
        normalize("2025-03-08 14:30:00", Some("US/Pacific")).unwrap(),
        utc(2025, 3, 8, 22, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08 20:15", Some("UTC")).unwrap(),
        utc(2025, 3, 8, 20, 15, 0)
    );

    // an explicit offset wins over the hint
    assert_eq!(
        normalize("2025-03-08 14:30:00-05:00", Some("Asia/Tokyo")).unwrap(),
        utc(2025, 3, 8, 19, 30, 0)
    );

    // blank hints are ignored
    assert_eq!(
        normalize("2025-03-08", Some("  ")).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0))
    );
}

#[test]
fn test_normalize_daylight_saving_transitions() {
    // 02:30 does not exist on the day clocks spring forward
    let gap = normalize("2025-03-09 02:30:00", Some("US/Pacific"));
    assert!(matches!(gap, Err(ParseError::MalformedFormat(_))));

    // 01:30 happens twice when clocks fall back; the earlier (PDT) one is used
    assert_eq!(
        normalize("2025-11-02 01:30:00", Some("US/Pacific")).unwrap(),
        utc(2025, 11, 2, 8, 30, 0)
    );
}

#[test]
fn test_unknown_timezone_lenient_falls_back_to_local() {
    let result = DateNormalizer::lenient()
        .normalize("2025-03-08 14:30:00", Some("Mars/Olympus_Mons"))
        .unwrap();

    let expected = Local
        .from_local_datetime(&naive(2025, 3, 8, 14, 30, 0))
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(result, CanonicalInstant::Aware(expected));
}

#[test]
fn test_unknown_timezone_strict_fails() {
    let normalizer = DateNormalizer::strict();
    assert!(normalizer.is_strict());

    let result = normalizer.normalize("2025-03-08 14:30:00", Some("Mars/Olympus_Mons"));
    assert_eq!(
        result,
        Err(ParseError::UnknownTimezone("Mars/Olympus_Mons".to_string()))
    );

    // aware values never consult the hint, so they still succeed
    assert!(
        normalizer
            .normalize("2025-03-08T14:30:00Z", Some("Mars/Olympus_Mons"))
            .is_ok()
    );
}

#[test]
fn test_normalize_rejects_empty_and_malformed_text() {
    assert_eq!(normalize("", None), Err(ParseError::EmptyInput));
    assert_eq!(normalize("   \t", None), Err(ParseError::EmptyInput));
    assert!(matches!(
        normalize("not-a-date", None),
        Err(ParseError::MalformedFormat(_))
    ));
    assert!(matches!(
        normalize("2025-13-45", None),
        Err(ParseError::MalformedFormat(_))
    ));
    assert!(matches!(
        normalize("13/45/2025", None),
        Err(ParseError::MalformedFormat(_))
    ));
}

#[test]
fn test_normalize_epoch_seconds_and_millis() {
    let expected = utc(2025, 3, 11, 0, 0, 0);

    assert_eq!(normalize(1741651200_i64, None).unwrap(), expected);
    assert_eq!(normalize(1741651200000_i64, None).unwrap(), expected);

    // epoch values are absolute, hints do not shift them
    assert_eq!(normalize(1741651200_i64, Some("Asia/Tokyo")).unwrap(), expected);
}

#[test]
fn test_epoch_threshold_boundary() {
    let below = normalize_to_epoch_millis(99_999_999_999_i64, None).unwrap();
    let above = normalize_to_epoch_millis(100_000_000_001_i64, None).unwrap();

    // 11 nines are seconds, anything above 1e11 is milliseconds
    assert_eq!(below, 99_999_999_999 * 1000);
    assert_eq!(above, 100_000_000_001);
    assert_eq!(
        normalize(99_999_999_999_i64, None).unwrap(),
        utc(5138, 11, 16, 9, 46, 39)
    );

    // negative values use the magnitude
    assert_eq!(
        normalize_to_epoch_millis(-100_000_000_001_i64, None).unwrap(),
        -100_000_000_001
    );
    assert_eq!(normalize_to_epoch_millis(-1_i64, None).unwrap(), -1000);
}

#[test]
fn test_normalize_is_idempotent() {
    let aware = normalize("2025-03-08 14:30:00-05:00", None).unwrap();
    assert_eq!(normalize(aware, None).unwrap(), aware);
    assert_eq!(normalize(aware, Some("Europe/Berlin")).unwrap(), aware);

    let plain = normalize("2025-03-08 14:30:00", None).unwrap();
    assert_eq!(normalize(plain, None).unwrap(), plain);

    let localized = normalize("2025-03-08 14:30:00", Some("Europe/Berlin")).unwrap();
    assert_eq!(normalize(localized, Some("Europe/Berlin")).unwrap(), localized);
}

#[test]
fn test_normalize_typed_values() {
    let naive_value = naive(2025, 3, 8, 20, 0, 0);
    assert_eq!(
        normalize(naive_value, Some("UTC")).unwrap(),
        utc(2025, 3, 8, 20, 0, 0)
    );
    assert_eq!(
        normalize(naive_value, None).unwrap(),
        CanonicalInstant::Naive(naive_value)
    );

    let date = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
    assert_eq!(
        normalize(date, None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0))
    );

    let offset = DateTime::parse_from_rfc3339("2025-03-08T14:30:00+02:00").unwrap();
    assert_eq!(normalize(offset, None).unwrap(), utc(2025, 3, 8, 12, 30, 0));
}

#[test]
fn test_naive_and_aware_instants_are_incomparable() {
    let naive_instant = normalize("2025-03-08 14:30:00", None).unwrap();
    let aware_instant = normalize("2025-03-08 14:30:00", Some("UTC")).unwrap();

    assert!(!naive_instant.is_aware());
    assert!(aware_instant.is_aware());
    assert_eq!(naive_instant.partial_cmp(&aware_instant), None);
    assert!(!(naive_instant < aware_instant));
    assert!(!(naive_instant > aware_instant));
    assert_ne!(naive_instant, aware_instant);
}

#[test]
fn test_normalize_to_epoch_millis() {
    assert_eq!(
        normalize_to_epoch_millis("2025-03-08T00:00:00Z", None).unwrap(),
        1741392000000
    );
    assert_eq!(
        normalize_to_epoch_millis("2025-03-08", Some("UTC")).unwrap(),
        1741392000000
    );

    // naive values are read in local time
    let local_millis = Local
        .from_local_datetime(&naive(2025, 3, 8, 0, 0, 0))
        .earliest()
        .unwrap()
        .timestamp_millis();
    assert_eq!(
        normalize_to_epoch_millis("2025-03-08", None).unwrap(),
        local_millis
    );

    assert_eq!(
        normalize_to_epoch_millis("", None),
        Err(ParseError::EmptyInput)
    );
}

#[test]
fn test_date_input_from_json() {
    assert_eq!(
        DateInput::try_from(&json!("2025-03-08")).unwrap(),
        DateInput::Text("2025-03-08".to_string())
    );
    assert_eq!(
        DateInput::try_from(&json!(1741651200)).unwrap(),
        DateInput::Epoch(1741651200)
    );

    let fractional = DateInput::try_from(&json!(1741651200.5)).unwrap();
    assert_eq!(
        normalize_to_epoch_millis(fractional, None).unwrap(),
        1741651200500
    );

    assert_eq!(
        DateInput::try_from(&json!(null)),
        Err(ParseError::EmptyInput)
    );
    assert!(matches!(
        DateInput::try_from(&json!(true)),
        Err(ParseError::UnsupportedType(_))
    ));
    assert!(matches!(
        DateInput::try_from(&json!(["2025-03-08"])),
        Err(ParseError::UnsupportedType(_))
    ));
    assert!(matches!(
        DateInput::try_from(&json!({"date": "2025-03-08"})),
        Err(ParseError::UnsupportedType(_))
    ));
}

#[test]
fn test_canonical_instant_display() {
    assert_eq!(
        normalize("2025-03-08 14:30", None).unwrap().to_string(),
        "2025-03-08 14:30:00"
    );
    assert_eq!(
        normalize("2025-03-08T14:30:00Z", None).unwrap().to_string(),
        "2025-03-08T14:30:00+00:00"
    );
}

#[test]
fn test_normalize_twelve_hour_times() {
    assert_eq!(
        normalize("March 8 2025 2:30 PM", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 14, 30, 0))
    );
    assert_eq!(
        normalize("03/08/2025 02:30:15 am", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 2, 30, 15))
    );
    assert_eq!(
        normalize("2025-03-08 12:05 AM", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 5, 0))
    );
    assert_eq!(
        normalize("8 March 2025 9:00 PM", Some("UTC")).unwrap(),
        utc(2025, 3, 8, 21, 0, 0)
    );
}

#[test]
fn test_normalize_ignores_leading_weekday() {
    assert_eq!(
        normalize("Saturday, March 8, 2025", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0))
    );
    assert_eq!(
        normalize("Sat 8 March 2025 14:30", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 14, 30, 0))
    );
}

#[test]
fn test_normalize_utc_and_gmt_suffixes() {
    assert_eq!(
        normalize("2025-03-08 14:30:00 UTC", None).unwrap(),
        utc(2025, 3, 8, 14, 30, 0)
    );
    assert_eq!(
        normalize("March 8, 2025 9:30 AM GMT", None).unwrap(),
        utc(2025, 3, 8, 9, 30, 0)
    );

    // the suffix makes the value aware, so the hint is not applied
    assert_eq!(
        normalize("2025-03-08 14:30 utc", Some("US/Pacific")).unwrap(),
        utc(2025, 3, 8, 14, 30, 0)
    );
}

#[test]
fn test_normalize_basic_iso_format() {
    assert_eq!(
        normalize("20250308", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0))
    );
    assert_eq!(
        normalize("20250308T1430", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 14, 30, 0))
    );
    assert_eq!(
        normalize("20250308T143000", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 14, 30, 0))
    );
    assert_eq!(
        normalize("20250308T143000Z", None).unwrap(),
        utc(2025, 3, 8, 14, 30, 0)
    );
    assert!(matches!(
        normalize("20251308", None),
        Err(ParseError::MalformedFormat(_))
    ));
}

#[test]
fn test_normalize_hour_only_offsets() {
    assert_eq!(
        normalize("2025-03-08T14:30:00+05", None).unwrap(),
        utc(2025, 3, 8, 9, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08 14:30 -03", None).unwrap(),
        utc(2025, 3, 8, 17, 30, 0)
    );
    assert_eq!(
        normalize("2025-03-08T14:30:00.123+0530", None)
            .unwrap()
            .epoch_millis()
            .unwrap(),
        1741424400123
    );

    // a bare date keeps its day instead of being read as an offset
    assert_eq!(
        normalize("2025-03-08", None).unwrap(),
        CanonicalInstant::Naive(naive(2025, 3, 8, 0, 0, 0))
    );
}
