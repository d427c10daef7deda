//! Date normalization for lineup and listening-history data.
//!
//! Dates reach the application in many shapes: CLI arguments such as
//! `2025-03-08 20:00:00`, streaming-history exports with `endTime` values like
//! `2025-03-08 20:15`, API responses carrying RFC 3339 `played_at` stamps, and
//! raw epoch numbers. This module turns all of them into a single
//! [`CanonicalInstant`].
//!
//! # Naive and aware instants
//!
//! A value without any timezone information stays [`CanonicalInstant::Naive`]
//! unless a timezone hint is supplied. A value that carries an offset, or that
//! was localized through a hint, becomes [`CanonicalInstant::Aware`] and is
//! always stored in UTC. The two kinds are never comparable with each other:
//! `partial_cmp` returns `None`, so range checks cannot silently mix them.
//!
//! # Epoch values
//!
//! Integers whose magnitude exceeds [`MILLIS_THRESHOLD`] (1×10¹¹) are read as
//! milliseconds since the Unix epoch, everything else as seconds. Ten-digit
//! second values stay below the threshold until roughly the year 5138, while
//! current millisecond values have thirteen digits.
//!
//! # Timezone hints
//!
//! Hints are IANA names (`Europe/Berlin`, `US/Pacific`, `UTC`). The default
//! [`DateNormalizer`] is lenient: an unknown name prints a warning and the
//! system-local timezone is used instead. [`DateNormalizer::strict`] turns the
//! same situation into [`ParseError::UnknownTimezone`].

use std::{cmp::Ordering, fmt, sync::LazyLock};

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::warning;

/// Epoch magnitudes above this value are milliseconds, the rest are seconds.
pub const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Format used when flexible parsing gives up.
pub const STRICT_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    // 12-hour clock
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%B %d %Y %I:%M:%S %p",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %I:%M:%S %p",
    "%d %B %Y %I:%M %p",
];

// ISO dates without a time are left to the strict fallback.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%B %d %Y", "%d %B %Y"];

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex"));

static LEADING_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?\s+").expect("valid weekday regex")
});

// 20250308, 20250308T1430, 20250308T143000.5Z
static BASIC_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})(?:T(?P<hh>\d{2})(?P<mm>\d{2})(?P<ss>\d{2})?(?P<frac>\.\d+)?)?(?P<offset>[Zz]|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .expect("valid basic ISO regex")
});

// An offset only counts after a time of day, so `2025-03-08` keeps its `-08`.
static OFFSET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<body>.*\d:\d{2}(?::\d{2})?(?:\.\d+)?(?:\s*[ap]m)?)\s*(?P<offset>z|utc|gmt|[+-]\d{2}(?::?\d{2})?)$",
    )
    .expect("valid offset regex")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty date input")]
    EmptyInput,
    #[error("unsupported date input: {0}")]
    UnsupportedType(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("could not parse date: {0}")]
    MalformedFormat(String),
}

/// A resolved point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalInstant {
    /// Wall-clock time without timezone information.
    Naive(NaiveDateTime),
    /// Absolute time, stored in UTC.
    Aware(DateTime<Utc>),
}

impl CanonicalInstant {
    pub fn is_aware(&self) -> bool {
        matches!(self, CanonicalInstant::Aware(_))
    }

    /// Resolves the instant to UTC.
    ///
    /// Naive instants are interpreted in the system-local timezone. Returns
    /// `None` when that local time does not exist (DST gap).
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            CanonicalInstant::Aware(dt) => Some(*dt),
            CanonicalInstant::Naive(naive) => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Milliseconds since the Unix epoch, rounded toward negative infinity.
    pub fn epoch_millis(&self) -> Result<i64, ParseError> {
        self.to_utc()
            .map(|dt| dt.timestamp_millis())
            .ok_or_else(|| ParseError::MalformedFormat(format!("{} has no local equivalent", self)))
    }
}

impl PartialOrd for CanonicalInstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (CanonicalInstant::Naive(a), CanonicalInstant::Naive(b)) => Some(a.cmp(b)),
            (CanonicalInstant::Aware(a), CanonicalInstant::Aware(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalInstant::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%d %H:%M:%S")),
            CanonicalInstant::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// A date-like value before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Text(String),
    /// Seconds or milliseconds since the epoch, see [`MILLIS_THRESHOLD`].
    Epoch(i64),
    Instant(CanonicalInstant),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<&String> for DateInput {
    fn from(value: &String) -> Self {
        DateInput::Text(value.clone())
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Epoch(value)
    }
}

impl From<CanonicalInstant> for DateInput {
    fn from(value: CanonicalInstant) -> Self {
        DateInput::Instant(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::Instant(CanonicalInstant::Naive(value))
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Instant(CanonicalInstant::Naive(value.and_time(NaiveTime::MIN)))
    }
}

impl<T: TimeZone> From<DateTime<T>> for DateInput {
    fn from(value: DateTime<T>) -> Self {
        DateInput::Instant(CanonicalInstant::Aware(value.with_timezone(&Utc)))
    }
}

impl TryFrom<&Value> for DateInput {
    type Error = ParseError;

    /// Maps JSON fields onto date inputs.
    ///
    /// Strings become text and integers epoch values. Floats are treated as
    /// epoch values with a fractional part and keep millisecond precision.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(DateInput::Text(text.clone())),
            Value::Null => Err(ParseError::EmptyInput),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(DateInput::Epoch(int));
                }
                let float = number
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| ParseError::UnsupportedType(format!("number {}", number)))?;
                let millis = if float.abs() > MILLIS_THRESHOLD as f64 {
                    float.floor()
                } else {
                    (float * 1000.0).floor()
                };
                DateTime::from_timestamp_millis(millis as i64)
                    .map(|dt| DateInput::Instant(CanonicalInstant::Aware(dt)))
                    .ok_or_else(|| ParseError::MalformedFormat(format!("epoch {} out of range", number)))
            }
            Value::Bool(_) => Err(ParseError::UnsupportedType("boolean".to_string())),
            Value::Array(_) => Err(ParseError::UnsupportedType("array".to_string())),
            Value::Object(_) => Err(ParseError::UnsupportedType("object".to_string())),
        }
    }
}

/// Converts date inputs into canonical instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateNormalizer {
    strict_timezones: bool,
}

impl DateNormalizer {
    /// Unknown timezone hints fall back to the system-local timezone.
    pub const fn lenient() -> Self {
        Self {
            strict_timezones: false,
        }
    }

    /// Unknown timezone hints fail with [`ParseError::UnknownTimezone`].
    pub const fn strict() -> Self {
        Self {
            strict_timezones: true,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict_timezones
    }

    /// Normalizes a date-like value.
    ///
    /// # Rules
    ///
    /// - Aware instants are returned unchanged.
    /// - Naive instants and naive parse results are localized with
    ///   `timezone_hint` when one is given, otherwise returned naive.
    /// - Epoch values always produce an aware UTC instant.
    /// - Text is parsed flexibly first, then with [`STRICT_FORMAT`]. The
    ///   flexible pass takes RFC 3339, ISO 8601 in extended or basic form,
    ///   `YYYY/MM/DD`, `MM/DD/YYYY` and month names, with an optional 24- or
    ///   12-hour time. A leading weekday is ignored. A time may be followed by
    ///   `Z`, `UTC`, `GMT` or an offset such as `+05`, `+0530` or `-05:00`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::EmptyInput`] for empty or whitespace-only text
    /// - [`ParseError::MalformedFormat`] for text no format accepts, epoch
    ///   values outside chrono's range and local times skipped by a DST change
    /// - [`ParseError::UnknownTimezone`] for unknown hints in strict mode
    ///
    /// # Example
    ///
    /// ```
    /// use lineupcli::dates::DateNormalizer;
    ///
    /// let normalizer = DateNormalizer::lenient();
    /// let instant = normalizer.normalize("2025-03-08 14:30:00-05:00", None).unwrap();
    /// assert!(instant.is_aware());
    /// ```
    pub fn normalize(
        &self,
        input: impl Into<DateInput>,
        timezone_hint: Option<&str>,
    ) -> Result<CanonicalInstant, ParseError> {
        let naive = match input.into() {
            DateInput::Instant(CanonicalInstant::Aware(dt)) => {
                return Ok(CanonicalInstant::Aware(dt));
            }
            DateInput::Instant(CanonicalInstant::Naive(naive)) => naive,
            DateInput::Epoch(value) => return from_epoch(value).map(CanonicalInstant::Aware),
            DateInput::Text(text) => match parse_text(&text)? {
                CanonicalInstant::Aware(dt) => return Ok(CanonicalInstant::Aware(dt)),
                CanonicalInstant::Naive(naive) => naive,
            },
        };

        match timezone_hint.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => self.localize(naive, name).map(CanonicalInstant::Aware),
            None => Ok(CanonicalInstant::Naive(naive)),
        }
    }

    /// Normalizes a value and returns milliseconds since the Unix epoch.
    ///
    /// Naive results are interpreted in the system-local timezone.
    pub fn normalize_to_epoch_millis(
        &self,
        input: impl Into<DateInput>,
        timezone_hint: Option<&str>,
    ) -> Result<i64, ParseError> {
        self.normalize(input, timezone_hint)?.epoch_millis()
    }

    fn localize(&self, naive: NaiveDateTime, name: &str) -> Result<DateTime<Utc>, ParseError> {
        match name.parse::<Tz>() {
            Ok(tz) => resolve_local(tz.from_local_datetime(&naive), &naive, name),
            Err(_) if self.strict_timezones => Err(ParseError::UnknownTimezone(name.to_string())),
            Err(_) => {
                warning!("Unknown timezone: {}. Using local timezone instead.", name);
                resolve_local(Local.from_local_datetime(&naive), &naive, "local")
            }
        }
    }
}

/// Normalizes with the lenient [`DateNormalizer`].
pub fn normalize(
    input: impl Into<DateInput>,
    timezone_hint: Option<&str>,
) -> Result<CanonicalInstant, ParseError> {
    DateNormalizer::lenient().normalize(input, timezone_hint)
}

/// Epoch milliseconds with the lenient [`DateNormalizer`].
pub fn normalize_to_epoch_millis(
    input: impl Into<DateInput>,
    timezone_hint: Option<&str>,
) -> Result<i64, ParseError> {
    DateNormalizer::lenient().normalize_to_epoch_millis(input, timezone_hint)
}

fn resolve_local<T: TimeZone>(
    local: LocalResult<DateTime<T>>,
    naive: &NaiveDateTime,
    zone: &str,
) -> Result<DateTime<Utc>, ParseError> {
    // ambiguous wall-clock times pick the earlier instant
    local
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ParseError::MalformedFormat(format!("{} does not exist in {}", naive, zone)))
}

fn from_epoch(value: i64) -> Result<DateTime<Utc>, ParseError> {
    let parsed = if value.unsigned_abs() > MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    };
    parsed.ok_or_else(|| ParseError::MalformedFormat(format!("epoch {} out of range", value)))
}

fn parse_text(text: &str) -> Result<CanonicalInstant, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    if let Some(instant) = parse_flexible(trimmed) {
        return Ok(instant);
    }

    NaiveDate::parse_from_str(trimmed, STRICT_FORMAT)
        .map(|date| CanonicalInstant::Naive(date.and_time(NaiveTime::MIN)))
        .map_err(|_| ParseError::MalformedFormat(trimmed.to_string()))
}

fn parse_flexible(input: &str) -> Option<CanonicalInstant> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(CanonicalInstant::Aware(dt.with_timezone(&Utc)));
    }

    let cleaned = expand_basic_iso(&clean(input));

    if let Some(caps) = OFFSET_SUFFIX.captures(&cleaned) {
        let offset = parse_offset(&caps["offset"])?;
        let naive = parse_naive(&caps["body"])?;
        return offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| CanonicalInstant::Aware(dt.with_timezone(&Utc)));
    }

    parse_naive(&cleaned).map(CanonicalInstant::Naive)
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

// `Z`, `UTC`, `GMT`, `+05`, `+0530`, `-05:00`
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if ["z", "utc", "gmt"].iter().any(|name| raw.eq_ignore_ascii_case(name)) {
        return FixedOffset::east_opt(0);
    }

    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..) {
        Some(rest) if !rest.is_empty() => rest.parse().ok()?,
        _ => 0,
    };
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// "20250308T143000Z" -> "2025-03-08 14:30:00Z"
fn expand_basic_iso(input: &str) -> String {
    let Some(caps) = BASIC_ISO.captures(input) else {
        return input.to_string();
    };

    let mut expanded = format!("{}-{}-{}", &caps["y"], &caps["m"], &caps["d"]);
    if let (Some(hh), Some(mm)) = (caps.name("hh"), caps.name("mm")) {
        expanded.push_str(&format!(" {}:{}", hh.as_str(), mm.as_str()));
        if let Some(ss) = caps.name("ss") {
            expanded.push_str(&format!(":{}", ss.as_str()));
        }
        if let Some(frac) = caps.name("frac") {
            expanded.push_str(frac.as_str());
        }
    }
    if let Some(offset) = caps.name("offset") {
        expanded.push_str(offset.as_str());
    }
    expanded
}

// "Saturday, March 8th, 2025" -> "March 8 2025"
fn clean(input: &str) -> String {
    let without_ordinals = ORDINAL_SUFFIX.replace_all(input, "$1");
    let collapsed = without_ordinals
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    LEADING_WEEKDAY.replace(&collapsed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_ordinals_and_commas() {
        assert_eq!(clean("March 8th,  2025"), "March 8 2025");
        assert_eq!(clean("1st May 2024"), "1 May 2024");
        assert_eq!(clean("2025-03-08T14:30:00"), "2025-03-08T14:30:00");
        assert_eq!(clean("Saturday, March 8, 2025"), "March 8 2025");
        assert_eq!(clean("Sat. 8 March 2025"), "8 March 2025");
        // month names that start like a weekday are kept
        assert_eq!(clean("March 8 2025"), "March 8 2025");
    }

    #[test]
    fn basic_iso_is_expanded() {
        assert_eq!(expand_basic_iso("20250308"), "2025-03-08");
        assert_eq!(expand_basic_iso("20250308T1430"), "2025-03-08 14:30");
        assert_eq!(expand_basic_iso("20250308T143000Z"), "2025-03-08 14:30:00Z");
        assert_eq!(expand_basic_iso("1741651200"), "1741651200");
    }

    #[test]
    fn offsets_are_parsed() {
        assert_eq!(parse_offset("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("+05"), FixedOffset::east_opt(5 * 3600));
        assert_eq!(parse_offset("-0330"), FixedOffset::east_opt(-(3 * 3600 + 30 * 60)));
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(5 * 3600 + 30 * 60));
        assert_eq!(parse_offset("+0575"), None);
    }

    #[test]
    fn threshold_boundary_is_seconds() {
        let at_threshold = from_epoch(MILLIS_THRESHOLD).unwrap();
        assert_eq!(at_threshold.timestamp(), MILLIS_THRESHOLD);

        let above = from_epoch(MILLIS_THRESHOLD + 1).unwrap();
        assert_eq!(above.timestamp_millis(), MILLIS_THRESHOLD + 1);
    }
}
