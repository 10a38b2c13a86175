//! Lenient deserializers for values that arrive from HTML forms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a timestamp in RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (treated as UTC) or
/// `YYYY-MM-DD` (midnight UTC) form.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Optional timestamp; `null` and `""` both mean "not supplied".
pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: '{}'", s))),
    }
}

/// Tri-state timestamp for clearable fields.
///
/// Field absent → `None` (requires `#[serde(default)]`); `null` or `""` →
/// `Some(None)` (clear); a parseable date → `Some(Some(dt))`.
pub fn nullable_datetime<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_datetime(deserializer).map(Some)
}

/// Tri-state text for clearable fields; `null` and `""` both clear.
pub fn nullable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Some)
}

/// Optional text; `""` means "not supplied".
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Optional value parsed from text, as query strings carry it; `""` means
/// "not supplied".
pub fn optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Tri-state integer used for nullable numeric profile fields.
///
/// Field absent → `None` (leave unchanged, requires `#[serde(default)]`);
/// `null` or `""` → `Some(None)` (clear); number or numeric text → `Some(Some(n))`.
pub fn nullable_int<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(Some(None)),
        Some(NumberOrText::Number(n)) => i32::try_from(n)
            .map(|n| Some(Some(n)))
            .map_err(|_| serde::de::Error::custom("number out of range")),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(Some(None)),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(|n| Some(Some(n)))
            .map_err(|_| serde::de::Error::custom(format!("invalid number: '{}'", s))),
    }
}
