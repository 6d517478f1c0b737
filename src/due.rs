//! Due dates.
//!
//! A task either has no due date (persisted as the `N/A` sentinel) or a
//! calendar date persisted as `MM/DD/YYYY`. Input also accepts `MM-DD-YYYY`.
//! Strings that fail to parse when a file is loaded are kept verbatim so the
//! classifier can report them instead of the load failing.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Persisted form of "no due date"
pub const NO_DATE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DueDate {
    #[default]
    None,
    On(NaiveDate),
    /// Loaded from disk but not a valid `MM/DD/YYYY` date.
    Unparsed(String),
}

impl DueDate {
    /// Parse user input. Blank and `N/A` mean no date; anything else must be
    /// a real calendar date.
    pub fn parse(input: &str) -> Result<Self> {
        match Self::from_stored(input) {
            DueDate::Unparsed(raw) => Err(Error::InvalidInput(format!(
                "invalid due date '{raw}' (expected MM/DD/YYYY or MM-DD-YYYY)"
            ))),
            due => Ok(due),
        }
    }

    /// Interpret a persisted value. Never fails.
    pub fn from_stored(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_DATE) {
            return DueDate::None;
        }
        match parse_calendar_date(trimmed) {
            Some(date) => DueDate::On(date),
            None => DueDate::Unparsed(raw.to_string()),
        }
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::None => f.write_str(NO_DATE),
            DueDate::On(date) => write!(
                f,
                "{:02}/{:02}/{:04}",
                date.month(),
                date.day(),
                date.year()
            ),
            DueDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DueDate::from_stored(&raw))
    }
}

/// Parse `M/D/YYYY` with either `/` or `-` separators.
///
/// Month and day take one or two digits, the year exactly four. Impossible
/// dates (month 13, February 30) are rejected.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.split(['/', '-']);
    let month = parts.next()?;
    let day = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if !is_digits(month, 1, 2) || !is_digits(day, 1, 2) || !is_digits(year, 4, 4) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
