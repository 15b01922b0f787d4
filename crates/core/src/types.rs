use crate::error::{CycleError, CycleResult};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// UTC midnight at the start of `date`.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Truncate an instant to the start of its UTC calendar day.
pub fn start_of_utc_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    utc_midnight(instant.date_naive())
}

/// Whether two instants fall on the same UTC calendar day.
pub fn same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Parse a caller-supplied instant. Accepts RFC 3339 (`2023-06-13T01:02:04.011Z`)
/// or a bare calendar date (`2019-12-01`), which is read as UTC midnight.
pub fn parse_utc_instant(input: &str) -> CycleResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(utc_midnight)
        .map_err(|_| CycleError::InvalidDate {
            input: input.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Anchor day
// ---------------------------------------------------------------------------

/// Day-of-month on which billing periods begin. Always within 1..=28 so that
/// every month has a dispatch date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorDay(u32);

impl AnchorDay {
    pub const MAX: u32 = 28;

    /// Derive the anchor from a lease's start billing date. Days past the 28th
    /// clamp to the 1st.
    pub fn from_start_billing_date(start_billing_date: DateTime<Utc>) -> Self {
        let day = start_billing_date.day();
        if day > Self::MAX {
            Self(1)
        } else {
            Self(day)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AnchorDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Occurrence keys
// ---------------------------------------------------------------------------

/// How many upcoming bills an adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OccurrenceKey {
    /// Unbounded: applies to every bill.
    EveryBill,
    /// Applies to the next `n` bills. `Next(0)` marks an end date in a closed,
    /// past period.
    Next(u32),
}

impl OccurrenceKey {
    /// Human-readable label shown next to the key.
    pub fn label(&self) -> String {
        match self {
            Self::EveryBill => "Every Bill".to_string(),
            Self::Next(0) => "Past Bill".to_string(),
            Self::Next(1) => "Next Bill".to_string(),
            Self::Next(n) => format!("Next {n} Bills"),
        }
    }

    /// Number of periods covered, or `None` when unbounded.
    pub fn period_count(&self) -> Option<u32> {
        match self {
            Self::EveryBill => None,
            Self::Next(n) => Some(*n),
        }
    }
}

impl fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EveryBill => f.write_str("every_bill"),
            Self::Next(n) => write!(f, "next_{n}_bill"),
        }
    }
}

impl FromStr for OccurrenceKey {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "every_bill" {
            return Ok(Self::EveryBill);
        }
        s.strip_prefix("next_")
            .and_then(|rest| rest.strip_suffix("_bill"))
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse::<u32>().ok())
            .map(Self::Next)
            .ok_or_else(|| CycleError::InvalidOccurrenceKey(s.to_string()))
    }
}

impl TryFrom<String> for OccurrenceKey {
    type Error = CycleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OccurrenceKey> for String {
    fn from(key: OccurrenceKey) -> Self {
        key.to_string()
    }
}

// ---------------------------------------------------------------------------
// Windows and options
// ---------------------------------------------------------------------------

/// A run of billing periods starting at `start_date`. `end_date == None`
/// means unbounded, in which case `period_count` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingWindow {
    pub period_count: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl BillingWindow {
    pub fn unbounded(start_date: DateTime<Utc>) -> Self {
        Self {
            period_count: 0,
            start_date,
            end_date: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.end_date.is_none()
    }
}

/// A selectable occurrence: key, display label and the window it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceOption {
    pub key: OccurrenceKey,
    pub display_value: String,
    pub window: BillingWindow,
}

impl OccurrenceOption {
    pub fn new(key: OccurrenceKey, window: BillingWindow) -> Self {
        Self {
            key,
            display_value: key.label(),
            window,
        }
    }
}

/// Result of classifying an end date. `capped` is set when the forward scan
/// hit the look-ahead limit, making the count a lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub key: OccurrenceKey,
    pub capped: bool,
}
