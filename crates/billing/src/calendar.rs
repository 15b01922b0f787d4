//! Dispatch-date arithmetic: where billing periods begin and end relative to
//! a reference instant.
//!
//! A dispatch date is UTC midnight on the anchor day of some month. Every
//! helper here builds a fresh value; nothing is adjusted in place.

use billcycle_core::types::{utc_midnight, AnchorDay};
use billcycle_core::{CycleError, CycleResult};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

/// Anchor day for a lease, clamped into 1..=28.
pub fn effective_anchor_day(start_billing_date: DateTime<Utc>) -> AnchorDay {
    AnchorDay::from_start_billing_date(start_billing_date)
}

/// Earliest dispatch date at or after `reference`.
///
/// A reference sitting exactly on a dispatch boundary returns that boundary.
/// Any later time on the dispatch day already counts as past it.
pub fn next_dispatch_date(
    start_billing_date: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> CycleResult<DateTime<Utc>> {
    let anchor = effective_anchor_day(start_billing_date);
    let candidate = dispatch_in_month(reference.date_naive(), anchor)?;
    if candidate < reference {
        return shift_months(candidate, 1);
    }
    Ok(candidate)
}

/// Start of the billing period containing `reference`: the latest dispatch
/// date before it. A dispatch on the same UTC day as `reference` is treated
/// as not yet reached.
pub fn previous_dispatch_date(
    start_billing_date: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> CycleResult<DateTime<Utc>> {
    let anchor = effective_anchor_day(start_billing_date);
    let candidate = dispatch_in_month(reference.date_naive(), anchor)?;
    if candidate > reference || candidate.date_naive() == reference.date_naive() {
        return shift_months(candidate, -1);
    }
    Ok(candidate)
}

/// `instant` moved forward by one calendar day.
pub(crate) fn day_after(instant: DateTime<Utc>) -> CycleResult<DateTime<Utc>> {
    instant
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| CycleError::OutOfRange(format!("one day after {instant}")))
}

/// `instant` moved back by one calendar day.
pub(crate) fn day_before(instant: DateTime<Utc>) -> CycleResult<DateTime<Utc>> {
    instant
        .checked_sub_signed(Duration::days(1))
        .ok_or_else(|| CycleError::OutOfRange(format!("one day before {instant}")))
}

fn dispatch_in_month(day: NaiveDate, anchor: AnchorDay) -> CycleResult<DateTime<Utc>> {
    day.with_day(anchor.get())
        .map(utc_midnight)
        .ok_or_else(|| CycleError::OutOfRange(format!("day {anchor} in month of {day}")))
}

fn shift_months(dispatch: DateTime<Utc>, delta: i32) -> CycleResult<DateTime<Utc>> {
    let date = dispatch.date_naive();
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted
        .map(utc_midnight)
        .ok_or_else(|| CycleError::OutOfRange(format!("{delta} month(s) from {date}")))
}
