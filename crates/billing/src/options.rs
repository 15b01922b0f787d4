//! Option lists for forms that let a user pick how many bills an adjustment
//! applies to.

use crate::occurrence::BillingCycleCalculator;
use billcycle_core::{CycleError, CycleResult, OccurrenceKey, OccurrenceOption};
use chrono::{DateTime, Utc};
use std::fmt::Write;

impl BillingCycleCalculator {
    /// `every_bill` followed by `next_1_bill ..= next_{count}_bill`.
    pub fn occurrence_options(
        &self,
        start_billing_date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        count: u32,
    ) -> CycleResult<Vec<OccurrenceOption>> {
        std::iter::once(None)
            .chain((1..=count).map(Some))
            .map(|n| self.generate_occurrence_window(start_billing_date, current_date, n))
            .collect()
    }
}

/// Hint listing the end dates of the bills a selected key covers, e.g.
/// `(Jan 31, 2020; Feb 29, 2020)`.
///
/// `every_bill` lists every bounded option and trails off with `; ...`.
/// `next_0_bill` covers no upcoming bill and has no hint. A format string
/// `chrono` cannot render is reported as [`CycleError::InvalidDateFormat`].
pub fn next_bills_hint(
    selected: OccurrenceKey,
    options: &[OccurrenceOption],
    date_format: &str,
) -> CycleResult<Option<String>> {
    let (take, trailer) = match selected {
        OccurrenceKey::EveryBill => (usize::MAX, "; ..."),
        OccurrenceKey::Next(0) => return Ok(None),
        OccurrenceKey::Next(n) => (usize::try_from(n).unwrap_or(usize::MAX), ""),
    };

    let dates = options
        .iter()
        .filter_map(|option| match option.key {
            OccurrenceKey::Next(n) if n > 0 => option.window.end_date,
            _ => None,
        })
        .take(take)
        .map(|end| {
            let mut rendered = String::new();
            write!(rendered, "{}", end.format(date_format))
                .map_err(|_| CycleError::InvalidDateFormat(date_format.to_string()))?;
            Ok(rendered)
        })
        .collect::<CycleResult<Vec<String>>>()?;

    if dates.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("({}{trailer})", dates.join("; "))))
}
