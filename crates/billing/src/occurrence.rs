//! Occurrence windows: turning "next N bills" into concrete date ranges, and
//! recognising which "next N bills" bucket an existing end date belongs to.

use crate::calendar::{day_after, day_before, next_dispatch_date, previous_dispatch_date};
use billcycle_core::types::{same_utc_day, start_of_utc_day};
use billcycle_core::{
    BillingWindow, Classification, CycleConfig, CycleResult, OccurrenceKey, OccurrenceOption,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Stateless calculator over a lease's monthly billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingCycleCalculator {
    max_lookahead_periods: u32,
}

impl Default for BillingCycleCalculator {
    fn default() -> Self {
        Self::new(&CycleConfig::default())
    }
}

impl BillingCycleCalculator {
    pub fn new(config: &CycleConfig) -> Self {
        debug!(
            max_lookahead_periods = config.max_lookahead_periods,
            "BillingCycleCalculator initialized"
        );
        Self {
            max_lookahead_periods: config.max_lookahead_periods,
        }
    }

    pub fn max_lookahead_periods(&self) -> u32 {
        self.max_lookahead_periods
    }

    /// Build the window covering the next `occurrence_count` bills.
    ///
    /// The window starts at the later of the billing start and `current_date`
    /// (a lease may start in the future). Without a count, or with a count of
    /// zero, the window is unbounded and keyed `every_bill`. Otherwise the
    /// window ends the day before the dispatch date that follows the last
    /// covered period.
    pub fn generate_occurrence_window(
        &self,
        start_billing_date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        occurrence_count: Option<u32>,
    ) -> CycleResult<OccurrenceOption> {
        let effective_start = start_billing_date.max(current_date);

        let count = match occurrence_count {
            Some(count) if count > 0 => count,
            _ => {
                return Ok(OccurrenceOption::new(
                    OccurrenceKey::EveryBill,
                    BillingWindow::unbounded(effective_start),
                ))
            }
        };

        let mut dispatch = effective_start;
        for _ in 0..count {
            dispatch = next_dispatch_date(start_billing_date, day_after(dispatch)?)?;
        }
        let end_date = day_before(start_of_utc_day(dispatch))?;

        Ok(OccurrenceOption::new(
            OccurrenceKey::Next(count),
            BillingWindow {
                period_count: count,
                start_date: effective_start,
                end_date: Some(end_date),
            },
        ))
    }

    /// Classify an existing end date into the occurrence taxonomy.
    pub fn classify_end_date(
        &self,
        start_billing_date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> CycleResult<OccurrenceKey> {
        self.classify_end_date_detailed(start_billing_date, current_date, end_date)
            .map(|classification| classification.key)
    }

    /// Like [`classify_end_date`](Self::classify_end_date), but also reports
    /// whether the forward scan was cut short by the look-ahead limit.
    ///
    /// An end date inside the current billing period is always `next_1_bill`,
    /// even when it is already behind `current_date`. An end date in an
    /// earlier, closed period is `next_0_bill`.
    pub fn classify_end_date_detailed(
        &self,
        start_billing_date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> CycleResult<Classification> {
        let Some(end_date) = end_date else {
            return Ok(Classification {
                key: OccurrenceKey::EveryBill,
                capped: false,
            });
        };

        let adjusted_now = start_billing_date.max(current_date);
        let mut upper = next_dispatch_date(start_billing_date, adjusted_now)?;
        let lower = previous_dispatch_date(start_billing_date, adjusted_now)?;
        let current_period_last_day = day_before(upper)?;
        let in_current_period =
            |instant: DateTime<Utc>| lower <= instant && instant <= current_period_last_day;

        if in_current_period(end_date) || same_utc_day(end_date, upper) {
            return Ok(Classification {
                key: OccurrenceKey::Next(1),
                capped: false,
            });
        }
        if end_date < upper {
            return Ok(Classification {
                key: OccurrenceKey::Next(0),
                capped: false,
            });
        }

        let mut period_count = u32::from(in_current_period(adjusted_now));
        let mut capped = false;
        while upper < end_date {
            upper = next_dispatch_date(start_billing_date, day_after(upper)?)?;
            period_count += 1;
            if period_count > self.max_lookahead_periods {
                capped = true;
                warn!(
                    %start_billing_date,
                    %end_date,
                    period_count,
                    "Look-ahead limit reached, occurrence count is approximate"
                );
                break;
            }
        }

        Ok(Classification {
            key: OccurrenceKey::Next(period_count),
            capped,
        })
    }
}

/// Display label for a serialized occurrence key, e.g. `next_3_bill` ->
/// `Next 3 Bills`.
pub fn label_for(key: &str) -> CycleResult<String> {
    key.parse::<OccurrenceKey>().map(|key| key.label())
}
