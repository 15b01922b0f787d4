//! Read-only summaries for existing billing records: what their end date
//! means in occurrence terms and when the next bill goes out.

use crate::calendar::next_dispatch_date;
use crate::occurrence::BillingCycleCalculator;
use billcycle_core::{CycleResult, OccurrenceKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A recurring charge on a lease, as stored by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: String,
    pub start_billing_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    pub key: OccurrenceKey,
    pub label: String,
    /// Set when the occurrence count hit the look-ahead limit.
    pub approximate: bool,
    pub upcoming_bill: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: String,
    #[serde(flatten)]
    pub summary: BillSummary,
}

impl BillingCycleCalculator {
    pub fn summarize_record(
        &self,
        start_billing_date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> CycleResult<BillSummary> {
        let classification =
            self.classify_end_date_detailed(start_billing_date, current_date, end_date)?;
        let upcoming_bill =
            next_dispatch_date(start_billing_date, start_billing_date.max(current_date))?;
        Ok(BillSummary {
            key: classification.key,
            label: classification.key.label(),
            approximate: classification.capped,
            upcoming_bill,
        })
    }

    /// Summarize many records against the same `current_date`. Fails on the
    /// first record whose dates leave the representable range.
    pub fn summarize_records<'a, I>(
        &self,
        records: I,
        current_date: DateTime<Utc>,
    ) -> CycleResult<Vec<RecordSummary>>
    where
        I: IntoIterator<Item = &'a BillingRecord>,
    {
        records
            .into_iter()
            .map(|record| {
                let summary = self.summarize_record(
                    record.start_billing_date,
                    current_date,
                    record.end_date,
                )?;
                debug!(id = %record.id, key = %summary.key, "Summarized billing record");
                Ok(RecordSummary {
                    id: record.id.clone(),
                    summary,
                })
            })
            .collect()
    }
}
