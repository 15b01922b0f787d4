//! Billing-cycle calendar for lease adjustments.
//!
//! Maps a lease's monthly billing cycle onto concrete invoice periods:
//! dispatch dates around a reference instant, "next N bills" windows, and
//! the inverse classification of an existing end date into the same
//! taxonomy. Everything is computed in UTC; callers convert site-local
//! times before calling in.

pub mod calendar;
pub mod occurrence;
pub mod options;
pub mod summary;

pub use calendar::{effective_anchor_day, next_dispatch_date, previous_dispatch_date};
pub use occurrence::{label_for, BillingCycleCalculator};
pub use summary::{BillSummary, BillingRecord, RecordSummary};
