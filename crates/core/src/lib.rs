pub mod config;
pub mod error;
pub mod types;

pub use config::CycleConfig;
pub use error::{CycleError, CycleResult};
pub use types::{AnchorDay, BillingWindow, Classification, OccurrenceKey, OccurrenceOption};
