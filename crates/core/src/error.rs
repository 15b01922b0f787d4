use thiserror::Error;

pub type CycleResult<T> = Result<T, CycleError>;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid date `{input}`: expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Invalid date format `{0}`")]
    InvalidDateFormat(String),

    #[error("Invalid occurrence key `{0}`: expected every_bill or next_<n>_bill")]
    InvalidOccurrenceKey(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
