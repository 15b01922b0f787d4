use crate::error::{CycleError, CycleResult};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

/// Calculator configuration. Loaded from environment variables with the
/// prefix `BILLCYCLE__`, layered over an optional TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    /// Upper bound on billing periods scanned when classifying an end date.
    #[serde(default = "default_max_lookahead_periods")]
    pub max_lookahead_periods: u32,
    /// Number of bounded `next_N_bill` options offered next to `every_bill`.
    #[serde(default = "default_option_count")]
    pub option_count: u32,
    /// `chrono` format string used when rendering bill dates in hints.
    #[serde(default = "default_hint_date_format")]
    pub hint_date_format: String,
}

fn default_max_lookahead_periods() -> u32 {
    10
}
fn default_option_count() -> u32 {
    3
}
fn default_hint_date_format() -> String {
    "%b %d, %Y".to_string()
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_lookahead_periods: default_max_lookahead_periods(),
            option_count: default_option_count(),
            hint_date_format: default_hint_date_format(),
        }
    }
}

impl CycleConfig {
    /// Load configuration from an optional TOML file, then environment
    /// variables (`BILLCYCLE__MAX_LOOKAHEAD_PERIODS=12`).
    pub fn load(path: Option<&str>) -> CycleResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix("BILLCYCLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.validate()
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(source: &str) -> CycleResult<Self> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        loaded.validate()
    }

    fn validate(self) -> CycleResult<Self> {
        validate_date_format(&self.hint_date_format)?;
        Ok(self)
    }
}

/// Reject `chrono` format strings that would fail at render time.
pub fn validate_date_format(format: &str) -> CycleResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(CycleError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}
