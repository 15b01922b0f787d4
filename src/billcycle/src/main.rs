//! billcycle: billing-cycle calendar CLI.
//!
//! Computes dispatch dates, "next N bills" windows and end-date
//! classifications for a lease's monthly billing cycle.

use billcycle_billing::options::next_bills_hint;
use billcycle_billing::{
    effective_anchor_day, label_for, next_dispatch_date, previous_dispatch_date,
    BillingCycleCalculator, BillingRecord,
};
use billcycle_core::types::parse_utc_instant;
use billcycle_core::{CycleConfig, OccurrenceKey, OccurrenceOption};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "billcycle")]
#[command(about = "Billing-cycle calendar for lease adjustments")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (overridden by BILLCYCLE__* variables)
    #[arg(long, env = "BILLCYCLE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the effective anchor day for a start billing date
    Anchor {
        /// Start billing date (RFC 3339 or YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
    },

    /// Earliest dispatch date at or after a reference instant
    NextDispatch {
        #[arg(short, long)]
        start: String,

        /// Reference instant (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Start of the billing period containing a reference instant
    PreviousDispatch {
        #[arg(short, long)]
        start: String,

        /// Reference instant (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Window covering the next N bills (unbounded when --count is omitted)
    Window {
        #[arg(short, long)]
        start: String,

        /// Current instant (default: now)
        #[arg(long)]
        now: Option<String>,

        #[arg(short, long)]
        count: Option<u32>,
    },

    /// Classify an end date as every_bill / next_N_bill
    Classify {
        #[arg(short, long)]
        start: String,

        /// Current instant (default: now)
        #[arg(long)]
        now: Option<String>,

        /// End date of the record (omit for open-ended)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Display label for an occurrence key
    Label {
        /// Key such as every_bill or next_3_bill
        key: String,
    },

    /// Occurrence options a form would offer
    Options {
        #[arg(short, long)]
        start: String,

        /// Current instant (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Bounded options to offer (overrides config)
        #[arg(short, long)]
        count: Option<u32>,

        /// Selected key to build an upcoming-bills hint for
        #[arg(long)]
        selected: Option<String>,
    },

    /// Summarize a JSON array of billing records
    Summarize {
        /// Path to the records file
        #[arg(short, long)]
        input: String,

        /// Current instant (default: now)
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Serialize)]
struct OptionsOutput {
    options: Vec<OccurrenceOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

fn instant_or_now(input: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    Ok(input
        .map(parse_utc_instant)
        .transpose()?
        .unwrap_or_else(Utc::now))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billcycle=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = CycleConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        CycleConfig::default()
    });
    info!(
        max_lookahead_periods = config.max_lookahead_periods,
        option_count = config.option_count,
        "Configuration loaded"
    );

    let calc = BillingCycleCalculator::new(&config);

    match cli.command {
        Commands::Anchor { start } => {
            println!("{}", effective_anchor_day(parse_utc_instant(&start)?));
        }
        Commands::NextDispatch { start, at } => {
            let dispatch =
                next_dispatch_date(parse_utc_instant(&start)?, instant_or_now(at.as_deref())?)?;
            println!("{}", dispatch.to_rfc3339());
        }
        Commands::PreviousDispatch { start, at } => {
            let dispatch =
                previous_dispatch_date(parse_utc_instant(&start)?, instant_or_now(at.as_deref())?)?;
            println!("{}", dispatch.to_rfc3339());
        }
        Commands::Window { start, now, count } => {
            let option = calc.generate_occurrence_window(
                parse_utc_instant(&start)?,
                instant_or_now(now.as_deref())?,
                count,
            )?;
            print_json(&option)?;
        }
        Commands::Classify { start, now, end } => {
            let end = end.as_deref().map(parse_utc_instant).transpose()?;
            let classification = calc.classify_end_date_detailed(
                parse_utc_instant(&start)?,
                instant_or_now(now.as_deref())?,
                end,
            )?;
            if classification.capped {
                println!("{} (approximate)", classification.key);
            } else {
                println!("{}", classification.key);
            }
        }
        Commands::Label { key } => {
            println!("{}", label_for(&key)?);
        }
        Commands::Options {
            start,
            now,
            count,
            selected,
        } => {
            let options = calc.occurrence_options(
                parse_utc_instant(&start)?,
                instant_or_now(now.as_deref())?,
                count.unwrap_or(config.option_count),
            )?;
            let hint = match selected {
                Some(key) => next_bills_hint(
                    key.parse::<OccurrenceKey>()?,
                    &options,
                    &config.hint_date_format,
                )?,
                None => None,
            };
            print_json(&OptionsOutput { options, hint })?;
        }
        Commands::Summarize { input, now } => {
            let raw = std::fs::read_to_string(&input)?;
            let records: Vec<BillingRecord> = serde_json::from_str(&raw)?;
            let summaries = calc.summarize_records(&records, instant_or_now(now.as_deref())?)?;
            info!(records = summaries.len(), "Summarized billing records");
            print_json(&summaries)?;
        }
    }

    Ok(())
}
