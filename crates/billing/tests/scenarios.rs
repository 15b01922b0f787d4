//! Literal billing scenarios exercised through the public API.

use billcycle_billing::options::next_bills_hint;
use billcycle_billing::{label_for, next_dispatch_date, BillingCycleCalculator};
use billcycle_core::types::parse_utc_instant;
use billcycle_core::{CycleConfig, OccurrenceKey};
use chrono::{DateTime, Utc};

fn at(s: &str) -> DateTime<Utc> {
    parse_utc_instant(s).unwrap()
}

#[test]
fn test_dispatch_scenarios() {
    assert_eq!(
        next_dispatch_date(at("2019-12-01"), at("2019-12-02")).unwrap(),
        at("2020-01-01T00:00:00.000Z")
    );
    assert_eq!(
        next_dispatch_date(at("2019-12-15"), at("2020-01-02")).unwrap(),
        at("2020-01-15T00:00:00.000Z")
    );
}

#[test]
fn test_classification_scenarios() {
    let calc = BillingCycleCalculator::default();
    let cases = [
        ("2019-12-01", "2020-01-01", None, "every_bill"),
        ("2019-11-01", "2019-12-15", Some("2020-04-01"), "next_4_bill"),
        ("2019-11-01", "2020-01-03", Some("2019-12-03"), "next_0_bill"),
    ];
    for (start, now, end, expected) in cases {
        let key = calc
            .classify_end_date(at(start), at(now), end.map(at))
            .unwrap();
        assert_eq!(key.to_string(), expected, "{start} {now} {end:?}");
    }
}

#[test]
fn test_generation_scenario() {
    let option = BillingCycleCalculator::default()
        .generate_occurrence_window(at("2019-12-01T00:00:00Z"), at("2020-01-01T00:00:00Z"), Some(2))
        .unwrap();
    assert_eq!(option.key.to_string(), "next_2_bill");
    assert_eq!(option.window.start_date, at("2020-01-01T00:00:00.000Z"));
    assert_eq!(option.window.end_date, Some(at("2020-02-29T00:00:00.000Z")));
}

#[test]
fn test_label_scenarios() {
    assert_eq!(label_for("next_3_bill").unwrap(), "Next 3 Bills");
    assert_eq!(label_for("next_0_bill").unwrap(), "Past Bill");
}

#[test]
fn test_form_flow_with_configured_option_count() {
    let config = CycleConfig::from_toml_str("option_count = 2\nhint_date_format = \"%d/%m/%Y\"")
        .unwrap();
    let calc = BillingCycleCalculator::new(&config);
    let start = at("2023-02-24T00:00:00.000Z");
    let now = at("2023-06-13T19:52:27.131Z");

    let options = calc.occurrence_options(start, now, config.option_count).unwrap();
    assert_eq!(options.len(), 3);

    // An existing record ending 07-23 maps back onto the "Next 2 Bills" option.
    let selected = calc
        .classify_end_date(start, now, Some(at("2023-07-23")))
        .unwrap();
    assert_eq!(selected, OccurrenceKey::Next(2));
    let chosen = options.iter().find(|o| o.key == selected).unwrap();
    assert_eq!(chosen.display_value, "Next 2 Bills");

    let hint = next_bills_hint(selected, &options, &config.hint_date_format).unwrap();
    assert_eq!(hint.as_deref(), Some("(23/06/2023; 23/07/2023)"));
}
