#![forbid(unsafe_code)]
use chrono::{Datelike, NaiveDate, Weekday};
use shiftguard::engine::{capacity_report, capacity_warning, DemandPlan};
use shiftguard::{Month, NoHolidays, Roster, RunConfig, Severity, StaffRecord, WarningCode};

fn config(extra: u32) -> RunConfig {
    let mut config = RunConfig::new(Month::new(2026, 2).unwrap(), 3, 2);
    config.variable_extra_slots_month = extra;
    config
}

fn weekend_dates(config: &RunConfig) -> Vec<NaiveDate> {
    config
        .month
        .dates()
        .into_iter()
        .filter(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

#[test]
fn every_weekend_date_served_before_any_weekday() {
    // February 2026 has 8 weekend dates; 10 extra slots cover each of them
    // once, then start a second weekend cycle. Weekdays get nothing.
    let config = config(10);
    let plan = DemandPlan::build(&config, &NoHolidays);
    let weekend = weekend_dates(&config);

    for d in &weekend {
        assert!(plan.extra_for(*d) >= 1, "weekend date {d} got no slot");
    }
    for d in config.month.dates() {
        if !weekend.contains(&d) {
            assert_eq!(plan.extra_for(d), 0, "weekday {d} served too early");
        }
    }
    assert_eq!(plan.total_extra(), 10);
}

#[test]
fn spillover_reaches_weekdays_after_two_weekend_cycles() {
    let config = config(20);
    let plan = DemandPlan::build(&config, &NoHolidays);
    let weekend = weekend_dates(&config);

    let weekend_total: u32 = weekend.iter().map(|d| plan.extra_for(*d)).sum();
    let weekday_total: u32 = config
        .month
        .dates()
        .iter()
        .filter(|d| !weekend.contains(d))
        .map(|d| plan.extra_for(*d))
        .sum();

    assert_eq!(weekend_total + weekday_total, 20);
    // two full weekend cycles (16 slots) happen before weekdays see any
    assert!(weekend_total >= 16);
    assert!(weekday_total > 0);
}

#[test]
fn large_extra_count_still_terminates_and_sums() {
    let config = config(10_000);
    let plan = DemandPlan::build(&config, &NoHolidays);
    assert_eq!(plan.total_extra(), 10_000);
}

#[test]
fn zero_extra_means_flat_demand() {
    let config = config(0);
    let plan = DemandPlan::build(&config, &NoHolidays);
    assert!(config.month.dates().iter().all(|d| plan.extra_for(*d) == 0));
}

#[test]
fn capacity_warning_red_when_supply_below_base() {
    // base demand = (3 + 2) × 28 = 140
    let config = config(0);
    let roster = Roster::new(vec![
        StaffRecord::new("S1", "One", 20),
        StaffRecord::new("S2", "Two", 20),
    ]);
    let report = capacity_report(&config, &roster);
    assert_eq!(report.base_slots, 140);
    assert_eq!(report.supply_slots, 40);

    let warning = capacity_warning(&report).expect("warning expected");
    assert_eq!(warning.severity, Severity::Red);
    assert_eq!(warning.code, WarningCode::InsufficientCapacityBase);
}

#[test]
fn capacity_warning_yellow_when_base_covered_but_not_peak() {
    let config = config(20);
    // supply 150: covers base 140, not total 160
    let staff: Vec<StaffRecord> = (0..6)
        .map(|i| StaffRecord::new(format!("S{i}"), format!("Staff {i}"), 25))
        .collect();
    let report = capacity_report(&config, &Roster::new(staff));
    assert_eq!(report.total_slots, 160);
    assert_eq!(report.supply_slots, 150);

    let warning = capacity_warning(&report).expect("warning expected");
    assert_eq!(warning.severity, Severity::Yellow);
    assert_eq!(warning.code, WarningCode::InsufficientCapacityPeak);
}

#[test]
fn capacity_silent_when_supply_covers_peak() {
    let config = config(20);
    let staff: Vec<StaffRecord> = (0..8)
        .map(|i| StaffRecord::new(format!("S{i}"), format!("Staff {i}"), 25))
        .collect();
    let report = capacity_report(&config, &Roster::new(staff));
    assert!(capacity_warning(&report).is_none());
}
