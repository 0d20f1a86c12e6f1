use super::state::{StaffState, StateStore};
use crate::config::{RiskThresholds, RunConfig};
use crate::holiday::{is_weekend_or_holiday, HolidayCalendar};
use crate::model::{Severity, ShiftType, Warning, WarningCode};
use tracing::debug;

/// Post-hoc compliance scan over the finished matrix. Each check is
/// independent and only appends warnings; none stops the scan.
pub(super) fn evaluate(
    config: &RunConfig,
    rules: &RiskThresholds,
    calendar: &dyn HolidayCalendar,
    store: &StateStore,
    warnings: &mut Vec<Warning>,
) {
    for state in store.iter() {
        check_requested_off(state, warnings);
        check_consecutive(state, rules, warnings);
        check_rest(state, warnings);
        check_overtime(state, config, rules, warnings);
        check_weekend_restriction(state, calendar, warnings);
    }

    if warnings.is_empty() {
        warnings.push(Warning::new(
            Severity::Green,
            WarningCode::AllClear,
            "no significant labor risks detected",
            "",
        ));
    }
    debug!(count = warnings.len(), "risk evaluation finished");
}

/// A requested day off must stay OFF no matter what the allocator did; this
/// re-checks the final matrix rather than trusting the allocation path.
fn check_requested_off(state: &StaffState, warnings: &mut Vec<Warning>) {
    for &date in &state.requested_off {
        if state.shift_on(date).is_some_and(ShiftType::is_work) {
            warnings.push(Warning::new(
                Severity::Red,
                WarningCode::RequestedOffViolation,
                "work assigned on a requested day off",
                format!("{} ({})", state.name, date.format("%Y-%m-%d")),
            ));
        }
    }
}

fn check_consecutive(state: &StaffState, rules: &RiskThresholds, warnings: &mut Vec<Warning>) {
    let band = rules.thresholds.max_consecutive_workdays;
    let mut run: u32 = 0;
    let mut longest: u32 = 0;
    for (_, shift) in state.shifts() {
        if shift.is_work() {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    if longest > band.red {
        warnings.push(Warning::new(
            Severity::Red,
            WarningCode::ExcessiveConsecutive,
            format!(
                "consecutive workdays excessive ({longest} days, limit {})",
                band.red
            ),
            state.name.clone(),
        ));
    } else if longest > band.yellow {
        warnings.push(Warning::new(
            Severity::Yellow,
            WarningCode::HighConsecutive,
            format!(
                "consecutive workdays high ({longest} days, recommended {})",
                band.yellow
            ),
            state.name.clone(),
        ));
    }
}

/// Night shift into day shift on the very next calendar day. The allocator
/// already refuses this pattern; scanning the final matrix as well catches
/// any future allocation change that lets one through.
fn check_rest(state: &StaffState, warnings: &mut Vec<Warning>) {
    let worked: Vec<_> = state.shifts().filter(|(_, s)| s.is_work()).collect();
    for pair in worked.windows(2) {
        let (curr_date, curr_shift) = pair[0];
        let (next_date, next_shift) = pair[1];
        if curr_shift == ShiftType::Night
            && next_shift == ShiftType::Day
            && (next_date - curr_date).num_days() == 1
        {
            warnings.push(Warning::new(
                Severity::Red,
                WarningCode::InsufficientRest,
                "possible insufficient rest (night shift into day shift)",
                format!(
                    "{} ({} → {})",
                    state.name,
                    curr_date.format("%Y-%m-%d"),
                    next_date.format("%Y-%m-%d")
                ),
            ));
        }
    }
}

/// Coarse estimate from standard shift-hour constants; no time-of-day data.
fn check_overtime(
    state: &StaffState,
    config: &RunConfig,
    rules: &RiskThresholds,
    warnings: &mut Vec<Warning>,
) {
    let band = rules.thresholds.max_month_overtime_hours;
    let day_shifts = state.count_shifts(ShiftType::Day);
    let night_shifts = state.count_shifts(ShiftType::Night);
    let total_hours = f64::from(day_shifts) * config.standard_day_shift_hours
        + f64::from(night_shifts) * config.standard_night_shift_hours;
    let overtime = (total_hours - rules.standard_month_hours).max(0.0);

    if overtime > band.red {
        warnings.push(Warning::new(
            Severity::Red,
            WarningCode::ExcessiveOvertime,
            format!(
                "estimated overtime excessive ({overtime:.1}h, limit {}h)",
                band.red
            ),
            state.name.clone(),
        ));
    } else if overtime > band.yellow {
        warnings.push(Warning::new(
            Severity::Yellow,
            WarningCode::HighOvertime,
            format!(
                "estimated overtime near the limit ({overtime:.1}h, recommended {}h)",
                band.yellow
            ),
            state.name.clone(),
        ));
    }
}

fn check_weekend_restriction(
    state: &StaffState,
    calendar: &dyn HolidayCalendar,
    warnings: &mut Vec<Warning>,
) {
    if state.can_weekend_holiday {
        return;
    }
    for (date, shift) in state.shifts() {
        if shift.is_work() && is_weekend_or_holiday(date, calendar) {
            warnings.push(Warning::new(
                Severity::Yellow,
                WarningCode::WeekendRestriction,
                "weekend/holiday work assigned to weekend-restricted staff",
                format!("{} ({})", state.name, date.format("%Y-%m-%d")),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::StateStore;
    use super::*;
    use crate::config::{Month, RiskThresholds, RunConfig};
    use crate::holiday::NoHolidays;
    use crate::model::{Roster, StaffRecord};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    fn fixture() -> (RunConfig, RiskThresholds, Vec<NaiveDate>) {
        let month = Month::new(2026, 2).unwrap();
        (
            RunConfig::new(month, 1, 1),
            RiskThresholds::default(),
            month.dates(),
        )
    }

    fn store_with(record: StaffRecord, dates: &[NaiveDate]) -> StateStore {
        StateStore::new(&Roster::new(vec![record]), dates)
    }

    fn run_checks(
        config: &RunConfig,
        rules: &RiskThresholds,
        store: &StateStore,
    ) -> Vec<Warning> {
        let mut warnings = Vec::new();
        evaluate(config, rules, &NoHolidays, store, &mut warnings);
        warnings
    }

    fn codes(warnings: &[Warning]) -> Vec<WarningCode> {
        warnings.iter().map(|w| w.code).collect()
    }

    #[test]
    fn consecutive_run_at_yellow_threshold_is_silent() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        for day in 1..=6 {
            assert!(store.get_mut(0).assign(date(day), ShiftType::Day));
        }
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(!codes(&warnings).contains(&WarningCode::HighConsecutive));
        assert!(!codes(&warnings).contains(&WarningCode::ExcessiveConsecutive));
    }

    #[test]
    fn consecutive_run_over_yellow_is_yellow() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        for day in 1..=7 {
            store.get_mut(0).assign(date(day), ShiftType::Day);
        }
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::HighConsecutive));
        assert!(!codes(&warnings).contains(&WarningCode::ExcessiveConsecutive));
    }

    #[test]
    fn consecutive_run_over_red_is_red_only() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        for day in 1..=9 {
            store.get_mut(0).assign(date(day), ShiftType::Day);
        }
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::ExcessiveConsecutive));
        // red replaces yellow, both never fire together
        assert!(!codes(&warnings).contains(&WarningCode::HighConsecutive));
    }

    #[test]
    fn night_into_day_next_morning_is_flagged() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        store.get_mut(0).assign(date(3), ShiftType::Night);
        store.get_mut(0).assign(date(4), ShiftType::Day);
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::InsufficientRest));
    }

    #[test]
    fn night_then_day_with_gap_is_fine() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        store.get_mut(0).assign(date(3), ShiftType::Night);
        store.get_mut(0).assign(date(5), ShiftType::Day);
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(!codes(&warnings).contains(&WarningCode::InsufficientRest));
    }

    #[test]
    fn requested_off_breach_detected_regardless_of_cause() {
        let (config, rules, _) = fixture();
        // Seed the store with a date list that skips the requested day, so
        // the OFF pre-seed never happens and a work shift can land on it.
        let mut record = StaffRecord::new("S1", "One", 28);
        record.requested_off.insert(date(10));
        let dates: Vec<NaiveDate> = (11..=12).map(date).collect();
        let mut store = store_with(record, &dates);
        store.get_mut(0).assign(date(10), ShiftType::Day);
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::RequestedOffViolation));
    }

    #[test]
    fn overtime_bands() {
        let (config, rules, dates) = fixture();
        // 21 night shifts × 10h = 210h → 50h over the 160h baseline: YELLOW.
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        for day in 1..=21 {
            store.get_mut(0).assign(date(day), ShiftType::Night);
        }
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::HighOvertime));
        assert!(!codes(&warnings).contains(&WarningCode::ExcessiveOvertime));

        // 22 night shifts → 60h over: RED.
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        for day in 1..=22 {
            store.get_mut(0).assign(date(day), ShiftType::Night);
        }
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert!(codes(&warnings).contains(&WarningCode::ExcessiveOvertime));
        assert!(!codes(&warnings).contains(&WarningCode::HighOvertime));
    }

    #[test]
    fn weekend_work_without_clearance_is_flagged_per_date() {
        let (config, rules, dates) = fixture();
        let mut record = StaffRecord::new("S1", "One", 28);
        record.can_weekend_holiday = false;
        let mut store = store_with(record, &dates);
        // 2026-02-07 and 2026-02-08 are Saturday and Sunday.
        store.get_mut(0).assign(date(7), ShiftType::Day);
        store.get_mut(0).assign(date(8), ShiftType::Day);
        store.get_mut(0).assign(date(9), ShiftType::Day);
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        let weekend: Vec<_> = warnings
            .iter()
            .filter(|w| w.code == WarningCode::WeekendRestriction)
            .collect();
        assert_eq!(weekend.len(), 2);
    }

    #[test]
    fn clean_run_yields_single_all_clear() {
        let (config, rules, dates) = fixture();
        let mut store = store_with(StaffRecord::new("S1", "One", 28), &dates);
        store.get_mut(0).assign(date(2), ShiftType::Day);
        store.close_matrix(&dates);
        let warnings = run_checks(&config, &rules, &store);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::AllClear);
        assert_eq!(warnings[0].severity, Severity::Green);
    }
}
