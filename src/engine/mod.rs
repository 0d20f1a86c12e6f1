mod allocate;
mod demand;
mod risk;
mod state;
pub mod types;

pub use demand::{capacity_report, capacity_warning, DemandPlan};
pub use types::ShiftError;

use crate::config::{RiskThresholds, RunConfig};
use crate::holiday::HolidayCalendar;
use crate::model::{Roster, RunOutcome, ScheduleEntry};
use state::StateStore;
use tracing::info;

/// One-shot shift engine: plans demand, allocates the month, evaluates risk.
/// All mutable run state lives inside [`Engine::run`] and is dropped with it,
/// so an engine can be reused across months without leakage.
pub struct Engine<'a> {
    config: &'a RunConfig,
    rules: &'a RiskThresholds,
    calendar: &'a dyn HolidayCalendar,
}

impl<'a> Engine<'a> {
    pub fn new(
        config: &'a RunConfig,
        rules: &'a RiskThresholds,
        calendar: &'a dyn HolidayCalendar,
    ) -> Self {
        Self {
            config,
            rules,
            calendar,
        }
    }

    /// Produces a complete staff×date matrix plus the warning list. Never
    /// fails: every condition past input validation is a warning.
    pub fn run(&self, roster: &Roster) -> RunOutcome {
        info!(month = %self.config.month, staff = roster.len(), "shift generation started");

        let plan = DemandPlan::build(self.config, self.calendar);
        let capacity = capacity_report(self.config, roster);

        let mut warnings = Vec::new();
        if let Some(w) = capacity_warning(&capacity) {
            warnings.push(w);
        }

        let mut store = StateStore::new(roster, plan.dates());
        allocate::allocate(
            self.config,
            self.rules,
            &plan,
            self.calendar,
            &mut store,
            &mut warnings,
        );
        store.close_matrix(plan.dates());

        let schedule = flatten(&store);
        risk::evaluate(self.config, self.rules, self.calendar, &store, &mut warnings);

        info!(
            entries = schedule.len(),
            warnings = warnings.len(),
            "shift generation finished"
        );

        RunOutcome {
            schedule,
            warnings,
            capacity,
        }
    }
}

/// Flat output rows: staff in roster order, dates ascending within each.
fn flatten(store: &StateStore) -> Vec<ScheduleEntry> {
    let mut out = Vec::new();
    for state in store.iter() {
        for (date, shift_type) in state.shifts() {
            out.push(ScheduleEntry {
                date,
                shift_type,
                staff_id: state.id.clone(),
                name: state.name.clone(),
            });
        }
    }
    out
}
