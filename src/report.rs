use crate::model::{RunOutcome, Severity};
use std::fmt::Write;
use tracing::{info, warn};

/// Operator-facing run summary: severity counts plus the first few RED
/// findings. Format-agnostic text, printed or logged as the caller likes.
pub fn render_summary(outcome: &RunOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "run summary");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "schedule entries: {}", outcome.schedule.len());

    let _ = writeln!(out, "warnings:");
    for severity in [Severity::Red, Severity::Yellow, Severity::Green] {
        let count = outcome.count_by_severity(severity);
        if count > 0 {
            let _ = writeln!(out, "  {severity}: {count}");
        }
    }

    let reds: Vec<_> = outcome
        .warnings
        .iter()
        .filter(|w| w.severity == Severity::Red)
        .collect();
    if !reds.is_empty() {
        let _ = writeln!(out, "critical issues (RED):");
        for w in reds.iter().take(5) {
            let _ = writeln!(out, "  - {}: {}", w.message, w.evidence);
        }
        if reds.len() > 5 {
            let _ = writeln!(out, "  ... {} more", reds.len() - 5);
        }
    }
    out
}

/// Same summary on the log surface.
pub fn log_summary(outcome: &RunOutcome) {
    let red = outcome.count_by_severity(Severity::Red);
    let yellow = outcome.count_by_severity(Severity::Yellow);
    if red > 0 {
        warn!(red, yellow, "run finished with critical warnings");
    } else {
        info!(yellow, "run finished");
    }
    for w in outcome
        .warnings
        .iter()
        .filter(|w| w.severity == Severity::Red)
        .take(5)
    {
        warn!(code = %w.code, evidence = %w.evidence, "{}", w.message);
    }
}
