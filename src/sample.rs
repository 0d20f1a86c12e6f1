use crate::config::{Month, RunConfig};
use crate::model::{Roster, StaffRecord};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::fs;
use std::path::Path;

/// Deterministic six-person demo roster. Requested-off days are given as
/// days-of-month and rebased onto the target month, skipping days the month
/// does not have.
pub fn sample_roster(month: Month) -> Roster {
    let seed: [(&str, &str, &str, u32, [bool; 3], &[u32]); 6] = [
        ("A001", "Taro Tanaka", "full-time", 20, [true, true, true], &[11, 23]),
        ("A002", "Hanako Sato", "full-time", 18, [true, true, true], &[14]),
        ("A003", "Ichiro Suzuki", "part-time", 15, [true, false, false], &[]),
        ("A004", "Misaki Takahashi", "contract", 16, [true, true, true], &[20, 21]),
        ("A005", "Kenta Ito", "full-time", 22, [true, true, true], &[]),
        ("A006", "Yuko Watanabe", "part-time", 12, [true, false, true], &[1, 15]),
    ];

    let staff = seed
        .iter()
        .map(|(id, name, role, desired, caps, off_days)| {
            let mut record = StaffRecord::new(*id, *name, *desired);
            record.role = (*role).to_string();
            record.can_day = caps[0];
            record.can_night = caps[1];
            record.can_weekend_holiday = caps[2];
            record.requested_off = off_days
                .iter()
                .filter_map(|day| NaiveDate::from_ymd_opt(month.year(), month.month(), *day))
                .collect();
            record
        })
        .collect();
    Roster::new(staff)
}

pub fn sample_config(month: Month) -> RunConfig {
    let mut config = RunConfig::new(month, 3, 2);
    config.variable_extra_slots_month = 20;
    config
}

/// Writes `staff.csv` and `config.json` ready to feed a run.
pub fn write_sample_inputs<P: AsRef<Path>>(dir: P, month: Month) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let roster = sample_roster(month);
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .from_path(dir.join("staff.csv"))?;
    w.write_record([
        "staff_id",
        "name",
        "role",
        "desired_days",
        "can_day",
        "can_night",
        "can_weekend_holiday",
        "requested_off_dates",
    ])?;
    for s in &roster.staff {
        let off = s
            .requested_off
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(",");
        w.write_record([
            s.id.as_str(),
            s.name.as_str(),
            s.role.as_str(),
            &s.desired_days.to_string(),
            if s.can_day { "1" } else { "0" },
            if s.can_night { "1" } else { "0" },
            if s.can_weekend_holiday { "1" } else { "0" },
            off.as_str(),
        ])?;
    }
    w.flush()?;

    let config = sample_config(month);
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(dir.join("config.json"), json)?;
    Ok(())
}
