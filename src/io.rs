use crate::engine::types::ShiftError;
use crate::model::{Roster, RunOutcome, StaffId, StaffRecord};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::BTreeSet;
use std::path::Path;

const REQUIRED_STAFF_COLUMNS: [&str; 6] = [
    "staff_id",
    "name",
    "desired_days",
    "can_day",
    "can_night",
    "can_weekend_holiday",
];

/// Staff import from CSV. Header
/// `staff_id,name,role,desired_days,can_day,can_night,can_weekend_holiday,requested_off_dates`;
/// `role` and `requested_off_dates` are optional columns, flags accept
/// 0/1/true/false, requested-off is a comma-separated list of ISO dates.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(&path)?;
    let headers = rdr.headers()?.clone();

    for col in REQUIRED_STAFF_COLUMNS {
        if column(&headers, col).is_none() {
            return Err(ShiftError::MissingColumn(col).into());
        }
    }

    let mut staff = Vec::new();
    let mut seen: BTreeSet<StaffId> = BTreeSet::new();
    for rec in rdr.records() {
        let rec = rec?;
        let record = parse_staff_row(&headers, &rec)?;
        if !seen.insert(record.id.clone()) {
            return Err(ShiftError::DuplicateStaffId(record.id.as_str().to_string()).into());
        }
        staff.push(record);
    }
    Ok(Roster::new(staff))
}

fn parse_staff_row(headers: &StringRecord, rec: &StringRecord) -> Result<StaffRecord> {
    let field = |name: &str| {
        column(headers, name)
            .and_then(|i| rec.get(i))
            .map(str::trim)
    };
    let id = field("staff_id").context("missing staff_id")?;
    let name = field("name").context("missing name")?;
    if id.is_empty() || name.is_empty() {
        anyhow::bail!("invalid staff row (empty staff_id or name)");
    }
    let desired: u32 = field("desired_days")
        .context("missing desired_days")?
        .parse()
        .with_context(|| format!("invalid desired_days for staff {id}"))?;

    let mut record = StaffRecord::new(id, name, desired);
    record.role = field("role").unwrap_or_default().to_string();
    record.can_day = parse_flag(field("can_day").context("missing can_day")?)
        .with_context(|| format!("invalid can_day value for staff {id}"))?;
    record.can_night = parse_flag(field("can_night").context("missing can_night")?)
        .with_context(|| format!("invalid can_night value for staff {id}"))?;
    record.can_weekend_holiday =
        parse_flag(field("can_weekend_holiday").context("missing can_weekend_holiday")?)
            .with_context(|| format!("invalid can_weekend_holiday value for staff {id}"))?;
    if let Some(raw) = field("requested_off_dates") {
        record.requested_off = parse_off_dates(raw)?;
    }
    Ok(record)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => anyhow::bail!("expected boolean flag"),
    }
}

/// Empty or absent means no requests.
pub fn parse_off_dates(raw: &str) -> Result<BTreeSet<NaiveDate>> {
    let mut out = BTreeSet::new();
    for chunk in raw.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(chunk, "%Y-%m-%d")
            .map_err(|_| ShiftError::InvalidDate(chunk.to_string()))?;
        out.insert(date);
    }
    Ok(out)
}

/// Schedule export: header `date,shift_type,staff_id,name`, sorted by date,
/// then shift type, then staff id (analysis-friendly long format).
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, outcome: &RunOutcome) -> Result<()> {
    let mut rows = outcome.schedule.clone();
    rows.sort_by(|a, b| {
        (a.date, a.shift_type.as_str(), &a.staff_id).cmp(&(b.date, b.shift_type.as_str(), &b.staff_id))
    });

    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift_type", "staff_id", "name"])?;
    for entry in &rows {
        w.write_record([
            entry.date.format("%Y-%m-%d").to_string().as_str(),
            entry.shift_type.as_str(),
            entry.staff_id.as_str(),
            entry.name.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Warning export: header `severity,code,message,evidence`, run order kept.
pub fn export_warnings_csv<P: AsRef<Path>>(path: P, outcome: &RunOutcome) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["severity", "code", "message", "evidence"])?;
    for warning in &outcome.warnings {
        w.write_record([
            warning.severity.as_str(),
            warning.code.as_str(),
            warning.message.as_str(),
            warning.evidence.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
