use serde::Serialize;
use serde_json::Value;

use crate::backend::types::RawScheduleEntry;

/// Sentinel for a check-in component the backend did not supply.
pub const MISSING_FIELD: &str = "N/A";

/// Sentinel for an unassigned machine.
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Canonical, display-ready scan assignment.
///
/// Built exclusively from a [`RawScheduleEntry`]; the identifying
/// fields pass through unchanged while the check-in and unit fields are
/// resolved with deterministic fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub scan_id: Value,
    pub scan_type: Value,
    pub duration: Value,
    pub priority: Value,
    pub patient_id: Value,
    pub check_in_date: String,
    pub check_in_time: String,
    pub unit: String,
}

impl ScheduleRow {
    /// Render a pass-through value for tabular display.
    pub fn cell_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => MISSING_FIELD.to_string(),
            other => other.to_string(),
        }
    }
}

/// Map raw optimizer entries to canonical rows.
///
/// Order is preserved and every entry yields exactly one row; missing
/// fields are filled, never dropped.
pub fn normalize_schedule(entries: Vec<RawScheduleEntry>) -> Vec<ScheduleRow> {
    entries.into_iter().map(normalize_entry).collect()
}

/// Normalize a single raw entry.
pub fn normalize_entry(entry: RawScheduleEntry) -> ScheduleRow {
    // start_time is "date time" with a single space; a value without a
    // separator still counts as the date.
    let (date_from_start, time_from_start) = match entry.start_time.as_deref() {
        Some(start_time) => match start_time.split_once(' ') {
            Some((date, time)) => (Some(date.to_string()), Some(time.to_string())),
            None => (Some(start_time.to_string()), None),
        },
        None => (None, None),
    };

    let check_in_date = entry
        .check_in_date
        .or(date_from_start)
        .unwrap_or_else(|| MISSING_FIELD.to_string());

    let check_in_time = entry
        .check_in_time
        .or(time_from_start)
        .unwrap_or_else(|| MISSING_FIELD.to_string());

    let unit = entry
        .machine
        .filter(|machine| !machine.is_empty())
        .unwrap_or_else(|| UNKNOWN_UNIT.to_string());

    ScheduleRow {
        scan_id: entry.scan_id,
        scan_type: entry.scan_type,
        duration: entry.duration,
        priority: entry.priority,
        patient_id: entry.patient_id,
        check_in_date,
        check_in_time,
        unit,
    }
}
