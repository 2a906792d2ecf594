//! Attendance history table.

use chrono::{DateTime, Local, Utc};

use super::NO_PUNCH;
use crate::model::{AttendancePage, AttendanceRecord};

pub const EMPTY_HISTORY: &str = "No attendance records found";

/// `HH:MM:SS` in the host's local time, or the placeholder.
pub fn punch_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => NO_PUNCH.to_string(),
    }
}

/// Recorded hours; unset and zero both read as "0.0 hours".
pub fn recorded_hours(record: &AttendanceRecord) -> String {
    match record.hours_worked {
        Some(hours) if hours != 0.0 => format!("{hours:.2} hours"),
        _ => "0.0 hours".to_string(),
    }
}

pub fn history_table(page: &AttendancePage) -> String {
    if page.attendance.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    let mut lines = vec![format!(
        "{:<10}  {:<8}  {:<8}  {:>11}  {}",
        "Date", "Clock In", "Clock Out", "Hours", "Status"
    )];

    lines.extend(page.attendance.iter().map(|record| {
        format!(
            "{:<10}  {:<8}  {:<8}  {:>11}  {}",
            record.date.format("%Y-%m-%d").to_string(),
            punch_time(record.clock_in),
            punch_time(record.clock_out),
            recorded_hours(record),
            record.status,
        )
    }));

    lines.push(format!(
        "page {}/{} ({} records)",
        page.current_page,
        page.pages.max(1),
        page.total
    ));

    lines.join("\n")
}
