use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::timestamp;

/// Today's (or a historical) attendance entry as served by the HR API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    pub date: NaiveDate,

    #[serde(default, with = "timestamp::option")]
    pub clock_in: Option<DateTime<Utc>>,

    /// Only meaningful when `clock_in` is also set
    #[serde(default, with = "timestamp::option")]
    pub clock_out: Option<DateTime<Utc>>,

    /// Server-computed, authoritative once `clock_out` is set
    #[serde(default)]
    pub hours_worked: Option<f64>,

    /// `present` when the server leaves it missing or null
    #[serde(default = "default_status", deserialize_with = "status_or_default")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_status() -> String {
    "present".to_string()
}

fn status_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

impl AttendanceRecord {
    /// A fresh record for `date` carrying only a clock-in.
    pub fn clocked_in(date: NaiveDate, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: None,
            date,
            clock_in: Some(at),
            clock_out: None,
            hours_worked: None,
            status: default_status(),
            notes: None,
        }
    }

    pub fn has_clock_in(&self) -> bool {
        self.clock_in.is_some()
    }

    /// A clock-out without a clock-in is ignored.
    pub fn has_clock_out(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_some()
    }
}

/// Paginated history as returned by `GET /attendance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendancePage {
    pub attendance: Vec<AttendanceRecord>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u32,
    pub per_page: u32,
}

/// Filters for the history listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl AttendanceQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// HR/admin correction payload for `PUT /attendance/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn deserializes_server_payload() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "id": 7,
            "user_id": 3,
            "date": "2024-05-02",
            "clock_in": "2024-05-02T09:00:00Z",
            "clock_out": "2024-05-02T17:30:00+00:00",
            "hours_worked": 8.5,
            "status": "late",
            "notes": null,
            "created_at": "2024-05-02T09:00:00",
            "updated_at": "2024-05-02T17:30:00"
        }))
        .unwrap();

        assert_eq!(record.id, Some(7));
        assert_eq!(
            record.clock_in,
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap())
        );
        assert_eq!(
            record.clock_out,
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 17, 30, 0).unwrap())
        );
        assert_eq!(record.hours_worked, Some(8.5));
        assert_eq!(record.status, "late");
        assert!(record.has_clock_out());
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let record: AttendanceRecord =
            serde_json::from_value(json!({ "date": "2024-05-02" })).unwrap();

        assert_eq!(record.clock_in, None);
        assert_eq!(record.clock_out, None);
        assert_eq!(record.hours_worked, None);
        assert_eq!(record.status, "present");
        assert!(!record.has_clock_in());
    }

    #[test]
    fn null_status_reads_as_present() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "id": 3,
            "date": "2024-05-02",
            "clock_in": "2024-05-02T09:00:00Z",
            "clock_out": null,
            "hours_worked": null,
            "status": null,
            "notes": null
        }))
        .unwrap();

        assert_eq!(record.status, "present");
        assert!(record.has_clock_in());
        assert!(!record.has_clock_out());
    }

    #[test]
    fn clock_out_without_clock_in_is_not_counted() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 17, 0, 0).unwrap();
        let record = AttendanceRecord {
            clock_in: None,
            clock_out: Some(at),
            ..AttendanceRecord::clocked_in(at.date_naive(), at)
        };

        assert!(!record.has_clock_out());
    }

    #[test]
    fn query_skips_unset_filters() {
        let query = AttendanceQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..AttendanceQuery::page(2)
        };

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "date_from": "2024-05-01", "page": 2 })
        );
    }
}
