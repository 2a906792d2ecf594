pub mod attendance;
pub mod timestamp;

pub use attendance::{AttendancePage, AttendanceQuery, AttendanceRecord, AttendanceUpdate};
