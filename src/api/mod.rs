pub mod attendance;

pub use attendance::{AttendanceApi, HttpAttendanceApi};
