//! Attendance widget of the HR management client: today's clock-in/clock-out
//! state machine, its live elapsed-time readout, and the host glue that
//! feeds it from the HR API.

pub mod api;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod timer;

pub use api::{AttendanceApi, HttpAttendanceApi};
pub use config::Config;
pub use controller::{AttendanceController, Section};
pub use error::{ApiError, CommandError, ConfigError};
pub use model::AttendanceRecord;
pub use timer::{AttendanceState, AttendanceTimer};
