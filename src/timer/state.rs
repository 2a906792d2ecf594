use strum::{Display, EnumString};

use crate::model::AttendanceRecord;
use crate::render::ActionState;

/// Where today's attendance stands, derived only from clock-in/clock-out
/// presence on the applied record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceState {
    Idle,
    Active,
    Completed,
}

impl AttendanceState {
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        match record {
            Some(r) if r.has_clock_out() => AttendanceState::Completed,
            Some(r) if r.has_clock_in() => AttendanceState::Active,
            _ => AttendanceState::Idle,
        }
    }

    /// Whether the elapsed-time tick should be running.
    pub fn is_ticking(self) -> bool {
        self == AttendanceState::Active
    }

    pub fn clock_in_action(self) -> ActionState {
        match self {
            AttendanceState::Idle => ActionState::new(true, "Clock In"),
            AttendanceState::Active | AttendanceState::Completed => {
                ActionState::new(false, "Clocked In")
            }
        }
    }

    pub fn clock_out_action(self) -> ActionState {
        match self {
            AttendanceState::Idle => ActionState::new(false, "Clock Out"),
            AttendanceState::Active => ActionState::new(true, "Clock Out"),
            AttendanceState::Completed => ActionState::new(false, "Clocked Out"),
        }
    }
}
