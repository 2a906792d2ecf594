//! Where the attendance widget draws itself.

pub mod history;
pub mod memory;
pub mod terminal;

use strum::{Display, EnumString};

pub use memory::{Frame, MemorySink};
pub use terminal::TerminalSink;

/// Placeholder shown for a punch time that has not happened yet.
pub const NO_PUNCH: &str = "--:--:--";

/// Enabled flag plus button caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub enabled: bool,
    pub label: String,
}

impl ActionState {
    pub fn new(enabled: bool, label: impl Into<String>) -> Self {
        Self {
            enabled,
            label: label.into(),
        }
    }
}

/// Badge colour family for a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Secondary,
}

impl StatusTone {
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "present" => StatusTone::Success,
            "late" => StatusTone::Warning,
            "absent" => StatusTone::Danger,
            _ => StatusTone::Secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub tone: StatusTone,
}

impl StatusBadge {
    pub fn from_status(status: &str) -> Self {
        Self {
            label: status.to_string(),
            tone: StatusTone::for_status(status),
        }
    }

    pub fn not_started() -> Self {
        Self {
            label: "Not Started".to_string(),
            tone: StatusTone::Secondary,
        }
    }
}

/// Render targets of the attendance widget. Implementations must be cheap:
/// `set_elapsed` is called once per tick.
pub trait DisplaySink: Send + Sync {
    fn set_clock_in(&self, action: ActionState);
    fn set_clock_out(&self, action: ActionState);
    fn set_status(&self, badge: StatusBadge);
    fn set_punch_times(&self, clock_in: &str, clock_out: &str);
    fn set_elapsed(&self, text: &str);
}
