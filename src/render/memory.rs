use std::sync::{Mutex, PoisonError};

use super::{ActionState, DisplaySink, NO_PUNCH, StatusBadge};
use crate::timer::elapsed::IDLE_READOUT;

/// Everything the widget currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub clock_in: ActionState,
    pub clock_out: ActionState,
    pub status: StatusBadge,
    pub clock_in_time: String,
    pub clock_out_time: String,
    pub elapsed: String,
    /// Number of `set_elapsed` calls so far.
    pub elapsed_writes: u64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            clock_in: ActionState::new(true, "Clock In"),
            clock_out: ActionState::new(false, "Clock Out"),
            status: StatusBadge::not_started(),
            clock_in_time: NO_PUNCH.to_string(),
            clock_out_time: NO_PUNCH.to_string(),
            elapsed: IDLE_READOUT.to_string(),
            elapsed_writes: 0,
        }
    }
}

/// Keeps the latest frame in memory, for headless hosts.
#[derive(Debug, Default)]
pub struct MemorySink {
    frame: Mutex<Frame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Frame {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Frame> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySink for MemorySink {
    fn set_clock_in(&self, action: ActionState) {
        self.lock().clock_in = action;
    }

    fn set_clock_out(&self, action: ActionState) {
        self.lock().clock_out = action;
    }

    fn set_status(&self, badge: StatusBadge) {
        self.lock().status = badge;
    }

    fn set_punch_times(&self, clock_in: &str, clock_out: &str) {
        let mut frame = self.lock();
        frame.clock_in_time = clock_in.to_string();
        frame.clock_out_time = clock_out.to_string();
    }

    fn set_elapsed(&self, text: &str) {
        let mut frame = self.lock();
        frame.elapsed = text.to_string();
        frame.elapsed_writes += 1;
    }
}
