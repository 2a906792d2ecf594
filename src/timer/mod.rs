//! Today's attendance state machine and its live elapsed-time readout.

pub mod attendance_timer;
pub mod clock;
pub mod elapsed;
pub mod schedule;
pub mod state;

pub use attendance_timer::{AttendanceTimer, DEFAULT_TICK};
pub use clock::{Clock, FixedClock, SystemClock};
pub use elapsed::ElapsedTime;
pub use schedule::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use state::AttendanceState;
