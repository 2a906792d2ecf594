use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info, trace};

use super::clock::Clock;
use super::elapsed::{ElapsedTime, IDLE_READOUT, format_hours};
use super::schedule::{Scheduler, TimerHandle};
use super::state::AttendanceState;
use crate::model::AttendanceRecord;
use crate::render::history::punch_time;
use crate::render::{DisplaySink, NO_PUNCH, StatusBadge};

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// State shared with the scheduled tick.
struct Shared {
    record: RwLock<Option<AttendanceRecord>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DisplaySink>,
}

impl Shared {
    fn tick(&self) {
        // Held across the sink write: `apply_status` renders under the write lock.
        let record = self.record.read().unwrap_or_else(PoisonError::into_inner);

        let Some(clock_in) = record
            .as_ref()
            .filter(|r| !r.has_clock_out())
            .and_then(|r| r.clock_in)
        else {
            return;
        };

        let elapsed = ElapsedTime::between(clock_in, self.clock.now());
        trace!(elapsed_ms = elapsed.as_millis(), "Attendance tick");
        self.sink.set_elapsed(&elapsed.to_string());
    }
}

/// Today's attendance widget: projects the latest record onto the display
/// sinks and keeps a live elapsed-time readout running while the employee
/// is clocked in.
pub struct AttendanceTimer<S: Scheduler> {
    shared: Arc<Shared>,
    scheduler: S,
    schedule: Option<TimerHandle>,
    period: Duration,
}

impl<S: Scheduler> AttendanceTimer<S> {
    pub fn new(scheduler: S, clock: Arc<dyn Clock>, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                record: RwLock::new(None),
                clock,
                sink,
            }),
            scheduler,
            schedule: None,
            period: DEFAULT_TICK,
        }
    }

    /// Tick period, one second unless overridden. Zero is ignored.
    pub fn with_period(mut self, period: Duration) -> Self {
        if !period.is_zero() {
            self.period = period;
        }
        self
    }

    /// Replaces the current record and redraws everything from it.
    ///
    /// `None` means there is no record for today (not-found, logout).
    /// Tolerates partial records; never fails.
    pub fn apply_status(&mut self, record: Option<AttendanceRecord>) {
        let state = AttendanceState::of(record.as_ref());
        let previous = self.state();

        if state != previous {
            info!(from = %previous, to = %state, "Attendance state changed");
        } else {
            debug!(%state, "Attendance status refreshed");
        }

        if !state.is_ticking() {
            self.stop();
        }

        {
            let mut current = self
                .shared
                .record
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = record;

            let sink = &self.shared.sink;
            sink.set_clock_in(state.clock_in_action());
            sink.set_clock_out(state.clock_out_action());

            match (state, current.as_ref()) {
                (AttendanceState::Idle, _) | (_, None) => {
                    sink.set_status(StatusBadge::not_started());
                    sink.set_punch_times(NO_PUNCH, NO_PUNCH);
                    sink.set_elapsed(IDLE_READOUT);
                }
                (AttendanceState::Active, Some(r)) => {
                    sink.set_status(StatusBadge::from_status(&r.status));
                    sink.set_punch_times(&punch_time(r.clock_in), NO_PUNCH);
                }
                (AttendanceState::Completed, Some(r)) => {
                    sink.set_status(StatusBadge::from_status(&r.status));
                    sink.set_punch_times(&punch_time(r.clock_in), &punch_time(r.clock_out));
                    sink.set_elapsed(&format_hours(r.hours_worked.unwrap_or(0.0)));
                }
            }
        }

        if state.is_ticking() {
            self.start();
        }
    }

    /// Starts the live readout. Any previous schedule is cancelled first,
    /// so there is never more than one. Does nothing unless Active.
    pub fn start(&mut self) {
        self.stop();

        let state = self.state();
        if !state.is_ticking() {
            debug!(%state, "Attendance timer not started");
            return;
        }

        let shared = self.shared.clone();
        let handle = self
            .scheduler
            .schedule_every(self.period, Box::new(move || shared.tick()));
        self.schedule = Some(handle);
        debug!(period_ms = self.period.as_millis() as u64, "Attendance timer started");

        self.tick();
    }

    /// Cancels the live readout; a no-op when nothing is scheduled.
    pub fn stop(&mut self) {
        if let Some(handle) = self.schedule.take() {
            handle.cancel();
            debug!("Attendance timer stopped");
        }
    }

    /// Redraws the live elapsed time. Does nothing unless the current record
    /// is clocked in and not yet clocked out.
    pub fn tick(&self) {
        self.shared.tick();
    }

    pub fn is_active(&self) -> bool {
        self.schedule
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    pub fn state(&self) -> AttendanceState {
        AttendanceState::of(self.record().as_ref())
    }

    pub fn record(&self) -> Option<AttendanceRecord> {
        self.shared
            .record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S: Scheduler> Drop for AttendanceTimer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;
    use crate::timer::clock::FixedClock;
    use crate::timer::schedule::ManualScheduler;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    struct Fixture {
        timer: AttendanceTimer<ManualScheduler>,
        scheduler: ManualScheduler,
        clock: Arc<FixedClock>,
        sink: Arc<MemorySink>,
    }

    fn clock_in_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()
    }

    fn fixture() -> Fixture {
        let scheduler = ManualScheduler::new();
        let clock = Arc::new(FixedClock::new(clock_in_at()));
        let sink = Arc::new(MemorySink::new());
        let timer = AttendanceTimer::new(scheduler.clone(), clock.clone(), sink.clone());
        Fixture {
            timer,
            scheduler,
            clock,
            sink,
        }
    }

    fn active() -> AttendanceRecord {
        AttendanceRecord::clocked_in(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), clock_in_at())
    }

    fn completed(hours: Option<f64>) -> AttendanceRecord {
        AttendanceRecord {
            clock_out: Some(clock_in_at() + chrono::Duration::hours(1)),
            hours_worked: hours,
            ..active()
        }
    }

    #[test]
    fn clocked_in_record_starts_ticking() {
        let mut f = fixture();
        f.timer.apply_status(Some(active()));

        assert_eq!(f.timer.state(), AttendanceState::Active);
        assert!(f.timer.is_active());
        assert_eq!(f.scheduler.active_count(), 1);

        let frame = f.sink.frame();
        assert!(!frame.clock_in.enabled);
        assert!(frame.clock_out.enabled);
        assert_eq!(frame.status.label, "present");
        // ticked immediately, not one period later
        assert_eq!(frame.elapsed, "0.00 hours (0h 0m 0s)");
        assert_eq!(frame.elapsed_writes, 1);
    }

    #[test]
    fn completed_record_shows_final_hours() {
        let mut f = fixture();
        f.timer.apply_status(Some(completed(Some(7.456))));

        assert_eq!(f.timer.state(), AttendanceState::Completed);
        assert!(!f.timer.is_active());
        assert_eq!(f.scheduler.active_count(), 0);

        let frame = f.sink.frame();
        assert!(!frame.clock_in.enabled);
        assert!(!frame.clock_out.enabled);
        assert_eq!(frame.elapsed, "7.46 hours");
    }

    #[test]
    fn completed_record_without_hours_reads_zero() {
        let mut f = fixture();
        f.timer.apply_status(Some(completed(None)));

        assert_eq!(f.sink.frame().elapsed, "0.00 hours");
    }

    #[test]
    fn double_start_keeps_one_schedule() {
        let mut f = fixture();
        f.timer.apply_status(Some(active()));
        f.timer.start();
        f.timer.start();

        assert_eq!(f.scheduler.active_count(), 1);

        let before = f.sink.frame().elapsed_writes;
        f.scheduler.fire();
        assert_eq!(f.sink.frame().elapsed_writes, before + 1);
    }

    #[test]
    fn start_outside_active_schedules_nothing() {
        let mut f = fixture();
        f.timer.start();
        assert!(!f.timer.is_active());
        assert_eq!(f.scheduler.active_count(), 0);

        f.timer.apply_status(Some(completed(Some(7.46))));
        f.timer.start();
        assert!(!f.timer.is_active());
        assert_eq!(f.scheduler.active_count(), 0);
        assert_eq!(f.sink.frame().elapsed, "7.46 hours");
    }

    #[test]
    fn stop_without_schedule_is_noop() {
        let mut f = fixture();
        f.timer.stop();
        f.timer.stop();

        assert!(!f.timer.is_active());
        assert_eq!(f.timer.state(), AttendanceState::Idle);
        assert_eq!(f.sink.frame(), crate::render::Frame::default());
    }

    #[test]
    fn tick_formats_elapsed_since_clock_in() {
        let mut f = fixture();
        f.timer.apply_status(Some(active()));

        f.clock
            .set(clock_in_at() + chrono::Duration::seconds(2 * 3600 + 21 * 60 + 5));
        f.scheduler.fire();

        assert_eq!(f.sink.frame().elapsed, "2.35 hours (2h 21m 5s)");
    }

    #[test]
    fn tick_without_clock_in_does_nothing() {
        let f = fixture();
        f.timer.tick();

        assert_eq!(f.sink.frame().elapsed_writes, 0);
    }

    #[test]
    fn null_record_returns_to_idle_from_any_state() {
        for record in [active(), completed(Some(1.0))] {
            let mut f = fixture();
            f.timer.apply_status(Some(record));
            f.timer.apply_status(None);

            assert_eq!(f.timer.state(), AttendanceState::Idle);
            assert!(!f.timer.is_active());
            assert_eq!(f.scheduler.active_count(), 0);

            let frame = f.sink.frame();
            assert!(frame.clock_in.enabled);
            assert!(!frame.clock_out.enabled);
            assert_eq!(frame.status.label, "Not Started");
            assert_eq!(frame.elapsed, "0.0 hours");
            assert_eq!(frame.clock_in_time, NO_PUNCH);
        }
    }

    #[test]
    fn record_without_punches_is_idle() {
        let mut f = fixture();
        f.timer.apply_status(Some(AttendanceRecord {
            clock_in: None,
            status: "absent".to_string(),
            ..active()
        }));

        assert_eq!(f.timer.state(), AttendanceState::Idle);
        assert_eq!(f.sink.frame().status.label, "Not Started");
        assert!(!f.timer.is_active());
    }

    #[test]
    fn clock_in_then_clock_out_sequence() {
        let mut f = fixture();
        f.timer.apply_status(Some(active()));
        assert_eq!(f.timer.state(), AttendanceState::Active);

        f.clock.advance(chrono::Duration::minutes(30));
        f.scheduler.fire();
        assert_eq!(f.sink.frame().elapsed, "0.50 hours (0h 30m 0s)");

        f.timer.apply_status(Some(completed(Some(1.0))));
        assert_eq!(f.timer.state(), AttendanceState::Completed);
        assert_eq!(f.scheduler.active_count(), 0);
        assert_eq!(f.sink.frame().elapsed, "1.00 hours");

        // a stale schedule firing after completion must not overwrite the final readout
        f.scheduler.fire();
        assert_eq!(f.sink.frame().elapsed, "1.00 hours");
    }

    #[test]
    fn record_is_replaced_wholesale() {
        let mut f = fixture();
        f.timer.apply_status(Some(completed(Some(1.0))));
        f.timer.apply_status(Some(active()));

        let record = f.timer.record().unwrap();
        assert_eq!(record.clock_out, None);
        assert_eq!(record.hours_worked, None);
    }

    #[test]
    fn drop_cancels_schedule() {
        let mut f = fixture();
        f.timer.apply_status(Some(active()));
        assert_eq!(f.scheduler.active_count(), 1);

        drop(f.timer);
        assert_eq!(f.scheduler.active_count(), 0);
    }

    #[test]
    fn custom_period_is_used() {
        let scheduler = ManualScheduler::new();
        let mut timer = AttendanceTimer::new(
            scheduler.clone(),
            Arc::new(FixedClock::new(clock_in_at())),
            Arc::new(MemorySink::new()),
        )
        .with_period(Duration::from_millis(250))
        .with_period(Duration::ZERO);

        timer.apply_status(Some(active()));
        assert_eq!(scheduler.requested_periods(), vec![Duration::from_millis(250)]);
    }
}
