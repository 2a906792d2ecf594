//! Host side of the attendance widget: talks to the API and feeds the
//! results into the timer.

use strum::{Display, EnumString};
use tracing::{error, info, instrument, warn};

use crate::api::AttendanceApi;
use crate::error::ApiError;
use crate::model::{AttendancePage, AttendanceQuery, AttendanceRecord};
use crate::timer::{AttendanceState, AttendanceTimer, Scheduler};

/// Views the host can show. Only whether the attendance view is visible
/// matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Dashboard,
    Attendance,
}

pub struct AttendanceController<A: AttendanceApi, S: Scheduler> {
    api: A,
    timer: AttendanceTimer<S>,
    section: Section,
}

impl<A: AttendanceApi, S: Scheduler> AttendanceController<A, S> {
    pub fn new(api: A, timer: AttendanceTimer<S>) -> Self {
        Self {
            api,
            timer,
            section: Section::Attendance,
        }
    }

    pub fn timer(&self) -> &AttendanceTimer<S> {
        &self.timer
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn state(&self) -> AttendanceState {
        self.timer.state()
    }

    /// Re-fetches today's record. Not-found resets the widget to idle; any
    /// other failure leaves the current state and readout untouched.
    #[instrument(name = "load_today", skip(self))]
    pub async fn load_today(&mut self) -> Result<AttendanceState, ApiError> {
        match self.api.today().await {
            Ok(record) => {
                self.timer.apply_status(record);
                Ok(self.timer.state())
            }
            Err(e) => {
                warn!(error = %e, state = %self.timer.state(), "Keeping current attendance state");
                Err(e)
            }
        }
    }

    /// Fetches a history page and today's record together. A failed today
    /// fetch is logged and leaves the widget as it was.
    #[instrument(name = "load_attendance", skip(self))]
    pub async fn load_attendance(
        &mut self,
        query: &AttendanceQuery,
    ) -> Result<AttendancePage, ApiError> {
        let (history, today) = futures::join!(self.api.history(query), self.api.today());

        match today {
            Ok(record) => self.timer.apply_status(record),
            Err(e) => warn!(error = %e, "Keeping current attendance state"),
        }

        if let Err(e) = &history {
            error!(error = %e, "Loading attendance history failed");
        }
        history
    }

    #[instrument(name = "clock_in", skip(self))]
    pub async fn clock_in(&mut self) -> Result<AttendanceState, ApiError> {
        let record = self.api.clock_in().await.inspect_err(|e| {
            error!(error = %e, "Clock-in failed");
        })?;

        info!("Clocked in");
        Ok(self.refresh_after_punch(record).await)
    }

    #[instrument(name = "clock_out", skip(self))]
    pub async fn clock_out(&mut self) -> Result<AttendanceState, ApiError> {
        let record = self.api.clock_out().await.inspect_err(|e| {
            error!(error = %e, "Clock-out failed");
        })?;

        info!(hours_worked = ?record.hours_worked, "Clocked out");
        self.timer.stop();
        Ok(self.refresh_after_punch(record).await)
    }

    /// Leaving the attendance view tears the live readout down; coming back
    /// re-fetches and restarts it.
    pub async fn show_section(&mut self, section: Section) -> Result<AttendanceState, ApiError> {
        self.section = section;

        if section != Section::Attendance {
            self.timer.stop();
            return Ok(self.timer.state());
        }

        self.load_today().await
    }

    /// Forgets today's record, e.g. on sign-out.
    pub fn logout(&mut self) {
        info!("Discarding attendance state");
        self.timer.apply_status(None);
    }

    /// After a successful punch the server's answer is already today's
    /// record; it is used when the follow-up fetch fails.
    async fn refresh_after_punch(&mut self, punched: AttendanceRecord) -> AttendanceState {
        match self.api.today().await {
            Ok(Some(record)) => self.timer.apply_status(Some(record)),
            Ok(None) => {
                warn!("Record missing right after punch, using punch response");
                self.timer.apply_status(Some(punched));
            }
            Err(e) => {
                warn!(error = %e, "Re-fetch after punch failed, using punch response");
                self.timer.apply_status(Some(punched));
            }
        }
        self.timer.state()
    }
}
