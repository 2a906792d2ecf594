use std::io::Write;
use std::sync::{Mutex, PoisonError};

use super::{ActionState, DisplaySink, Frame, StatusBadge};

/// Redraws the widget as a single line on a terminal.
pub struct TerminalSink<W: Write + Send> {
    inner: Mutex<Inner<W>>,
}

struct Inner<W> {
    frame: Frame,
    out: W,
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                frame: Frame::default(),
                out,
            }),
        }
    }

    /// Ends the status line so other output starts on a fresh row.
    pub fn newline(&self) {
        let mut inner = self.lock();
        if let Err(e) = writeln!(inner.out).and_then(|_| inner.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut Frame)) {
        let mut inner = self.lock();
        apply(&mut inner.frame);
        let line = status_line(&inner.frame);
        if let Err(e) = write!(inner.out, "\r\x1b[2K{line}").and_then(|_| inner.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }
}

fn action(action: &ActionState) -> String {
    if action.enabled {
        format!("[{}]", action.label)
    } else {
        format!("({})", action.label)
    }
}

pub fn status_line(frame: &Frame) -> String {
    format!(
        "{} {} | {} ({}) | in {} out {} | {}",
        action(&frame.clock_in),
        action(&frame.clock_out),
        frame.status.label,
        frame.status.tone,
        frame.clock_in_time,
        frame.clock_out_time,
        frame.elapsed,
    )
}

impl<W: Write + Send> DisplaySink for TerminalSink<W> {
    fn set_clock_in(&self, action: ActionState) {
        self.update(|frame| frame.clock_in = action);
    }

    fn set_clock_out(&self, action: ActionState) {
        self.update(|frame| frame.clock_out = action);
    }

    fn set_status(&self, badge: StatusBadge) {
        self.update(|frame| frame.status = badge);
    }

    fn set_punch_times(&self, clock_in: &str, clock_out: &str) {
        self.update(|frame| {
            frame.clock_in_time = clock_in.to_string();
            frame.clock_out_time = clock_out.to_string();
        });
    }

    fn set_elapsed(&self, text: &str) {
        self.update(|frame| {
            frame.elapsed = text.to_string();
            frame.elapsed_writes += 1;
        });
    }
}
