//! Commands typed into the terminal widget.

use crate::controller::Section;
use crate::error::CommandError;

pub const HELP: &str = "commands: in | out | refresh | history [page] | view <attendance|dashboard> | logout | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClockIn,
    ClockOut,
    Refresh,
    History { page: u32 },
    View(Section),
    Logout,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match (head.to_ascii_lowercase().as_str(), arg) {
            ("in" | "clock-in", None) => Command::ClockIn,
            ("out" | "clock-out", None) => Command::ClockOut,
            ("refresh" | "r", None) => Command::Refresh,
            ("history" | "h", None) => Command::History { page: 1 },
            ("history" | "h", Some(page)) => match page.parse::<u32>() {
                Ok(page) if page > 0 => Command::History { page },
                _ => return Err(CommandError::InvalidPage(page.to_string())),
            },
            ("view", Some(section)) => section
                .to_ascii_lowercase()
                .parse::<Section>()
                .map(Command::View)
                .map_err(|_| CommandError::UnknownView(section.to_string()))?,
            ("logout", None) => Command::Logout,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };

        if words.next().is_some() {
            return Err(CommandError::UnexpectedArgs(line.trim().to_string()));
        }
        Ok(Some(command))
    }
}
