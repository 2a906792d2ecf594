use thiserror::Error;

/// Failures talking to the attendance API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all: connection refused, timeout, TLS.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Text suitable for showing to the employee.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(_) => "Attendance service unreachable".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Terminal input the widget cannot act on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("invalid page: {0}")]
    InvalidPage(String),

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("unexpected arguments: {0}")]
    UnexpectedArgs(String),
}
