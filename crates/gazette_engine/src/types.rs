use std::fmt;

use gazette_core::{JobStatusReport, ProcessResult, SubmitReceipt, Ticket};

/// Everything the engine reports back to the front end. Each event carries
/// the ticket of the submission it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted {
        ticket: Ticket,
        result: Result<SubmitReceipt, ClientError>,
    },
    Status {
        ticket: Ticket,
        report: JobStatusReport,
    },
    /// Consecutive status failures reached the configured limit.
    PollAbandoned { ticket: Ticket, failures: u32 },
    ResultFetched {
        ticket: Ticket,
        result: Result<Box<ProcessResult>, ClientError>,
    },
}

/// The engine worker is gone and no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine worker stopped")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    /// `detail` string of the backend's JSON error body.
    pub detail: Option<String>,
}

impl ClientError {
    pub(crate) fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::InvalidUrl => write!(f, "invalid url"),
            ClientErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ClientErrorKind::Timeout => write!(f, "timeout"),
            ClientErrorKind::Network => write!(f, "network error"),
            ClientErrorKind::Decode => write!(f, "malformed response"),
        }
    }
}
