use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one submission attempt. Every engine response carries the ticket
/// it was issued for so that responses for a superseded submission can be
/// recognised and dropped.
pub type Ticket = u64;

/// Backend identifier of an asynchronous processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Body of `GET /status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /process-pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub job_id: JobId,
    #[serde(default)]
    pub message: String,
}

/// The single live job of a session, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_id: JobId,
    pub status: JobStatus,
    pub step: String,
    pub progress: u32,
    pub error: Option<String>,
}

impl Job {
    pub(crate) fn accepted(job_id: JobId) -> Self {
        Self {
            job_id,
            status: JobStatus::Pending,
            step: crate::stage::UPLOADING_STEP.to_string(),
            progress: 0,
            error: None,
        }
    }

    /// Overwrites the job with a poll response. Progress is not required to be
    /// monotonic; a lower value replaces a higher one.
    pub(crate) fn apply(&mut self, report: JobStatusReport) {
        self.status = report.status;
        self.step = report.step;
        self.progress = report.progress;
        self.error = report.error;
    }
}
