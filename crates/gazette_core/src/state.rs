use std::fmt;

use crate::view_model::{AppViewModel, ExplorationView, Phase};
use crate::{map_stage, ExplorationSession, Job, Stage, Ticket, UploadError};

pub(crate) const SUBMISSION_FALLBACK: &str = "Failed to upload file. Please try again.";
pub(crate) const JOB_FAILED_FALLBACK: &str = "Processing failed";
pub(crate) const RESULT_FETCH_FAILED: &str = "Failed to fetch results. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The upload was rejected or never reached the backend.
    Submission,
    /// The backend reported the job as failed.
    JobReported,
    /// The job completed but its result could not be fetched.
    ResultFetch,
    /// Status checks kept failing past the configured limit.
    PollingAbandoned,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Submission => write!(f, "upload failed"),
            FailureKind::JobReported => write!(f, "processing failed"),
            FailureKind::ResultFetch => write!(f, "result fetch failed"),
            FailureKind::PollingAbandoned => write!(f, "status polling abandoned"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Lifecycle of the session's single job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pipeline {
    #[default]
    Idle,
    Submitting {
        ticket: Ticket,
        file_name: String,
    },
    /// A job with status `Completed` is waiting for its result fetch.
    Polling {
        ticket: Ticket,
        job: Job,
    },
    Succeeded {
        job: Job,
        session: Box<ExplorationSession>,
    },
    Failed {
        job: Option<Job>,
        failure: Failure,
    },
}

impl Pipeline {
    /// Ticket of the in-flight submission or poll, if any.
    pub fn live_ticket(&self) -> Option<Ticket> {
        match self {
            Pipeline::Submitting { ticket, .. } | Pipeline::Polling { ticket, .. } => Some(*ticket),
            Pipeline::Idle | Pipeline::Succeeded { .. } | Pipeline::Failed { .. } => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Pipeline::Idle => Phase::Idle,
            Pipeline::Submitting { .. } => Phase::Submitting,
            Pipeline::Polling { .. } => Phase::Polling,
            Pipeline::Succeeded { .. } => Phase::Succeeded,
            Pipeline::Failed { .. } => Phase::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pipeline: Pipeline,
    last_ticket: Ticket,
    rejection: Option<UploadError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn phase(&self) -> Phase {
        self.pipeline.phase()
    }

    pub fn rejection(&self) -> Option<&UploadError> {
        self.rejection.as_ref()
    }

    pub fn session(&self) -> Option<&ExplorationSession> {
        match &self.pipeline {
            Pipeline::Succeeded { session, .. } => Some(&**session),
            _ => None,
        }
    }

    /// Stage for the live job, recomputed from its step and progress.
    pub fn stage(&self) -> Option<Stage> {
        match &self.pipeline {
            Pipeline::Submitting { .. } => Some(Stage::Uploading),
            Pipeline::Polling { job, .. } => Some(map_stage(&job.step, job.progress)),
            Pipeline::Succeeded { .. } => Some(Stage::Completed),
            Pipeline::Idle | Pipeline::Failed { .. } => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let (job_id, step, progress, error) = match &self.pipeline {
            Pipeline::Idle => (None, String::new(), 0, None),
            Pipeline::Submitting { .. } => (
                None,
                crate::stage::UPLOADING_STEP.to_string(),
                0,
                None,
            ),
            Pipeline::Polling { job, .. } | Pipeline::Succeeded { job, .. } => (
                Some(job.job_id.to_string()),
                job.step.clone(),
                job.progress.min(100),
                None,
            ),
            Pipeline::Failed { job, failure } => (
                job.as_ref().map(|job| job.job_id.to_string()),
                job.as_ref().map(|job| job.step.clone()).unwrap_or_default(),
                job.as_ref().map_or(0, |job| job.progress.min(100)),
                Some(failure.clone()),
            ),
        };

        AppViewModel {
            phase: self.phase(),
            job_id,
            stage: self.stage(),
            step,
            progress,
            error,
            rejection: self.rejection.as_ref().map(ToString::to_string),
            exploration: self.session().map(ExplorationView::of),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_live(&self, ticket: Ticket) -> bool {
        self.pipeline.live_ticket() == Some(ticket)
    }

    pub(crate) fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    pub(crate) fn set_pipeline(&mut self, pipeline: Pipeline) {
        self.pipeline = pipeline;
        self.mark_dirty();
    }

    pub(crate) fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut ExplorationSession> {
        match &mut self.pipeline {
            Pipeline::Succeeded { session, .. } => Some(&mut **session),
            _ => None,
        }
    }

    pub(crate) fn set_rejection(&mut self, rejection: Option<UploadError>) {
        if self.rejection != rejection {
            self.rejection = rejection;
            self.mark_dirty();
        }
    }

    /// Moves the pipeline out, leaving `Idle` in its place.
    pub(crate) fn take_pipeline(&mut self) -> Pipeline {
        std::mem::take(&mut self.pipeline)
    }
}
