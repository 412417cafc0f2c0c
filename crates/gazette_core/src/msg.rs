use crate::{DocumentUpload, JobId, JobStatusReport, ProcessResult, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a document to process.
    DocumentSubmitted(DocumentUpload),
    /// Backend accepted the upload.
    JobAccepted { ticket: Ticket, job_id: JobId },
    /// Upload was rejected or never reached the backend.
    SubmitFailed {
        ticket: Ticket,
        /// `detail` field of the backend's error body, if any.
        detail: Option<String>,
    },
    /// A poll tick returned a status.
    StatusReceived {
        ticket: Ticket,
        report: JobStatusReport,
    },
    /// Result of a completed job.
    ResultReceived {
        ticket: Ticket,
        result: Box<ProcessResult>,
    },
    ResultFetchFailed { ticket: Ticket, reason: String },
    /// Too many consecutive status checks failed.
    PollingAbandoned { ticket: Ticket, failures: u32 },
    /// User edited the search box.
    SearchChanged(String),
    /// User clicked a keyword filter chip.
    KeywordToggled(String),
    /// User clicked a keyword on an article card.
    KeywordModalOpened(String),
    KeywordModalClosed,
    ArticleOpened(String),
    ArticleClosed,
    /// User asked to process another document.
    ResetClicked,
}
