use crate::{DocumentUpload, JobId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitDocument {
        ticket: Ticket,
        upload: DocumentUpload,
    },
    /// Start the poll loop for `job_id`, replacing any loop still running.
    StartPolling { ticket: Ticket, job_id: JobId },
    /// Stop the poll loop for `ticket` if it is still running.
    StopPolling { ticket: Ticket },
    FetchResult { ticket: Ticket, job_id: JobId },
}
