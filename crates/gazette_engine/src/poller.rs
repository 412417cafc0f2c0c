use std::time::Duration;

use gazette_core::{JobId, JobStatus, Ticket};
use gazette_logging::{gazette_debug, gazette_warn};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobClient};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    /// Give up after this many status failures in a row. `None` keeps
    /// polling through any number of transient errors.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_consecutive_failures: None,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Cancelled,
    Terminal(JobStatus),
    Abandoned { failures: u32 },
}

/// Polls one job until it reaches a terminal status, the failure limit is
/// hit, or `cancel` fires.
///
/// Each tick waits the interval and then awaits the status request, so the
/// next tick never starts before the previous response settled. Once
/// cancelled nothing more is emitted, including a response that was already
/// in flight.
pub async fn poll_job(
    client: &dyn JobClient,
    ticket: Ticket,
    job_id: &JobId,
    settings: &PollSettings,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> PollExit {
    let mut failures = 0u32;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollExit::Cancelled,
            _ = tokio::time::sleep(settings.interval) => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollExit::Cancelled,
            outcome = client.status(job_id) => outcome,
        };
        if cancel.is_cancelled() {
            return PollExit::Cancelled;
        }

        match outcome {
            Ok(report) => {
                failures = 0;
                let status = report.status;
                gazette_debug!(
                    "Job {} status {:?} step {:?} progress {}",
                    job_id,
                    status,
                    report.step,
                    report.progress
                );
                sink.emit(EngineEvent::Status { ticket, report });
                if status.is_terminal() {
                    return PollExit::Terminal(status);
                }
            }
            Err(err) => {
                failures += 1;
                gazette_warn!(
                    "Status check for job {} failed ({} in a row): {}",
                    job_id,
                    failures,
                    err
                );
                if settings
                    .max_consecutive_failures
                    .is_some_and(|limit| failures >= limit)
                {
                    sink.emit(EngineEvent::PollAbandoned { ticket, failures });
                    return PollExit::Abandoned { failures };
                }
            }
        }
    }
}
