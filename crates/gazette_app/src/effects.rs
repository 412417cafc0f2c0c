use std::sync::Arc;
use std::time::Duration;

use gazette_core::{Effect, Msg};
use gazette_engine::{EngineEvent, EngineHandle, EngineStopped, JobClient, PollSettings};
use gazette_logging::{gazette_debug, gazette_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn JobClient>, settings: PollSettings) -> Self {
        Self {
            engine: EngineHandle::new(client, settings),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitDocument { ticket, upload } => {
                    gazette_debug!("SubmitDocument ticket={} file={}", ticket, upload.file_name);
                    self.engine.submit(ticket, upload);
                }
                Effect::StartPolling { ticket, job_id } => {
                    self.engine.start_polling(ticket, job_id);
                }
                Effect::StopPolling { ticket } => {
                    self.engine.stop_polling(ticket);
                }
                Effect::FetchResult { ticket, job_id } => {
                    gazette_debug!("FetchResult ticket={} job_id={}", ticket, job_id);
                    self.engine.fetch_result(ticket, job_id);
                }
            }
        }
    }

    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(event_to_msg))
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { ticket, result } => match result {
            Ok(receipt) => Msg::JobAccepted {
                ticket,
                job_id: receipt.job_id,
            },
            Err(err) => {
                gazette_warn!("Upload for ticket {} failed: {}", ticket, err);
                Msg::SubmitFailed {
                    ticket,
                    detail: err.detail,
                }
            }
        },
        EngineEvent::Status { ticket, report } => Msg::StatusReceived { ticket, report },
        EngineEvent::PollAbandoned { ticket, failures } => {
            Msg::PollingAbandoned { ticket, failures }
        }
        EngineEvent::ResultFetched { ticket, result } => match result {
            Ok(result) => Msg::ResultReceived { ticket, result },
            Err(err) => Msg::ResultFetchFailed {
                ticket,
                reason: err.to_string(),
            },
        },
    }
}
