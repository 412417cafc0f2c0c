use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gazette_core::{DocumentUpload, JobId, Ticket};
use gazette_logging::{gazette_debug, gazette_info, gazette_warn};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::poller::{poll_job, ChannelEventSink, EventSink, PollSettings};
use crate::{EngineEvent, EngineStopped, JobClient};

enum EngineCommand {
    Submit {
        ticket: Ticket,
        upload: DocumentUpload,
    },
    StartPolling {
        ticket: Ticket,
        job_id: JobId,
    },
    StopPolling {
        ticket: Ticket,
    },
    FetchResult {
        ticket: Ticket,
        job_id: JobId,
    },
}

/// Runs backend requests on a background runtime and reports back through
/// [`EngineEvent`]s.
///
/// At most one poll loop runs at a time. Starting a new one, stopping it, or
/// dropping the handle cancels the running loop.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn JobClient>, settings: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let root = shutdown.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut worker = Worker {
                client,
                settings,
                sink: Arc::new(ChannelEventSink::new(event_tx)),
                root,
                active: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                worker.handle(&runtime, command);
            }
            // Handle dropped: cancel the loop before the runtime goes away.
            worker.active = None;
            gazette_debug!("Engine worker stopped");
        });

        Self {
            cmd_tx,
            event_rx,
            shutdown,
        }
    }

    pub fn submit(&self, ticket: Ticket, upload: DocumentUpload) {
        self.send(EngineCommand::Submit { ticket, upload });
    }

    pub fn start_polling(&self, ticket: Ticket, job_id: JobId) {
        self.send(EngineCommand::StartPolling { ticket, job_id });
    }

    pub fn stop_polling(&self, ticket: Ticket) {
        self.send(EngineCommand::StopPolling { ticket });
    }

    pub fn fetch_result(&self, ticket: Ticket, job_id: JobId) {
        self.send(EngineCommand::FetchResult { ticket, job_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time; an error means the worker has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        recv_event(&self.event_rx, timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            gazette_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct ActivePoll {
    ticket: Ticket,
    _guard: DropGuard,
}

struct Worker {
    client: Arc<dyn JobClient>,
    settings: PollSettings,
    sink: Arc<dyn EventSink>,
    root: CancellationToken,
    active: Option<ActivePoll>,
}

impl Worker {
    fn handle(&mut self, runtime: &tokio::runtime::Runtime, command: EngineCommand) {
        match command {
            EngineCommand::Submit { ticket, upload } => {
                let client = self.client.clone();
                let sink = self.sink.clone();
                let cancel = self.root.clone();
                runtime.spawn(async move {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return,
                        result = client.submit(&upload) => result,
                    };
                    sink.emit(EngineEvent::Submitted { ticket, result });
                });
            }
            EngineCommand::StartPolling { ticket, job_id } => {
                let cancel = self.root.child_token();
                // Replacing the previous entry drops its guard and cancels it.
                self.active = Some(ActivePoll {
                    ticket,
                    _guard: cancel.clone().drop_guard(),
                });
                gazette_info!("Polling job {} for ticket {}", job_id, ticket);

                let client = self.client.clone();
                let sink = self.sink.clone();
                let settings = self.settings.clone();
                runtime.spawn(async move {
                    let exit = poll_job(
                        client.as_ref(),
                        ticket,
                        &job_id,
                        &settings,
                        sink.as_ref(),
                        &cancel,
                    )
                    .await;
                    gazette_debug!("Poll loop for job {} ended: {:?}", job_id, exit);
                });
            }
            EngineCommand::StopPolling { ticket } => {
                if self.active.as_ref().is_some_and(|poll| poll.ticket == ticket) {
                    gazette_debug!("Stopping poll loop for ticket {}", ticket);
                    self.active = None;
                }
            }
            EngineCommand::FetchResult { ticket, job_id } => {
                let client = self.client.clone();
                let sink = self.sink.clone();
                let cancel = self.root.clone();
                runtime.spawn(async move {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return,
                        result = client.result(&job_id) => result,
                    };
                    sink.emit(EngineEvent::ResultFetched {
                        ticket,
                        result: result.map(Box::new),
                    });
                });
            }
        }
    }
}

fn recv_event(
    rx: &mpsc::Receiver<EngineEvent>,
    timeout: Duration,
) -> Result<Option<EngineEvent>, EngineStopped> {
    match rx.recv_timeout(timeout) {
        Ok(event) => Ok(Some(event)),
        Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
    }
}
