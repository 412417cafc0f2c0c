//! Gazette engine: backend requests, status polling and effect execution.
mod client;
mod engine;
mod poller;
mod types;

pub use client::{ClientSettings, JobClient, ReqwestJobClient, DEFAULT_API_URL};
pub use engine::EngineHandle;
pub use poller::{poll_job, ChannelEventSink, EventSink, PollExit, PollSettings};
pub use types::{ClientError, ClientErrorKind, EngineEvent, EngineStopped};
