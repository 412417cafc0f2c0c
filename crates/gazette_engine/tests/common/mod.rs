#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gazette_core::{
    Article, DocumentUpload, JobId, JobStatus, JobStatusReport, ProcessResult, SearchHit,
    SubmitReceipt,
};
use gazette_engine::{ClientError, ClientErrorKind, EngineEvent, EventSink, JobClient};

pub fn report(status: JobStatus, step: &str, progress: u32) -> JobStatusReport {
    JobStatusReport {
        status,
        step: step.to_string(),
        progress,
        error: None,
    }
}

pub fn network_error() -> ClientError {
    ClientError {
        kind: ClientErrorKind::Network,
        message: "connection refused".to_string(),
        detail: None,
    }
}

pub fn empty_result(job_id: &str) -> ProcessResult {
    ProcessResult {
        job_id: JobId::new(job_id),
        pages: 1,
        articles: Vec::new(),
        keywords_summary: Vec::new(),
    }
}

/// Status responses are served from a script; once it runs dry every call
/// reports `processing`.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<JobStatusReport, ClientError>>>,
    status_calls: AtomicUsize,
    polled_jobs: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<JobStatusReport, ClientError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn endless() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn polled_jobs(&self) -> Vec<String> {
        self.polled_jobs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl JobClient for ScriptedClient {
    async fn submit(&self, upload: &DocumentUpload) -> Result<SubmitReceipt, ClientError> {
        Ok(SubmitReceipt {
            job_id: JobId::new(format!("job-for-{}", upload.file_name)),
            message: "accepted".to_string(),
        })
    }

    async fn status(&self, job_id: &JobId) -> Result<JobStatusReport, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_jobs
            .lock()
            .unwrap()
            .push(job_id.as_str().to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(report(JobStatus::Processing, "Extracting keywords...", 50)))
    }

    async fn result(&self, job_id: &JobId) -> Result<ProcessResult, ClientError> {
        Ok(empty_result(job_id.as_str()))
    }

    async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<SearchHit>, ClientError> {
        Ok(Vec::new())
    }

    async fn articles_for_keyword(
        &self,
        _keyword: &str,
        _limit: u32,
    ) -> Result<Vec<Article>, ClientError> {
        Ok(Vec::new())
    }

    async fn article(&self, _article_id: &str) -> Result<Article, ClientError> {
        Err(ClientError {
            kind: ClientErrorKind::HttpStatus(404),
            message: "404 Not Found".to_string(),
            detail: Some("Article not found".to_string()),
        })
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
