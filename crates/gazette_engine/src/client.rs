use std::time::Duration;

use gazette_core::{
    Article, DocumentUpload, JobId, JobStatusReport, ProcessResult, SearchHit, SubmitReceipt,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{ClientError, ClientErrorKind};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Request layer for the processing backend. Holds no job state.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    async fn submit(&self, upload: &DocumentUpload) -> Result<SubmitReceipt, ClientError>;

    async fn status(&self, job_id: &JobId) -> Result<JobStatusReport, ClientError>;

    async fn result(&self, job_id: &JobId) -> Result<ProcessResult, ClientError>;

    /// Backend-side search across every stored article.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, ClientError>;

    async fn articles_for_keyword(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<Article>, ClientError>;

    async fn article(&self, article_id: &str) -> Result<Article, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(ClientErrorKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::new(
                ClientErrorKind::InvalidUrl,
                format!("{base_url} cannot be used as an API base"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(ClientErrorKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::new(ClientErrorKind::InvalidUrl, "base url cannot hold a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(ClientError::new(
                ClientErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_detail(error_detail(&body)));
        }

        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(ClientErrorKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn submit(&self, upload: &DocumentUpload) -> Result<SubmitReceipt, ClientError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|err| ClientError::new(ClientErrorKind::Network, err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = self.endpoint(&["process-pdf"])?;
        self.send_json(self.client.post(url).multipart(form)).await
    }

    async fn status(&self, job_id: &JobId) -> Result<JobStatusReport, ClientError> {
        let url = self.endpoint(&["status", job_id.as_str()])?;
        self.send_json(self.client.get(url)).await
    }

    async fn result(&self, job_id: &JobId) -> Result<ProcessResult, ClientError> {
        let url = self.endpoint(&["result", job_id.as_str()])?;
        self.send_json(self.client.get(url)).await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, ClientError> {
        let url = self.endpoint(&["search"])?;
        let body = serde_json::json!({ "query": query, "limit": limit }).to_string();
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send_json(request).await
    }

    async fn articles_for_keyword(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<Article>, ClientError> {
        let mut url = self.endpoint(&["keywords", keyword, "articles"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.send_json(self.client.get(url)).await
    }

    async fn article(&self, article_id: &str) -> Result<Article, ClientError> {
        let url = self.endpoint(&["articles", article_id])?;
        self.send_json(self.client.get(url)).await
    }
}

/// Pulls FastAPI's `{"detail": "..."}` out of an error body. Non-string
/// details (validation error lists) are ignored.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(ClientErrorKind::Timeout, err.to_string());
    }
    ClientError::new(ClientErrorKind::Network, err.to_string())
}
