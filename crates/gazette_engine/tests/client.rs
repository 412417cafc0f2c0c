use std::time::Duration;

use gazette_core::{DocumentUpload, JobId, JobStatus};
use gazette_engine::{ClientErrorKind, ClientSettings, JobClient, ReqwestJobClient};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestJobClient {
    ReqwestJobClient::new(&ClientSettings {
        base_url: format!("{}/api", server.uri()),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn submit_uploads_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-pdf"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"gazette.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "5f0c",
            "message": "PDF uploaded successfully. Processing started."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = DocumentUpload::new("gazette.pdf", b"%PDF-1.4 body".to_vec());
    let receipt = client_for(&server).submit(&upload).await.expect("submit");
    assert_eq!(receipt.job_id, JobId::new("5f0c"));
}

#[tokio::test]
async fn rejected_upload_carries_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-pdf"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Only PDF files are allowed" })),
        )
        .mount(&server)
        .await;

    let upload = DocumentUpload::new("gazette.pdf", b"%PDF-1.4".to_vec());
    let err = client_for(&server).submit(&upload).await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::HttpStatus(400));
    assert_eq!(err.detail.as_deref(), Some("Only PDF files are allowed"));
}

#[tokio::test]
async fn error_without_json_body_has_no_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .status(&JobId::new("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::HttpStatus(502));
    assert_eq!(err.detail, None);
}

#[tokio::test]
async fn status_decodes_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc",
            "status": "processing",
            "step": "Extracting keywords...",
            "progress": 60,
            "error": null
        })))
        .mount(&server)
        .await;

    let report = client_for(&server)
        .status(&JobId::new("abc"))
        .await
        .expect("status");
    assert_eq!(report.status, JobStatus::Processing);
    assert_eq!(report.step, "Extracting keywords...");
    assert_eq!(report.progress, 60);
    assert_eq!(report.error, None);
}

#[tokio::test]
async fn malformed_status_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "exploded" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .status(&JobId::new("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Decode);
}

#[tokio::test]
async fn result_decodes_articles_and_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/result/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc",
            "pages": 2,
            "articles": [{
                "article_id": "abc_1",
                "page": 1,
                "title": "Harbour reopens",
                "content": "The harbour reopened on Monday.",
                "summary": "",
                "keywords": ["harbour", "shipping"],
                "hashtags": ["#harbour"],
                "crop_image_base64": "",
                "related_articles": [],
                "created_at": "2024-03-01T10:15:00.123456"
            }],
            "keywords_summary": [{ "keyword": "harbour", "count": 1 }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .result(&JobId::new("abc"))
        .await
        .expect("result");
    assert_eq!(result.pages, 2);
    assert_eq!(result.articles.len(), 1);
    let article = &result.articles[0];
    assert_eq!(article.title, "Harbour reopens");
    assert_eq!(article.crop_image, None);
    assert!(article.created_at.is_some());
    assert_eq!(result.keywords_summary[0].count, 1);
}

#[tokio::test]
async fn keyword_path_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/keywords/city%20council/articles"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let articles = client_for(&server)
        .articles_for_keyword("city council", 20)
        .await
        .expect("keyword articles");
    assert!(articles.is_empty());
}

#[tokio::test]
async fn search_posts_query_and_keeps_snippets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({ "query": "harbour", "limit": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "article_id": "abc_1",
            "title": "Harbour reopens",
            "snippet": "The harbour reopened on Monday after...",
            "keywords": ["harbour"],
            "crop_image_base64": "",
            "page": 1,
            "relevance_score": 0.82
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client_for(&server)
        .search("harbour", 10)
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].snippet, "The harbour reopened on Monday after...");
    assert_eq!(hits[0].relevance_score, 0.82);
    assert_eq!(hits[0].crop_image, None);
}

#[tokio::test]
async fn missing_article_is_http_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Article not found" })))
        .mount(&server)
        .await;

    let err = client_for(&server).article("nope").await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::HttpStatus(404));
    assert_eq!(err.detail.as_deref(), Some("Article not found"));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "pending" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(&ClientSettings {
        base_url: format!("{}/api", server.uri()),
        request_timeout: Duration::from_millis(200),
        ..ClientSettings::default()
    })
    .expect("client");
    let err = client.status(&JobId::new("abc")).await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Timeout);
}

#[test]
fn unusable_base_url_is_rejected() {
    for base_url in ["not a url", "mailto:desk@example.com"] {
        let err = ReqwestJobClient::new(&ClientSettings {
            base_url: base_url.to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::InvalidUrl);
    }
}
