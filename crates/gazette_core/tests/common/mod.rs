#![allow(dead_code)]

use gazette_core::{
    update, AppState, Article, DocumentUpload, Effect, JobId, JobStatus, JobStatusReport,
    KeywordSummary, Msg, ProcessResult, Ticket,
};

pub fn init_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(gazette_logging::initialize_for_tests);
}

pub fn article(id: &str, title: &str, content: &str, keywords: &[&str]) -> Article {
    Article {
        article_id: id.to_string(),
        page: 1,
        title: title.to_string(),
        content: content.to_string(),
        summary: String::new(),
        keywords: keywords.iter().map(|kw| kw.to_string()).collect(),
        hashtags: keywords.iter().map(|kw| format!("#{}", kw.replace(' ', ""))).collect(),
        crop_image: None,
        related_articles: Vec::new(),
        created_at: None,
    }
}

pub fn result_with(articles: Vec<Article>, summary: &[(&str, u32)]) -> ProcessResult {
    ProcessResult {
        job_id: JobId::new("job-1"),
        pages: 4,
        articles,
        keywords_summary: summary
            .iter()
            .map(|(keyword, count)| KeywordSummary {
                keyword: keyword.to_string(),
                count: *count,
            })
            .collect(),
    }
}

/// Four pages, twelve articles; every third article is about the election.
pub fn newspaper() -> ProcessResult {
    let articles = (1..=12)
        .map(|n| {
            let mut keywords = vec!["city council"];
            if n % 3 == 0 {
                keywords.push("Election");
            }
            if n % 4 == 0 {
                keywords.push("sports");
            }
            let mut article = article(
                &format!("job-1_{n}"),
                &format!("Story number {n}"),
                &format!("Body text of story {n}."),
                &keywords,
            );
            article.page = (n - 1) / 3 + 1;
            article
        })
        .collect();
    result_with(
        articles,
        &[("city council", 12), ("election", 5), ("sports", 3)],
    )
}

pub fn pdf(size: usize) -> DocumentUpload {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(size.max(bytes.len()), b' ');
    DocumentUpload::new("paper.pdf", bytes)
}

pub fn status(status: JobStatus, step: &str, progress: u32) -> JobStatusReport {
    JobStatusReport {
        status,
        step: step.to_string(),
        progress,
        error: None,
    }
}

pub fn ticket_of(effects: &[Effect]) -> Ticket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitDocument { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("submit effect")
}

/// Submits a small PDF and has the backend accept it as `job-1`.
pub fn polling_state() -> (AppState, Ticket) {
    let (state, effects) = update(AppState::new(), Msg::DocumentSubmitted(pdf(2 * 1024 * 1024)));
    let ticket = ticket_of(&effects);
    let (state, _) = update(
        state,
        Msg::JobAccepted {
            ticket,
            job_id: JobId::new("job-1"),
        },
    );
    (state, ticket)
}

/// Drives a job all the way to a loaded result.
pub fn explored_state(result: ProcessResult) -> AppState {
    let (state, ticket) = polling_state();
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            ticket,
            report: status(JobStatus::Completed, "Completed", 100),
        },
    );
    let (state, _) = update(
        state,
        Msg::ResultReceived {
            ticket,
            result: Box::new(result),
        },
    );
    state
}
