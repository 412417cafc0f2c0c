use gazette_logging::{gazette_debug, gazette_info, gazette_warn};

use crate::state::{JOB_FAILED_FALLBACK, RESULT_FETCH_FAILED, SUBMISSION_FALLBACK};
use crate::{
    map_stage, validate_upload, AppState, ArticleIndex, Effect, ExplorationSession, Failure,
    FailureKind, Job, JobStatus, Msg, Pipeline, Ticket,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSubmitted(upload) => {
            if let Err(rejection) = validate_upload(&upload) {
                gazette_info!("Rejected {}: {}", upload.file_name, rejection);
                state.set_rejection(Some(rejection));
                return (state, Vec::new());
            }
            state.set_rejection(None);

            // Only one job per session: a new submission supersedes the live one.
            let mut effects = Vec::with_capacity(2);
            if let Pipeline::Polling { ticket, .. } = state.pipeline() {
                effects.push(Effect::StopPolling { ticket: *ticket });
            }
            let ticket = state.next_ticket();
            gazette_info!(
                "Submitting {} ({} bytes) as ticket {}",
                upload.file_name,
                upload.size(),
                ticket
            );
            state.set_pipeline(Pipeline::Submitting {
                ticket,
                file_name: upload.file_name.clone(),
            });
            effects.push(Effect::SubmitDocument { ticket, upload });
            effects
        }
        Msg::JobAccepted { ticket, job_id } => {
            if !accept_live(&state, ticket, "JobAccepted") {
                return (state, Vec::new());
            }
            if job_id.is_empty() {
                gazette_warn!("Backend accepted ticket {} without a job id", ticket);
                state.set_pipeline(Pipeline::Failed {
                    job: None,
                    failure: Failure::new(FailureKind::Submission, SUBMISSION_FALLBACK),
                });
                return (state, Vec::new());
            }
            gazette_info!("Ticket {} accepted as job {}", ticket, job_id);
            state.set_pipeline(Pipeline::Polling {
                ticket,
                job: Job::accepted(job_id.clone()),
            });
            vec![Effect::StartPolling { ticket, job_id }]
        }
        Msg::SubmitFailed { ticket, detail } => {
            if !accept_live(&state, ticket, "SubmitFailed") {
                return (state, Vec::new());
            }
            let message = non_empty(detail).unwrap_or_else(|| SUBMISSION_FALLBACK.to_string());
            gazette_warn!("Upload for ticket {} failed: {}", ticket, message);
            state.set_pipeline(Pipeline::Failed {
                job: None,
                failure: Failure::new(FailureKind::Submission, message),
            });
            Vec::new()
        }
        Msg::StatusReceived { ticket, report } => {
            if !accept_live(&state, ticket, "StatusReceived") {
                return (state, Vec::new());
            }
            let Pipeline::Polling { job, .. } = state.pipeline_mut() else {
                gazette_debug!("Status for ticket {} arrived before the job id", ticket);
                return (state, Vec::new());
            };
            if job.status == JobStatus::Completed {
                // Result fetch already issued; later ticks are irrelevant.
                return (state, Vec::new());
            }
            let previous_stage = map_stage(&job.step, job.progress);
            job.apply(report);
            let stage = map_stage(&job.step, job.progress);
            if stage != previous_stage {
                gazette_debug!("Job {} moved to stage {:?}", job.job_id, stage);
            }
            let (status, job_id) = (job.status, job.job_id.clone());
            state.mark_dirty();
            match status {
                JobStatus::Completed => {
                    gazette_info!("Job {} completed; fetching result", job_id);
                    vec![
                        Effect::StopPolling { ticket },
                        Effect::FetchResult { ticket, job_id },
                    ]
                }
                JobStatus::Failed => {
                    let job = match state.take_pipeline() {
                        Pipeline::Polling { job, .. } => job,
                        other => {
                            state.set_pipeline(other);
                            return (state, Vec::new());
                        }
                    };
                    let message = non_empty(job.error.clone())
                        .unwrap_or_else(|| JOB_FAILED_FALLBACK.to_string());
                    gazette_warn!("Job {} failed: {}", job.job_id, message);
                    state.set_pipeline(Pipeline::Failed {
                        job: Some(job),
                        failure: Failure::new(FailureKind::JobReported, message),
                    });
                    vec![Effect::StopPolling { ticket }]
                }
                JobStatus::Pending | JobStatus::Processing => Vec::new(),
            }
        }
        Msg::ResultReceived { ticket, result } => {
            if !accept_live(&state, ticket, "ResultReceived") {
                return (state, Vec::new());
            }
            match state.take_pipeline() {
                Pipeline::Polling { job, .. } if job.status == JobStatus::Completed => {
                    if result.job_id != job.job_id {
                        gazette_warn!(
                            "Result for job {} carries job id {}",
                            job.job_id,
                            result.job_id
                        );
                    }
                    gazette_info!(
                        "Job {} loaded: {} articles across {} pages",
                        job.job_id,
                        result.articles.len(),
                        result.pages
                    );
                    let session = ExplorationSession::new(ArticleIndex::build(*result));
                    state.set_pipeline(Pipeline::Succeeded {
                        job,
                        session: Box::new(session),
                    });
                }
                other => {
                    gazette_debug!("Result for ticket {} arrived before completion", ticket);
                    state.set_pipeline(other);
                }
            }
            Vec::new()
        }
        Msg::ResultFetchFailed { ticket, reason } => {
            if !accept_live(&state, ticket, "ResultFetchFailed") {
                return (state, Vec::new());
            }
            gazette_warn!("Fetching result for ticket {} failed: {}", ticket, reason);
            let job = match state.take_pipeline() {
                Pipeline::Polling { job, .. } => Some(job),
                _ => None,
            };
            state.set_pipeline(Pipeline::Failed {
                job,
                failure: Failure::new(FailureKind::ResultFetch, RESULT_FETCH_FAILED),
            });
            Vec::new()
        }
        Msg::PollingAbandoned { ticket, failures } => {
            if !accept_live(&state, ticket, "PollingAbandoned") {
                return (state, Vec::new());
            }
            let job = match state.take_pipeline() {
                Pipeline::Polling { job, .. } => Some(job),
                _ => None,
            };
            let message = format!(
                "Lost contact with the processing service after {failures} failed status checks"
            );
            gazette_warn!("{}", message);
            state.set_pipeline(Pipeline::Failed {
                job,
                failure: Failure::new(FailureKind::PollingAbandoned, message),
            });
            vec![Effect::StopPolling { ticket }]
        }
        Msg::SearchChanged(query) => {
            if let Some(session) = state.session_mut() {
                if session.search(query) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::KeywordToggled(keyword) => {
            with_session(&mut state, |session| session.select_keyword(&keyword));
            Vec::new()
        }
        Msg::KeywordModalOpened(keyword) => {
            with_session(&mut state, |session| session.open_keyword_modal(&keyword));
            Vec::new()
        }
        Msg::KeywordModalClosed => {
            with_session(&mut state, ExplorationSession::close_keyword_modal);
            Vec::new()
        }
        Msg::ArticleOpened(article_id) => {
            if let Some(session) = state.session_mut() {
                if session.open_article_detail(&article_id) {
                    state.mark_dirty();
                } else {
                    gazette_debug!("Ignoring unknown article {}", article_id);
                }
            }
            Vec::new()
        }
        Msg::ArticleClosed => {
            with_session(&mut state, ExplorationSession::close_article_detail);
            Vec::new()
        }
        Msg::ResetClicked => {
            let effects = match state.pipeline().live_ticket() {
                Some(ticket) => vec![Effect::StopPolling { ticket }],
                None => Vec::new(),
            };
            state.set_rejection(None);
            if state.pipeline() != &Pipeline::Idle {
                gazette_info!("Session reset");
                state.set_pipeline(Pipeline::Idle);
            }
            effects
        }
    };

    (state, effects)
}

/// Responses for anything but the live ticket belong to a superseded job.
fn accept_live(state: &AppState, ticket: Ticket, what: &str) -> bool {
    let live = state.is_live(ticket);
    if !live {
        gazette_debug!("Dropping stale {} for ticket {}", what, ticket);
    }
    live
}

fn with_session(state: &mut AppState, apply: impl FnOnce(&mut ExplorationSession)) {
    if let Some(session) = state.session_mut() {
        apply(session);
        state.mark_dirty();
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}
