mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{network_error, report, RecordingSink, ScriptedClient};
use gazette_core::{JobId, JobStatus, JobStatusReport};
use gazette_engine::{poll_job, EngineEvent, PollExit, PollSettings};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn fast(max_consecutive_failures: Option<u32>) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(5),
        max_consecutive_failures,
    }
}

fn failed_report() -> JobStatusReport {
    let mut failed = report(JobStatus::Failed, "Failed", 30);
    failed.error = Some("Corrupt PDF".to_string());
    failed
}

fn statuses(events: &[EngineEvent]) -> Vec<JobStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Status { report, .. } => Some(report.status),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn polls_until_completed_and_reports_every_status() {
    let client = ScriptedClient::new(vec![
        Ok(report(JobStatus::Pending, "Initializing...", 0)),
        Ok(report(JobStatus::Processing, "Extracting text from PDF...", 10)),
        Ok(report(JobStatus::Completed, "Completed", 100)),
    ]);
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();

    let exit = poll_job(&client, 4, &JobId::new("abc"), &fast(None), &sink, &cancel).await;

    assert_eq!(exit, PollExit::Terminal(JobStatus::Completed));
    assert_eq!(client.status_calls(), 3);
    let events = sink.take();
    assert_eq!(
        statuses(&events),
        vec![JobStatus::Pending, JobStatus::Processing, JobStatus::Completed]
    );
    assert!(events
        .iter()
        .all(|event| matches!(event, EngineEvent::Status { ticket: 4, .. })));
}

#[tokio::test]
async fn failed_job_is_terminal() {
    let client = ScriptedClient::new(vec![Ok(failed_report())]);
    let sink = RecordingSink::default();

    let exit = poll_job(
        &client,
        1,
        &JobId::new("abc"),
        &fast(None),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(exit, PollExit::Terminal(JobStatus::Failed));
    assert_eq!(client.status_calls(), 1);
}

#[tokio::test]
async fn transient_errors_are_swallowed_without_a_limit() {
    let client = ScriptedClient::new(vec![
        Err(network_error()),
        Err(network_error()),
        Err(network_error()),
        Ok(report(JobStatus::Completed, "Completed", 100)),
    ]);
    let sink = RecordingSink::default();

    let exit = poll_job(
        &client,
        1,
        &JobId::new("abc"),
        &fast(None),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(exit, PollExit::Terminal(JobStatus::Completed));
    assert_eq!(client.status_calls(), 4);
    assert_eq!(statuses(&sink.take()), vec![JobStatus::Completed]);
}

#[tokio::test]
async fn gives_up_after_consecutive_failures() {
    let client = ScriptedClient::new(vec![
        Err(network_error()),
        Ok(report(JobStatus::Processing, "Detecting articles...", 40)),
        Err(network_error()),
        Err(network_error()),
        Ok(report(JobStatus::Completed, "Completed", 100)),
    ]);
    let sink = RecordingSink::default();

    let exit = poll_job(
        &client,
        9,
        &JobId::new("abc"),
        &fast(Some(2)),
        &sink,
        &CancellationToken::new(),
    )
    .await;

    // The success in between resets the counter.
    assert_eq!(exit, PollExit::Abandoned { failures: 2 });
    assert_eq!(client.status_calls(), 4);
    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        EngineEvent::PollAbandoned {
            ticket: 9,
            failures: 2
        }
    );
}

#[tokio::test]
async fn cancelled_before_first_tick_never_calls_backend() {
    let client = ScriptedClient::endless();
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let exit = poll_job(&client, 1, &JobId::new("abc"), &fast(None), &sink, &cancel).await;

    assert_eq!(exit, PollExit::Cancelled);
    assert_eq!(client.status_calls(), 0);
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn response_in_flight_at_cancellation_is_discarded() {
    let client = Arc::new(ScriptedClient::endless().with_delay(Duration::from_millis(200)));
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();

    let task = {
        let client = client.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            poll_job(
                client.as_ref(),
                1,
                &JobId::new("abc"),
                &fast(None),
                &sink,
                &cancel,
            )
            .await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(client.status_calls(), 1);
    cancel.cancel();

    let exit = task.await.unwrap();
    assert_eq!(exit, PollExit::Cancelled);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(client.status_calls(), 1);
    assert!(sink.take().is_empty());
}
