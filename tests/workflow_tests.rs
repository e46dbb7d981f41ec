// End-to-end tests for the workflow controller
//
// A scripted capture device plus a stub HTTP backend exercise the full
// capture → transcribe → optimize flow, including the failure paths
// that must leave committed state untouched.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use common::{spawn_backend, ScriptedDevice};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use triage_voice::{
    BackendClient, ErrorKind, SessionState, WorkflowController, WorkflowPhase,
};

fn controller(base_url: &str, chunks: Vec<Vec<u8>>) -> Result<WorkflowController> {
    let client = BackendClient::new(base_url, Duration::from_secs(5))?;
    Ok(WorkflowController::new(
        Box::new(ScriptedDevice::new(chunks)),
        client,
        vec!["audio/wav".to_string()],
    ))
}

fn schedule_payload() -> Value {
    json!({
        "schedule": [
            {
                "scan_id": "S-1",
                "scan_type": "MRI knee",
                "duration": 45,
                "priority": 2,
                "patient_id": "P-3",
                "start_time": "2024-05-06 11:15",
                "machine": "MRI-1"
            }
        ]
    })
}

#[tokio::test]
async fn test_full_workflow_commits_transcript_and_schedule() -> Result<()> {
    let router = Router::new()
        .route(
            "/record",
            post(|| async { Json(json!({ "transcription": "schedule an MRI for patient three" })) }),
        )
        .route(
            "/optimize",
            post(|Json(_body): Json<Value>| async move { Json(schedule_payload()) }),
        );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec(), vec![1u8; 512]])?;

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;

    assert_eq!(
        controller.transcript_text(),
        Some("schedule an MRI for patient three")
    );

    controller.optimize().await?;

    let rows = controller.schedule().expect("schedule rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].check_in_date, "2024-05-06");
    assert_eq!(rows[0].check_in_time, "11:15");
    assert_eq!(rows[0].unit, "MRI-1");

    let status = controller.status();
    assert_eq!(status.session_state, SessionState::Ready);
    assert_eq!(status.phase, WorkflowPhase::Idle);
    assert_eq!(status.schedule_rows, 1);
    assert!(status.last_error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_transcription_failure_preserves_committed_transcript() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let router = Router::new().route(
        "/record",
        post(move || {
            let hits = Arc::clone(&handler_hits);
            async move {
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    Json(json!({ "transcription": "first pass" })).into_response()
                } else {
                    (StatusCode::BAD_GATEWAY, "transcriber offline").into_response()
                }
            }
        }),
    );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;
    assert_eq!(controller.transcript_text(), Some("first pass"));

    // Same finalized buffer, failing endpoint: the committed transcript
    // must survive.
    let err = controller.transcribe().await.expect_err("5xx must fail");
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(controller.transcript_text(), Some("first pass"));
    assert!(controller.last_error().is_some());

    Ok(())
}

#[tokio::test]
async fn test_optimize_failure_preserves_previous_rows() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let router = Router::new()
        .route(
            "/record",
            post(|| async { Json(json!({ "transcription": "book the scans" })) }),
        )
        .route(
            "/optimize",
            post(move |Json(_body): Json<Value>| {
                let hits = Arc::clone(&handler_hits);
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        Json(schedule_payload()).into_response()
                    } else {
                        (StatusCode::INTERNAL_SERVER_ERROR, "optimizer crashed").into_response()
                    }
                }
            }),
        );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;
    controller.optimize().await?;

    let before = controller.schedule().expect("schedule rows").to_vec();
    assert_eq!(before.len(), 1);

    let err = controller.optimize().await.expect_err("5xx must fail");
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(controller.schedule().expect("schedule rows"), before.as_slice());

    let status = controller.status();
    assert_eq!(status.schedule_rows, 1);
    assert!(status.last_error.expect("error surfaced").contains("500"));

    Ok(())
}

#[tokio::test]
async fn test_invalid_schedule_shape_preserves_previous_rows() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let router = Router::new()
        .route(
            "/record",
            post(|| async { Json(json!({ "transcription": "book the scans" })) }),
        )
        .route(
            "/optimize",
            post(move |Json(_body): Json<Value>| {
                let hits = Arc::clone(&handler_hits);
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        Json(schedule_payload())
                    } else {
                        Json(json!({ "schedule": { "oops": true } }))
                    }
                }
            }),
        );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;
    controller.optimize().await?;

    let before = controller.schedule().expect("schedule rows").to_vec();

    let err = controller.optimize().await.expect_err("bad shape must fail");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(controller.schedule().expect("schedule rows"), before.as_slice());

    Ok(())
}

#[tokio::test]
async fn test_optimize_without_transcript_fails_locally() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let router = Router::new().route(
        "/optimize",
        post(move |Json(_body): Json<Value>| {
            let hits = Arc::clone(&handler_hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "schedule": [] }))
            }
        }),
    );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    let err = controller
        .optimize()
        .await
        .expect_err("no transcript to optimize");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(hits.load(Ordering::SeqCst), 0, "no network call issued");
    assert!(controller.schedule().is_none());

    Ok(())
}

#[tokio::test]
async fn test_transcribe_without_finalized_recording_fails_locally() -> Result<()> {
    let base = spawn_backend(Router::new()).await?;
    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    let err = controller
        .transcribe()
        .await
        .expect_err("nothing recorded yet");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(controller.transcript().is_none());

    Ok(())
}

#[tokio::test]
async fn test_run_processing_fires_the_legacy_call() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);
    let router = Router::new()
        .route(
            "/record",
            post(|| async { Json(json!({ "transcription": "process me" })) }),
        )
        .route(
            "/process",
            post(move |Json(body): Json<Value>| {
                let hits = Arc::clone(&handler_hits);
                async move {
                    assert_eq!(body["transcription"], json!("process me"));
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "result": "unused" }))
                }
            }),
        );
    let base = spawn_backend(router).await?;

    let mut controller = controller(&base, vec![b"RIFF".to_vec()])?;

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;
    controller.run_processing().await?;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    // The opaque response must not touch workflow state.
    assert_eq!(controller.transcript_text(), Some("process me"));
    assert!(controller.schedule().is_none());

    Ok(())
}
