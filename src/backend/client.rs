use anyhow::{Context, Result};
use reqwest::multipart;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{WorkflowError, WorkflowStage};
use crate::recording::RecordingBuffer;
use crate::schedule::{normalize_schedule, ScheduleRow};

use super::types::{OptimizeRequest, RawScheduleEntry, TranscribeResponse, Transcript};

/// HTTP client for the transcription/optimization backend.
///
/// Stateless beyond the connection pool: every operation returns its
/// result to the caller, which decides whether to commit it.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        info!("Backend client targeting {}", base_url);

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a finalized recording to `POST /record` and return the
    /// transcript.
    pub async fn transcribe(&self, recording: &RecordingBuffer) -> Result<Transcript, WorkflowError> {
        let file_name = format!("capture.{}", recording.encoding().extension());

        debug!(
            "Uploading {} bytes as {} ({})",
            recording.len(),
            file_name,
            recording.encoding().mime()
        );

        let part = multipart::Part::bytes(recording.data().to_vec())
            .file_name(file_name)
            .mime_str(recording.encoding().mime())
            .map_err(|e| {
                WorkflowError::validation(
                    WorkflowStage::Transcription,
                    format!("Unusable capture encoding {}: {}", recording.encoding().mime(), e),
                )
            })?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/record", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                WorkflowError::network(
                    WorkflowStage::Transcription,
                    format!("Transcription request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::network(
                WorkflowStage::Transcription,
                format!("Transcription endpoint returned {}: {}", status, body),
            ));
        }

        let payload: TranscribeResponse = response.json().await.map_err(|e| {
            WorkflowError::validation(
                WorkflowStage::Transcription,
                format!("Malformed transcription response: {}", e),
            )
        })?;

        let text = payload.transcription.ok_or_else(|| {
            WorkflowError::validation(
                WorkflowStage::Transcription,
                "Transcription response missing the transcription field",
            )
        })?;

        info!("Transcription complete ({} chars)", text.len());

        Ok(Transcript {
            text,
            source_session_id: recording.session_id().to_string(),
        })
    }

    /// Submit a transcript to `POST /optimize` and return the
    /// normalized schedule rows.
    pub async fn optimize(&self, transcription: &str) -> Result<Vec<ScheduleRow>, WorkflowError> {
        if transcription.trim().is_empty() {
            return Err(WorkflowError::validation(
                WorkflowStage::Optimization,
                "Transcript is empty; nothing to optimize",
            ));
        }

        let response = self
            .http
            .post(format!("{}/optimize", self.base_url))
            .json(&OptimizeRequest { transcription })
            .send()
            .await
            .map_err(|e| {
                WorkflowError::network(
                    WorkflowStage::Optimization,
                    format!("Optimization request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::network(
                WorkflowStage::Optimization,
                format!("Optimization endpoint returned {}: {}", status, body),
            ));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            WorkflowError::validation(
                WorkflowStage::Optimization,
                format!("Malformed optimization response: {}", e),
            )
        })?;

        let entries = payload
            .get("schedule")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| {
                WorkflowError::validation(WorkflowStage::Optimization, "Invalid schedule format")
            })?;

        let raw: Vec<RawScheduleEntry> = entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()))
            .collect::<Result<_, _>>()
            .map_err(|e| {
                WorkflowError::validation(
                    WorkflowStage::Optimization,
                    format!("Invalid schedule entry: {}", e),
                )
            })?;

        info!("Optimization returned {} schedule entries", raw.len());

        Ok(normalize_schedule(raw))
    }

    /// Fire the legacy `POST /process` call.
    ///
    /// The response body is deliberately unread: the call is retained
    /// for a backend side effect it is believed to trigger, and nothing
    /// in its response is part of the workflow contract.
    pub async fn process(&self, transcription: &str) -> Result<(), WorkflowError> {
        let response = self
            .http
            .post(format!("{}/process", self.base_url))
            .json(&OptimizeRequest { transcription })
            .send()
            .await
            .map_err(|e| {
                WorkflowError::network(
                    WorkflowStage::Processing,
                    format!("Processing request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::network(
                WorkflowStage::Processing,
                format!("Processing endpoint returned {}: {}", status, body),
            ));
        }

        info!("Processing call acknowledged");

        Ok(())
    }
}
