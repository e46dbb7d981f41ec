use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::recording::SessionState;

/// In-flight backend request, if any.
///
/// One request at a time: intents arriving while a request is in
/// flight are rejected, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Transcribing,
    Optimizing,
    Processing,
}

/// Snapshot of controller state for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatus {
    /// Current capture session identifier
    pub session_id: String,

    /// Where the capture session is in its lifecycle
    pub session_state: SessionState,

    /// Which backend request is in flight, if any
    pub phase: WorkflowPhase,

    /// When the current session started
    pub started_at: Option<DateTime<Utc>>,

    /// Size of the finalized recording, 0 until the session is ready
    pub recorded_bytes: usize,

    /// Committed transcript text, if any
    pub transcript: Option<String>,

    /// Number of normalized schedule rows on display
    pub schedule_rows: usize,

    /// Most recent failure, overwritten by each new one
    pub last_error: Option<String>,
}
