use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::capture::AudioEncoding;

/// Lifecycle state of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingPermission,
    Recording,
    Finalizing,
    Ready,
    Failed,
}

/// Finalized audio recording: the session's chunks concatenated in
/// arrival order, tagged with the negotiated encoding.
///
/// Immutable once built; retrying a failed upload reuses the same
/// buffer.
#[derive(Debug, Clone)]
pub struct RecordingBuffer {
    session_id: String,
    encoding: AudioEncoding,
    data: Vec<u8>,
}

impl RecordingBuffer {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn encoding(&self) -> &AudioEncoding {
        &self.encoding
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One bounded capture lifecycle: permission request, active capture,
/// finalize, encode-ready buffer.
///
/// Pure state machine; all I/O (permission prompts, stream handling)
/// is driven by the workflow controller that owns this session.
pub struct RecordingSession {
    id: String,
    state: SessionState,
    encoding: Option<AudioEncoding>,
    chunks: Vec<Vec<u8>>,
    started_at: Option<DateTime<Utc>>,
    buffer: Option<RecordingBuffer>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            id: format!("capture-{}", uuid::Uuid::new_v4()),
            state: SessionState::Idle,
            encoding: None,
            chunks: Vec::new(),
            started_at: None,
            buffer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn encoding(&self) -> Option<&AudioEncoding> {
        self.encoding.as_ref()
    }

    /// Whether the session currently owns (or is acquiring) the capture
    /// stream.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            SessionState::AwaitingPermission | SessionState::Recording | SessionState::Finalizing
        )
    }

    /// The finalized recording, present once the session is `Ready`.
    pub fn buffer(&self) -> Option<&RecordingBuffer> {
        self.buffer.as_ref()
    }

    /// Enter the permission request. Valid from `Idle` only; the
    /// controller replaces finished sessions rather than restarting them.
    pub fn begin_permission_request(&mut self) {
        debug_assert_eq!(self.state, SessionState::Idle);
        self.state = SessionState::AwaitingPermission;
        self.started_at = Some(Utc::now());
        info!("Session {} awaiting capture permission", self.id);
    }

    /// Permission granted and stream opened: start collecting chunks.
    pub fn begin_capture(&mut self, encoding: AudioEncoding) {
        debug_assert_eq!(self.state, SessionState::AwaitingPermission);
        info!(
            "Session {} recording ({})",
            self.id,
            encoding.mime()
        );
        self.encoding = Some(encoding);
        self.state = SessionState::Recording;
    }

    /// Append one captured chunk. Only grows the buffer while
    /// `Recording`; empty chunks are discarded.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if self.state != SessionState::Recording {
            debug!(
                "Session {} dropping chunk outside recording state ({:?})",
                self.id, self.state
            );
            return;
        }
        if chunk.is_empty() {
            debug!("Session {} discarding empty chunk", self.id);
            return;
        }
        self.chunks.push(chunk);
    }

    /// Leave `Recording` once the capture stream has been released.
    pub fn begin_finalize(&mut self) {
        debug_assert_eq!(self.state, SessionState::Recording);
        self.state = SessionState::Finalizing;
    }

    /// Concatenate the collected chunks into the immutable buffer and
    /// mark the session `Ready`.
    pub fn complete(&mut self) {
        debug_assert_eq!(self.state, SessionState::Finalizing);

        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }

        let encoding = self
            .encoding
            .clone()
            .unwrap_or_else(AudioEncoding::fallback);

        info!(
            "Session {} finalized: {} bytes ({})",
            self.id,
            data.len(),
            encoding.mime()
        );

        self.buffer = Some(RecordingBuffer {
            session_id: self.id.clone(),
            encoding,
            data,
        });
        self.state = SessionState::Ready;
    }

    /// Record a failed session attempt. Any stream release has already
    /// happened in the controller.
    pub fn fail(&mut self) {
        info!("Session {} failed in state {:?}", self.id, self.state);
        self.chunks.clear();
        self.state = SessionState::Failed;
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
