use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::backend::{BackendClient, Transcript};
use crate::capture::{negotiate_encoding, probe_inputs, CaptureDevice};
use crate::error::{WorkflowError, WorkflowStage};
use crate::recording::{RecordingBuffer, RecordingSession, SessionState};
use crate::schedule::ScheduleRow;

use super::status::{WorkflowPhase, WorkflowStatus};

/// Orchestrates the capture-transcribe-optimize workflow.
///
/// Owns the capture device, the single live recording session, and all
/// state the presentation layer renders (transcript, schedule rows,
/// latest error). Intents arrive one at a time; a second session or a
/// second in-flight backend request is rejected rather than queued.
pub struct WorkflowController {
    device: Box<dyn CaptureDevice>,
    client: BackendClient,
    preferred_encodings: Vec<String>,

    session: RecordingSession,
    stream_rx: Option<mpsc::Receiver<Vec<u8>>>,
    /// Whether the device currently holds an open capture stream.
    /// Guards release so it happens exactly once per session,
    /// regardless of whether stop, clear, or a failure ends it.
    stream_open: bool,

    transcript: Option<Transcript>,
    schedule: Option<Vec<ScheduleRow>>,
    phase: WorkflowPhase,
    last_error: Option<WorkflowError>,
}

impl WorkflowController {
    pub fn new(
        device: Box<dyn CaptureDevice>,
        client: BackendClient,
        preferred_encodings: Vec<String>,
    ) -> Self {
        info!("Workflow controller using capture device: {}", device.name());

        Self {
            device,
            client,
            preferred_encodings,
            session: RecordingSession::new(),
            stream_rx: None,
            stream_open: false,
            transcript: None,
            schedule: None,
            phase: WorkflowPhase::Idle,
            last_error: None,
        }
    }

    /// Begin a new capture session: request permission, negotiate the
    /// encoding, open the stream.
    ///
    /// A start intent while a session is already active is a no-op.
    pub async fn start_recording(&mut self) -> Result<(), WorkflowError> {
        if self.session.is_active() {
            warn!(
                "Ignoring start intent: session {} is already {:?}",
                self.session.id(),
                self.session.state()
            );
            return Ok(());
        }

        self.session = RecordingSession::new();
        self.session.begin_permission_request();

        if let Err(e) = self.device.request_access().await {
            self.session.fail();
            let err = WorkflowError::permission(format!("Capture access denied: {}", e));
            return Err(self.record_error(err));
        }

        // Diagnostic probe; never blocks capture start.
        probe_inputs(self.device.as_ref()).await;

        let encoding = negotiate_encoding(self.device.as_ref(), &self.preferred_encodings);

        match self.device.open_stream(&encoding).await {
            Ok(rx) => {
                self.stream_rx = Some(rx);
                self.stream_open = true;
                self.session.begin_capture(encoding);
                Ok(())
            }
            Err(e) => {
                self.session.fail();
                let err =
                    WorkflowError::permission(format!("Failed to open capture stream: {}", e));
                Err(self.record_error(err))
            }
        }
    }

    /// Stop the active capture and finalize the recording buffer.
    ///
    /// Idempotent: a stop intent outside the recording state is a
    /// no-op.
    pub async fn stop_recording(&mut self) -> Result<(), WorkflowError> {
        if self.session.state() != SessionState::Recording {
            warn!(
                "Ignoring stop intent in state {:?}",
                self.session.state()
            );
            return Ok(());
        }

        // Hardware handles go first; the session leaves the recording
        // state only after the stream is released.
        self.release_stream().await;

        if let Some(mut rx) = self.stream_rx.take() {
            while let Some(chunk) = rx.recv().await {
                self.session.push_chunk(chunk);
            }
        }

        self.session.begin_finalize();
        self.session.complete();

        Ok(())
    }

    /// Upload the finalized recording and commit the transcript on
    /// success. Failure leaves any existing transcript untouched.
    pub async fn transcribe(&mut self) -> Result<(), WorkflowError> {
        if self.phase != WorkflowPhase::Idle {
            warn!("Ignoring transcribe intent: {:?} already in flight", self.phase);
            return Ok(());
        }

        let result = match self.session.buffer() {
            Some(buffer) => {
                self.phase = WorkflowPhase::Transcribing;
                self.client.transcribe(buffer).await
            }
            None => Err(WorkflowError::validation(
                WorkflowStage::Transcription,
                "No finalized recording to transcribe",
            )),
        };
        self.phase = WorkflowPhase::Idle;

        match result {
            Ok(transcript) => {
                self.transcript = Some(transcript);
                Ok(())
            }
            Err(e) => Err(self.record_error(e)),
        }
    }

    /// Submit the committed transcript for optimization and replace the
    /// schedule rows on success. Failure leaves existing rows
    /// untouched.
    pub async fn optimize(&mut self) -> Result<(), WorkflowError> {
        if self.phase != WorkflowPhase::Idle {
            warn!("Ignoring optimize intent: {:?} already in flight", self.phase);
            return Ok(());
        }

        let transcription = self
            .transcript
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();

        self.phase = WorkflowPhase::Optimizing;
        let result = self.client.optimize(&transcription).await;
        self.phase = WorkflowPhase::Idle;

        match result {
            Ok(rows) => {
                info!("Schedule updated: {} rows", rows.len());
                self.schedule = Some(rows);
                Ok(())
            }
            Err(e) => Err(self.record_error(e)),
        }
    }

    /// Fire the legacy processing call for the committed transcript.
    /// The response is not consumed and no workflow state changes.
    pub async fn run_processing(&mut self) -> Result<(), WorkflowError> {
        if self.phase != WorkflowPhase::Idle {
            warn!("Ignoring processing intent: {:?} already in flight", self.phase);
            return Ok(());
        }

        let transcription = self
            .transcript
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();

        self.phase = WorkflowPhase::Processing;
        let result = self.client.process(&transcription).await;
        self.phase = WorkflowPhase::Idle;

        result.map_err(|e| self.record_error(e))
    }

    /// Reset the workflow: release any held stream, discard the
    /// session, transcript, schedule rows, and latest error.
    pub async fn clear(&mut self) {
        self.release_stream().await;
        self.stream_rx = None;
        self.session = RecordingSession::new();
        self.transcript = None;
        self.schedule = None;
        self.last_error = None;

        info!("Workflow state cleared");
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn transcript_text(&self) -> Option<&str> {
        self.transcript.as_ref().map(|t| t.text.as_str())
    }

    pub fn schedule(&self) -> Option<&[ScheduleRow]> {
        self.schedule.as_deref()
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.session.state() == SessionState::Recording
    }

    pub fn is_transcribing(&self) -> bool {
        self.phase == WorkflowPhase::Transcribing
    }

    pub fn is_optimizing(&self) -> bool {
        self.phase == WorkflowPhase::Optimizing
    }

    /// Snapshot for the presentation layer.
    pub fn status(&self) -> WorkflowStatus {
        WorkflowStatus {
            session_id: self.session.id().to_string(),
            session_state: self.session.state(),
            phase: self.phase,
            started_at: self.session.started_at(),
            recorded_bytes: self.session.buffer().map(RecordingBuffer::len).unwrap_or(0),
            transcript: self.transcript.as_ref().map(|t| t.text.clone()),
            schedule_rows: self.schedule.as_ref().map(Vec::len).unwrap_or(0),
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    async fn release_stream(&mut self) {
        if !self.stream_open {
            return;
        }
        self.stream_open = false;
        if let Err(e) = self.device.close_stream().await {
            error!("Failed to release capture stream: {}", e);
        }
    }

    fn record_error(&mut self, err: WorkflowError) -> WorkflowError {
        error!("{}", err);
        self.last_error = Some(err.clone());
        err
    }
}
