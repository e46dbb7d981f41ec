pub mod backend;
pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod schedule;
pub mod workflow;

pub use backend::{BackendClient, RawScheduleEntry, Transcript};
pub use capture::{
    negotiate_encoding, probe_inputs, AudioEncoding, CaptureDevice, ToneDevice, WavFileDevice,
    FALLBACK_MIME,
};
pub use config::Config;
pub use error::{ErrorKind, WorkflowError, WorkflowStage};
pub use recording::{RecordingBuffer, RecordingSession, SessionState};
pub use schedule::{normalize_schedule, ScheduleRow};
pub use workflow::{WorkflowController, WorkflowPhase, WorkflowStatus};
