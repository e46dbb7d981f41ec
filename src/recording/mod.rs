//! Capture session lifecycle
//!
//! This module provides the `RecordingSession` state machine that owns
//! one capture lifecycle (permission request, active capture, finalize)
//! and the immutable `RecordingBuffer` it produces. The scattered
//! boolean flags of the original controller live here as one explicit
//! state enum.

mod session;

pub use session::{RecordingBuffer, RecordingSession, SessionState};
