//! Workflow orchestration
//!
//! This module provides the `WorkflowController` that composes the
//! capture device, recording session, and backend client:
//! - start/stop one capture session at a time
//! - ship the finalized recording to the transcription endpoint
//! - submit the transcript for optimization and normalize the result
//! - surface every failure through a single latest-error slot

mod controller;
mod status;

pub use controller::WorkflowController;
pub use status::{WorkflowPhase, WorkflowStatus};
