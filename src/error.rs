use std::fmt;

use thiserror::Error;

/// Failure category, matching what the presentation layer needs to
/// distinguish: access problems, transport/status problems, and
/// malformed backend responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Capture device access denied or unavailable.
    Permission,
    /// Transport failure or non-success HTTP status.
    Network,
    /// Missing or malformed fields in a backend response, or locally
    /// rejected input.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Permission => "permission",
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
        };
        f.write_str(label)
    }
}

/// Workflow step a failure occurred during.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Capture,
    Transcription,
    Optimization,
    Processing,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStage::Capture => "capture",
            WorkflowStage::Transcription => "transcription",
            WorkflowStage::Optimization => "optimization",
            WorkflowStage::Processing => "processing",
        };
        f.write_str(label)
    }
}

/// Error surfaced by workflow intents and backend client operations.
///
/// Never fatal to the controller: every failure leaves the workflow in a
/// recoverable state and previously committed transcript/schedule state
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure during {stage}: {message}")]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub stage: WorkflowStage,
    pub message: String,
}

impl WorkflowError {
    pub fn permission(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Permission,
            stage: WorkflowStage::Capture,
            message: message.into(),
        }
    }

    pub fn network(stage: WorkflowStage, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            stage,
            message: message.into(),
        }
    }

    pub fn validation(stage: WorkflowStage, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            stage,
            message: message.into(),
        }
    }
}
