use anyhow::Result;
use tokio::sync::mpsc;

use super::format::AudioEncoding;

/// Capture device capability
///
/// Abstracts the microphone/permission subsystem so the workflow
/// controller can run against real hardware, clip-backed sources, or
/// scripted test doubles:
/// - request access (the permission prompt)
/// - enumerate inputs (diagnostics only)
/// - open a stream with a negotiated encoding
/// - receive binary chunks, then stop and release the stream
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Request permission to capture from this device.
    ///
    /// An error here means access was denied or the device is
    /// unavailable; no stream resources are held afterwards.
    async fn request_access(&mut self) -> Result<()>;

    /// Enumerate available capture inputs.
    ///
    /// Diagnostic only. Callers must treat failure as non-fatal.
    async fn list_inputs(&self) -> Result<Vec<String>>;

    /// Whether the device can produce the given MIME encoding.
    fn supports(&self, mime: &str) -> bool;

    /// Open a capture stream with the negotiated encoding.
    ///
    /// Returns a channel receiver that will receive encoded binary
    /// chunks. The sender side is dropped once the stream ends or the
    /// device is closed, so draining the receiver terminates.
    async fn open_stream(&mut self, encoding: &AudioEncoding) -> Result<mpsc::Receiver<Vec<u8>>>;

    /// Stop capturing and release all underlying hardware handles.
    async fn close_stream(&mut self) -> Result<()>;

    /// Get device name for logging
    fn name(&self) -> &str;
}
