// Shared test doubles: a scripted capture device and a stub backend
// server the workflow can talk to over real HTTP.
#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use triage_voice::{AudioEncoding, CaptureDevice};

/// Capture device that replays a fixed chunk script and counts how
/// often its stream is released.
pub struct ScriptedDevice {
    chunks: Vec<Vec<u8>>,
    supported: Vec<String>,
    deny: Arc<AtomicBool>,
    fail_probe: bool,
    closes: Arc<AtomicUsize>,
    open: bool,
}

impl ScriptedDevice {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            supported: vec!["audio/wav".to_string()],
            deny: Arc::new(AtomicBool::new(false)),
            fail_probe: false,
            closes: Arc::new(AtomicUsize::new(0)),
            open: false,
        }
    }

    pub fn with_supported(mut self, supported: Vec<&str>) -> Self {
        self.supported = supported.into_iter().map(String::from).collect();
        self
    }

    pub fn denying_access(self) -> Self {
        self.deny.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_failing_probe(mut self) -> Self {
        self.fail_probe = true;
        self
    }

    /// Handle to flip access denial after the device has been moved
    /// into a controller.
    pub fn deny_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.deny)
    }

    /// Handle to the stream release counter.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl CaptureDevice for ScriptedDevice {
    async fn request_access(&mut self) -> Result<()> {
        if self.deny.load(Ordering::SeqCst) {
            bail!("microphone access denied");
        }
        Ok(())
    }

    async fn list_inputs(&self) -> Result<Vec<String>> {
        if self.fail_probe {
            bail!("device enumeration unavailable");
        }
        Ok(vec!["scripted-input".to_string()])
    }

    fn supports(&self, mime: &str) -> bool {
        self.supported.iter().any(|m| m == mime)
    }

    async fn open_stream(&mut self, _encoding: &AudioEncoding) -> Result<mpsc::Receiver<Vec<u8>>> {
        if self.open {
            bail!("stream already open");
        }

        let (tx, rx) = mpsc::channel(self.chunks.len().max(1));
        for chunk in self.chunks.clone() {
            if tx.send(chunk).await.is_err() {
                break;
            }
        }

        self.open = true;
        Ok(rx)
    }

    async fn close_stream(&mut self) -> Result<()> {
        self.open = false;
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Serve a stub backend router on an ephemeral port, returning its
/// base URL.
pub async fn spawn_backend(router: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("stub backend exited: {e}");
        }
    });

    Ok(format!("http://{addr}"))
}
