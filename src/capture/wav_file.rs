// WAV-clip-backed capture device
//
// Treats an on-disk WAV recording as the capture source, for batch
// processing and for driving the workflow without a live microphone.

use anyhow::{bail, Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

use super::device::CaptureDevice;
use super::format::AudioEncoding;

pub struct WavFileDevice {
    path: PathBuf,
    chunk_bytes: usize,
    open: bool,
}

impl WavFileDevice {
    pub fn new(path: impl AsRef<Path>, chunk_bytes: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chunk_bytes,
            open: false,
        }
    }

    fn probe(&self) -> Result<()> {
        let reader = WavReader::open(&self.path)
            .with_context(|| format!("Failed to open WAV file: {}", self.path.display()))?;

        let spec = reader.spec();
        let duration_seconds =
            reader.duration() as f64 / spec.sample_rate as f64;

        info!(
            "WAV clip loaded: {} ({:.1}s, {}Hz, {} channels)",
            self.path.display(),
            duration_seconds,
            spec.sample_rate,
            spec.channels
        );

        Ok(())
    }
}

#[async_trait::async_trait]
impl CaptureDevice for WavFileDevice {
    async fn request_access(&mut self) -> Result<()> {
        if !self.path.exists() {
            bail!("Capture source not available: {}", self.path.display());
        }
        Ok(())
    }

    async fn list_inputs(&self) -> Result<Vec<String>> {
        Ok(vec![self.path.display().to_string()])
    }

    fn supports(&self, mime: &str) -> bool {
        AudioEncoding::new(mime).container() == "audio/wav"
    }

    async fn open_stream(&mut self, encoding: &AudioEncoding) -> Result<mpsc::Receiver<Vec<u8>>> {
        if self.open {
            bail!("Stream already open");
        }
        if !self.supports(encoding.mime()) {
            bail!("Unsupported encoding for WAV clip: {}", encoding.mime());
        }

        // Validate the container before shipping its bytes anywhere.
        self.probe()?;

        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read WAV file: {}", self.path.display()))?;

        let chunks: Vec<Vec<u8>> = bytes.chunks(self.chunk_bytes).map(<[u8]>::to_vec).collect();
        let (tx, rx) = mpsc::channel(chunks.len().max(1));
        for chunk in chunks {
            if tx.send(chunk).await.is_err() {
                break;
            }
        }

        self.open = true;

        Ok(rx)
    }

    async fn close_stream(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn name(&self) -> &str {
        "wav-clip"
    }
}
