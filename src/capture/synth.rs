// Synthetic capture device producing a sine test clip
//
// Stands in for a microphone when exercising the workflow without
// hardware: generates a fixed-duration tone, encodes it as a WAV clip
// in memory, and streams the clip bytes as capture chunks.

use anyhow::{bail, Context, Result};
use std::io::Cursor;
use tokio::sync::mpsc;
use tracing::info;

use super::device::CaptureDevice;
use super::format::AudioEncoding;

const SAMPLE_RATE: u32 = 16000;

pub struct ToneDevice {
    frequency_hz: f32,
    duration_secs: f32,
    chunk_bytes: usize,
    open: bool,
}

impl ToneDevice {
    pub fn new(frequency_hz: f32, duration_secs: f32, chunk_bytes: usize) -> Self {
        Self {
            frequency_hz,
            duration_secs,
            chunk_bytes,
            open: false,
        }
    }

    /// A4 tone, five seconds, the default test clip.
    pub fn default_clip(chunk_bytes: usize) -> Self {
        Self::new(440.0, 5.0, chunk_bytes)
    }

    fn render_clip(&self) -> Result<Vec<u8>> {
        let total_samples = (SAMPLE_RATE as f32 * self.duration_secs) as u32;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut clip = Vec::new();
        let mut writer = hound::WavWriter::new(Cursor::new(&mut clip), spec)
            .context("Failed to create in-memory WAV writer")?;

        for n in 0..total_samples {
            let t = n as f32 / SAMPLE_RATE as f32;
            let value = (2.0 * std::f32::consts::PI * self.frequency_hz * t).sin();
            let sample = (value * 0.5 * i16::MAX as f32) as i16;
            writer
                .write_sample(sample)
                .context("Failed to write tone sample")?;
        }

        writer.finalize().context("Failed to finalize tone clip")?;

        Ok(clip)
    }
}

#[async_trait::async_trait]
impl CaptureDevice for ToneDevice {
    async fn request_access(&mut self) -> Result<()> {
        // Nothing to grant for a synthetic source.
        Ok(())
    }

    async fn list_inputs(&self) -> Result<Vec<String>> {
        Ok(vec![format!("tone-{}hz", self.frequency_hz)])
    }

    fn supports(&self, mime: &str) -> bool {
        AudioEncoding::new(mime).container() == "audio/wav"
    }

    async fn open_stream(&mut self, encoding: &AudioEncoding) -> Result<mpsc::Receiver<Vec<u8>>> {
        if self.open {
            bail!("Stream already open");
        }
        if !self.supports(encoding.mime()) {
            bail!("Unsupported encoding for tone device: {}", encoding.mime());
        }

        let clip = self.render_clip()?;

        info!(
            "Tone device streaming {:.1}s clip at {}Hz ({} bytes)",
            self.duration_secs,
            self.frequency_hz,
            clip.len()
        );

        // The clip is finite, so size the channel to hold it whole and
        // close the sender immediately; draining the receiver yields the
        // full clip and then terminates.
        let chunks: Vec<Vec<u8>> = clip.chunks(self.chunk_bytes).map(<[u8]>::to_vec).collect();
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
        "synthetic-tone"
    }
}
