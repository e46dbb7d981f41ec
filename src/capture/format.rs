use serde::Serialize;
use tracing::{debug, info, warn};

use super::device::CaptureDevice;

/// Encoding chosen when none of the preferred encodings are supported.
pub const FALLBACK_MIME: &str = "audio/wav";

/// A negotiated audio encoding, identified by its MIME string
/// (possibly carrying codec parameters, e.g. "audio/webm;codecs=opus").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioEncoding {
    mime: String,
}

impl AudioEncoding {
    pub fn new(mime: impl Into<String>) -> Self {
        Self { mime: mime.into() }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_MIME)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// MIME container with any codec parameters stripped.
    pub fn container(&self) -> &str {
        match self.mime.split_once(';') {
            Some((container, _)) => container.trim(),
            None => self.mime.as_str(),
        }
    }

    /// Filename extension hint for uploads of this encoding.
    pub fn extension(&self) -> &'static str {
        match self.container() {
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/mp4" => "m4a",
            "audio/mpeg" => "mp3",
            "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
            _ => "bin",
        }
    }
}

/// Pick the first preferred encoding the device reports as supported.
///
/// Falls back to [`FALLBACK_MIME`] when nothing in the list is
/// supported, so capture start never fails on negotiation alone.
pub fn negotiate_encoding(device: &dyn CaptureDevice, preferred: &[String]) -> AudioEncoding {
    for mime in preferred {
        if device.supports(mime) {
            info!("Negotiated capture encoding: {}", mime);
            return AudioEncoding::new(mime.clone());
        }
    }

    info!(
        "No preferred encoding supported by {}, falling back to {}",
        device.name(),
        FALLBACK_MIME
    );
    AudioEncoding::fallback()
}

/// Log the available capture inputs.
///
/// Diagnostic only: a probe failure is reported and swallowed so it can
/// never block or abort capture start.
pub async fn probe_inputs(device: &dyn CaptureDevice) {
    match device.list_inputs().await {
        Ok(inputs) => {
            debug!("Capture inputs available on {}: {:?}", device.name(), inputs);
        }
        Err(e) => {
            warn!("Capture input probe failed on {}: {}", device.name(), e);
        }
    }
}
