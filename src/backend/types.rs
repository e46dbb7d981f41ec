use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transcript returned by the transcription endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Transcribed text (possibly empty).
    pub text: String,
    /// Session the audio came from. Back-reference, not ownership.
    pub source_session_id: String,
}

/// Response body of `POST /record`.
#[derive(Debug, Deserialize)]
pub struct TranscribeResponse {
    pub transcription: Option<String>,
}

/// Request body of `POST /optimize` and `POST /process`.
#[derive(Debug, Serialize)]
pub struct OptimizeRequest<'a> {
    pub transcription: &'a str,
}

/// One scan assignment as the optimizer returns it.
///
/// Loosely structured: the identifying fields arrive as arbitrary JSON
/// values, and check-in timing comes either as a single `start_time`
/// ("date time", space separated) or as explicit date/time fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawScheduleEntry {
    pub scan_id: Value,
    pub scan_type: Value,
    pub duration: Value,
    pub priority: Value,
    pub patient_id: Value,
    pub start_time: Option<String>,
    pub check_in_date: Option<String>,
    pub check_in_time: Option<String>,
    pub machine: Option<String>,
}
