// Tests for configuration loading

use anyhow::Result;
use triage_voice::Config;

#[test]
fn test_config_loads_from_toml() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("triage-voice.toml");

    std::fs::write(
        &path,
        r#"
[service]
name = "triage-voice-test"

[backend]
base_url = "http://localhost:10000"
request_timeout_secs = 30

[audio]
preferred_encodings = ["audio/webm", "audio/wav"]
capture_chunk_bytes = 16384
"#,
    )?;

    let base = dir.path().join("triage-voice");
    let cfg = Config::load(&base.display().to_string())?;

    assert_eq!(cfg.service.name, "triage-voice-test");
    assert_eq!(cfg.backend.base_url, "http://localhost:10000");
    assert_eq!(cfg.backend.request_timeout_secs, 30);
    assert_eq!(
        cfg.audio.preferred_encodings,
        vec!["audio/webm".to_string(), "audio/wav".to_string()]
    );
    assert_eq!(cfg.audio.capture_chunk_bytes, 16384);

    Ok(())
}
