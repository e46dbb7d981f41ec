use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use triage_voice::{
    BackendClient, CaptureDevice, Config, ScheduleRow, ToneDevice, WavFileDevice,
    WorkflowController,
};

#[derive(Parser)]
#[command(name = "triage-voice")]
#[command(about = "Voice-driven scan scheduling workflow")]
struct Args {
    /// Config file (without extension)
    #[arg(short, long, default_value = "config/triage-voice")]
    config: String,

    /// WAV clip to use as the capture source instead of the built-in
    /// test tone
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Also fire the legacy processing call before optimizing
    #[arg(long)]
    with_processing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!("Backend: {}", cfg.backend.base_url);

    let device: Box<dyn CaptureDevice> = match &args.input {
        Some(path) => {
            info!("Capture source: WAV clip {}", path.display());
            Box::new(WavFileDevice::new(path, cfg.audio.capture_chunk_bytes))
        }
        None => {
            info!("Capture source: built-in test tone");
            Box::new(ToneDevice::default_clip(cfg.audio.capture_chunk_bytes))
        }
    };

    let client = BackendClient::new(
        &cfg.backend.base_url,
        Duration::from_secs(cfg.backend.request_timeout_secs),
    )?;

    let mut controller =
        WorkflowController::new(device, client, cfg.audio.preferred_encodings.clone());

    controller.start_recording().await?;
    controller.stop_recording().await?;
    controller.transcribe().await?;

    if let Some(text) = controller.transcript_text() {
        info!("Transcript: {}", text);
    }

    if args.with_processing {
        controller.run_processing().await?;
    }

    controller.optimize().await?;

    if let Some(rows) = controller.schedule() {
        info!("Schedule preview ({} rows):", rows.len());
        for row in rows {
            info!(
                "  {} | {} | {} | {} | {} | {} {} | {}",
                ScheduleRow::cell_text(&row.scan_id),
                ScheduleRow::cell_text(&row.scan_type),
                ScheduleRow::cell_text(&row.duration),
                ScheduleRow::cell_text(&row.priority),
                ScheduleRow::cell_text(&row.patient_id),
                row.check_in_date,
                row.check_in_time,
                row.unit
            );
        }
    }

    Ok(())
}
