pub mod device;
pub mod format;
pub mod synth;
pub mod wav_file;

pub use device::CaptureDevice;
pub use format::{negotiate_encoding, probe_inputs, AudioEncoding, FALLBACK_MIME};
pub use synth::ToneDevice;
pub use wav_file::WavFileDevice;
