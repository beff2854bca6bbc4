//! Engine error taxonomy

use thiserror::Error;

/// Failures raised while acquiring or driving the output stream.
///
/// These circulate between the output module and the facade only; the
/// public engine surface absorbs every variant, logs it, and leaves the
/// engine disabled (silent) instead of propagating.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no audio output device found")]
    NoOutputDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    StartStream(#[from] cpal::PlayStreamError),
    #[error("audio engine did not become ready in time")]
    StartupTimeout,
}
