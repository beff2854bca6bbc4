//! Platform output stream
//!
//! Opens the default cpal output device and drives the shared mixer from
//! the audio callback. The stream lives on the engine thread and is torn
//! down by dropping it.

use crate::error::EngineError;
use crate::mixer::VoiceMixer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::Arc;

/// An open, playing output stream.
pub(crate) struct OutputStream {
    // Held for its lifetime; dropping stops playback.
    _stream: cpal::Stream,
    pub sample_rate: u32,
}

/// Open the default output device and start rendering the mixer into it.
pub(crate) fn open(mixer: Arc<Mutex<VoiceMixer>>) -> Result<OutputStream, EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let config = device.default_output_config()?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());
    tracing::debug!(device = %device_name, sample_rate, channels, "opening output stream");

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // try_lock: on contention output silence rather than blocking
            // the real-time audio thread
            if let Some(mut mixer) = mixer.try_lock() {
                mixer.mix(data, channels);
            } else {
                data.fill(0.0);
            }
        },
        |err| {
            tracing::warn!("output stream error: {err}");
        },
        None,
    )?;
    stream.play()?;

    Ok(OutputStream {
        _stream: stream,
        sample_rate,
    })
}
