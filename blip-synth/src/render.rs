//! Catalog renderers
//!
//! Every cue is sampled from a closed-form formula of time:
//!
//! `sample(t) = envelope(t) * sum_i(weight_i * sin(2*pi*freq_i(t)*t)) * scale`
//!
//! Frequencies are constant, linearly swept (`base + t * rate`), or switched
//! on `t mod period` for alarm-like alternation. A few cues substitute white
//! noise for a sine term (percussive textures) or hard-clip the wave
//! (distorted timbre). Scale factors stay in 0.05-0.2 so overlapping cues
//! do not push the mix bus toward full amplitude.

use crate::buffer::SoundBuffer;
use crate::catalog::SoundName;
use crate::envelope::Envelope;
use crate::noise::Noise;
use std::f32::consts::TAU;

/// Render the full catalog at the given output rate.
pub fn render_catalog(sample_rate: u32) -> Vec<SoundBuffer> {
    let buffers: Vec<SoundBuffer> = SoundName::ALL
        .iter()
        .map(|&name| render(name, sample_rate))
        .collect();
    let total_frames: usize = buffers.iter().map(|b| b.frames()).sum();
    tracing::debug!(sample_rate, total_frames, "rendered sound catalog");
    buffers
}

/// Render a single catalog entry.
pub fn render(name: SoundName, sample_rate: u32) -> SoundBuffer {
    match name {
        SoundName::Click => click(sample_rate),
        SoundName::Alert => alert(sample_rate),
        SoundName::Success => success(sample_rate),
        SoundName::Error => error(sample_rate),
        SoundName::Typing => typing(sample_rate),
        SoundName::Startup => startup(sample_rate),
        SoundName::LoadingAmbient => loading_ambient(sample_rate),
        SoundName::LoadingBeep => loading_beep(sample_rate),
        SoundName::LoadingProgress => loading_progress(sample_rate),
        SoundName::LoadingComplete => loading_complete(sample_rate),
        SoundName::SystemInitialize => system_initialize(sample_rate),
        SoundName::DataTransfer => data_transfer(sample_rate),
    }
}

/// Evaluate `f(t)` at every sample instant of a `duration`-second buffer.
fn sample_frames(sample_rate: u32, duration: f32, mut f: impl FnMut(f32) -> f32) -> Vec<f32> {
    let frames = (duration * sample_rate as f32).round() as usize;
    let dt = 1.0 / sample_rate as f32;
    (0..frames).map(|i| f(i as f32 * dt)).collect()
}

/// Short high tick: 820 Hz with a faint octave, fast exponential decay.
fn click(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.06;
    const SCALE: f32 = 0.15;
    let env = Envelope::ExpDecay { k: 45.0 };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let wave = (TAU * 820.0 * t).sin() + 0.35 * (TAU * 1640.0 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::Click, sample_rate, samples)
}

/// Alarm alternation between 880 Hz and 660 Hz every 110 ms.
fn alert(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.45;
    const SCALE: f32 = 0.12;
    const PERIOD: f32 = 0.11;
    let env = Envelope::RaisedSine;
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let freq = if (t / PERIOD) as u32 % 2 == 0 {
            880.0
        } else {
            660.0
        };
        env.value(t, DURATION) * (TAU * freq * t).sin() * SCALE
    });
    SoundBuffer::from_mono(SoundName::Alert, sample_rate, samples)
}

/// Rising confirmation: linear sweep C5 upward plus a bright upper partial.
fn success(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.35;
    const SCALE: f32 = 0.12;
    let env = Envelope::RaisedSine;
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let base = 523.0 + 740.0 * t;
        let wave = (TAU * base * t).sin() + 0.4 * (TAU * base * 1.5 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::Success, sample_rate, samples)
}

/// Distorted low buzz: hard-clipped 160 Hz over a clean sub-octave.
fn error(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.3;
    const SCALE: f32 = 0.08;
    let env = Envelope::ExpDecay { k: 9.0 };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        // signum turns the sine into a square for the harsh timbre
        let clipped = (TAU * 160.0 * t).sin().signum();
        let wave = 0.7 * clipped + 0.3 * (TAU * 80.0 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::Error, sample_rate, samples)
}

/// Percussive keypress: noise burst with a faint 2.1 kHz tick.
fn typing(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.045;
    const SCALE: f32 = 0.1;
    let env = Envelope::ExpDecay { k: 110.0 };
    let mut noise = Noise::new();
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let wave = 0.8 * noise.white() + 0.3 * (TAU * 2100.0 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::Typing, sample_rate, samples)
}

/// Power-on sweep: two rising partials over a 55 Hz sub, long fades.
fn startup(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 1.2;
    const SCALE: f32 = 0.1;
    let env = Envelope::FadeInOut {
        attack: 0.15,
        release: 0.3,
    };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let wave = 0.6 * (TAU * (110.0 + 180.0 * t) * t).sin()
            + 0.3 * (TAU * (220.0 + 360.0 * t) * t).sin()
            + 0.2 * (TAU * 55.0 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::Startup, sample_rate, samples)
}

/// Low drone for the ambient loop.
///
/// Every partial completes a whole number of cycles over the loop length
/// and the amplitude modulation runs at exactly one cycle per loop, so the
/// loop point is seamless.
fn loading_ambient(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 3.0;
    const SCALE: f32 = 0.06;
    // 165, 166 and 248 cycles over the 3 s loop; the 1/3 Hz beat between
    // the first two gives the drone its slow shimmer
    const F1: f32 = 55.0;
    const F2: f32 = 166.0 / 3.0;
    const F3: f32 = 248.0 / 3.0;
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let lfo = 0.85 + 0.15 * (TAU * t / DURATION).sin();
        let wave = 0.5 * (TAU * F1 * t).sin()
            + 0.4 * (TAU * F2 * t).sin()
            + 0.25 * (TAU * F3 * t).sin();
        lfo * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::LoadingAmbient, sample_rate, samples)
}

/// Short mid-range beep for loading milestones.
fn loading_beep(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.08;
    const SCALE: f32 = 0.1;
    let env = Envelope::RaisedSine;
    let samples = sample_frames(sample_rate, DURATION, |t| {
        env.value(t, DURATION) * (TAU * 1250.0 * t).sin() * SCALE
    });
    SoundBuffer::from_mono(SoundName::LoadingBeep, sample_rate, samples)
}

/// Quick upward chirp: 600 Hz sweeping to 900 Hz.
fn loading_progress(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.15;
    const SCALE: f32 = 0.1;
    let env = Envelope::FadeInOut {
        attack: 0.01,
        release: 0.05,
    };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        env.value(t, DURATION) * (TAU * (600.0 + 2000.0 * t) * t).sin() * SCALE
    });
    SoundBuffer::from_mono(SoundName::LoadingProgress, sample_rate, samples)
}

/// Major-triad chord (C5/E5/G5) with a decaying tail.
fn loading_complete(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.6;
    const SCALE: f32 = 0.09;
    let env = Envelope::ExpDecay { k: 4.5 };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let wave = 0.45 * (TAU * 523.25 * t).sin()
            + 0.35 * (TAU * 659.25 * t).sin()
            + 0.3 * (TAU * 783.99 * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::LoadingComplete, sample_rate, samples)
}

/// Cold-boot sweep: slow rise through two octaves with a sub partial.
fn system_initialize(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 1.5;
    const SCALE: f32 = 0.08;
    let env = Envelope::FadeInOut {
        attack: 0.2,
        release: 0.4,
    };
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let wave = 0.55 * (TAU * (165.0 + 220.0 * t) * t).sin()
            + 0.3 * (TAU * (82.5 + 110.0 * t) * t).sin();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::SystemInitialize, sample_rate, samples)
}

/// Rapid warble between 1 kHz and 1.5 kHz with noise sprinkles.
fn data_transfer(sample_rate: u32) -> SoundBuffer {
    const DURATION: f32 = 0.5;
    const SCALE: f32 = 0.07;
    const PERIOD: f32 = 0.04;
    let env = Envelope::RampDown;
    let mut noise = Noise::new();
    let samples = sample_frames(sample_rate, DURATION, |t| {
        let freq = if (t / PERIOD) as u32 % 2 == 0 {
            1000.0
        } else {
            1500.0
        };
        let wave = (TAU * freq * t).sin() + 0.15 * noise.white();
        env.value(t, DURATION) * wave * SCALE
    });
    SoundBuffer::from_mono(SoundName::DataTransfer, sample_rate, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 48000;

    #[test]
    fn test_catalog_complete() {
        let buffers = render_catalog(RATE);
        assert_eq!(buffers.len(), SoundName::ALL.len());
        for (buffer, name) in buffers.iter().zip(SoundName::ALL) {
            assert_eq!(buffer.name(), name);
            assert!(!buffer.is_empty(), "{name} rendered empty");
            assert_eq!(buffer.sample_rate(), RATE);
        }
    }

    #[test]
    fn test_render_deterministic() {
        for name in SoundName::ALL {
            let a = render(name, RATE);
            let b = render(name, RATE);
            assert_eq!(a.frames(), b.frames(), "{name}");
            assert_eq!(a.left(), b.left(), "{name}");
            assert_eq!(a.right(), b.right(), "{name}");
        }
    }

    #[test]
    fn test_samples_bounded() {
        for buffer in render_catalog(RATE) {
            for &s in buffer.left() {
                assert!(
                    s.abs() <= 1.0,
                    "{} produced out-of-range sample {s}",
                    buffer.name()
                );
            }
        }
    }

    #[test]
    fn test_durations() {
        let cases = [
            (SoundName::Click, 0.06),
            (SoundName::Alert, 0.45),
            (SoundName::Typing, 0.045),
            (SoundName::Startup, 1.2),
            (SoundName::LoadingAmbient, 3.0),
        ];
        for (name, expected) in cases {
            let buffer = render(name, RATE);
            assert!(
                (buffer.duration_secs() - expected).abs() < 1e-3,
                "{name}: {}",
                buffer.duration_secs()
            );
        }
    }

    #[test]
    fn test_ambient_loop_seam() {
        let buffer = render(SoundName::LoadingAmbient, RATE);
        let first = buffer.left()[0];
        let last = buffer.left()[buffer.frames() - 1];
        // all partials are period-aligned, so both ends sit near zero
        assert!(first.abs() < 0.01, "loop start {first}");
        assert!(last.abs() < 0.01, "loop end {last}");
    }

    #[test]
    fn test_error_is_clipped() {
        // the square component should dominate: many samples near the
        // envelope ceiling, few in between
        let buffer = render(SoundName::Error, RATE);
        let peak = buffer
            .left()
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.05);
    }

    #[test]
    fn test_rate_scales_frames() {
        let a = render(SoundName::Click, 44100);
        let b = render(SoundName::Click, 48000);
        assert!(a.frames() < b.frames());
        assert!((a.duration_secs() - b.duration_secs()).abs() < 1e-3);
    }
}
