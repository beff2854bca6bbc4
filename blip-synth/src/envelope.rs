//! Amplitude envelopes
//!
//! Shapes the attack and release of each rendered cue. Envelopes are pure
//! functions of time and total duration, evaluated once per sample.

use std::f32::consts::PI;

/// Amplitude envelope shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Exponential decay `e^(-k*t)`; larger `k` kills the tail faster.
    ExpDecay { k: f32 },
    /// Half-sine arch `sin(pi*t/duration)`: silent at both ends, peak at
    /// the midpoint.
    RaisedSine,
    /// Linear ramp from full level down to silence.
    RampDown,
    /// Linear ramp from silence up to full level.
    RampUp,
    /// Linear fade-in over `attack` seconds and fade-out over `release`
    /// seconds; unity in between.
    FadeInOut { attack: f32, release: f32 },
}

impl Envelope {
    /// Envelope value at time `t` of a sound lasting `duration` seconds.
    ///
    /// Output is clamped to [0, 1] so a mis-tuned shape can never boost the
    /// signal above its partial weights.
    #[inline]
    pub fn value(&self, t: f32, duration: f32) -> f32 {
        let v = match self {
            Envelope::ExpDecay { k } => (-k * t).exp(),
            Envelope::RaisedSine => (PI * t / duration).sin(),
            Envelope::RampDown => 1.0 - t / duration,
            Envelope::RampUp => t / duration,
            Envelope::FadeInOut { attack, release } => {
                let fade_in = if *attack > 0.0 { t / attack } else { 1.0 };
                let fade_out = if *release > 0.0 {
                    (duration - t) / release
                } else {
                    1.0
                };
                fade_in.min(fade_out).min(1.0)
            }
        };
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_decay_starts_at_unity() {
        let env = Envelope::ExpDecay { k: 40.0 };
        assert!((env.value(0.0, 1.0) - 1.0).abs() < 1e-6);
        assert!(env.value(0.5, 1.0) < 1e-6);
    }

    #[test]
    fn test_raised_sine_silent_at_ends() {
        let env = Envelope::RaisedSine;
        assert!(env.value(0.0, 0.4).abs() < 1e-6);
        assert!(env.value(0.4, 0.4).abs() < 1e-4);
        assert!((env.value(0.2, 0.4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ramps() {
        assert!((Envelope::RampDown.value(0.0, 1.0) - 1.0).abs() < 1e-6);
        assert!(Envelope::RampDown.value(1.0, 1.0).abs() < 1e-6);
        assert!(Envelope::RampUp.value(0.0, 1.0).abs() < 1e-6);
        assert!((Envelope::RampUp.value(1.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fade_in_out_plateau() {
        let env = Envelope::FadeInOut {
            attack: 0.1,
            release: 0.2,
        };
        assert!(env.value(0.0, 1.0).abs() < 1e-6);
        assert!((env.value(0.5, 1.0) - 1.0).abs() < 1e-6);
        assert!((env.value(0.05, 1.0) - 0.5).abs() < 1e-6);
        assert!((env.value(0.9, 1.0) - 0.5).abs() < 1e-6);
        assert!(env.value(1.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_never_exceeds_unity() {
        let shapes = [
            Envelope::ExpDecay { k: 10.0 },
            Envelope::RaisedSine,
            Envelope::RampDown,
            Envelope::RampUp,
            Envelope::FadeInOut {
                attack: 0.05,
                release: 0.05,
            },
        ];
        for env in shapes {
            for i in 0..=100 {
                let t = i as f32 * 0.01;
                let v = env.value(t, 1.0);
                assert!((0.0..=1.0).contains(&v), "{env:?} at t={t}: {v}");
            }
        }
    }
}
