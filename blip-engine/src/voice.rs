//! Playback voices - one in-flight rendering of a sound buffer

use blip_synth::{SoundBuffer, SoundName};
use std::sync::Arc;

/// A single playback of a buffer at a fixed gain.
///
/// Non-looping voices run the buffer once and report finished; the mixer
/// sweeps them afterwards. A looping voice wraps at the buffer end and only
/// stops when the mixer drops it.
pub struct Voice {
    buffer: Arc<SoundBuffer>,
    position: usize,
    gain: f32,
    looping: bool,
}

impl Voice {
    /// Create a voice. Gain is clamped to [0, 1]; out-of-range or
    /// non-finite requests are corrected silently, not rejected.
    pub fn new(buffer: Arc<SoundBuffer>, gain: f32, looping: bool) -> Self {
        let gain = if gain.is_finite() {
            gain.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            buffer,
            position: 0,
            gain,
            looping,
        }
    }

    pub fn name(&self) -> SoundName {
        self.buffer.name()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// True once a non-looping voice has rendered its whole buffer.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.position >= self.buffer.frames()
    }

    /// Produce the next gain-scaled stereo frame, advancing the playhead.
    ///
    /// Returns `None` when the voice is finished (or its buffer is empty);
    /// looping voices wrap instead.
    #[inline]
    pub fn next_frame(&mut self) -> Option<(f32, f32)> {
        let frames = self.buffer.frames();
        if frames == 0 {
            return None;
        }
        if self.position >= frames {
            if self.looping {
                self.position = 0;
            } else {
                return None;
            }
        }
        let (l, r) = self.buffer.frame(self.position);
        self.position += 1;
        Some((l * self.gain, r * self.gain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blip_synth::render;

    fn buffer(name: SoundName) -> Arc<SoundBuffer> {
        Arc::new(render(name, 48000))
    }

    #[test]
    fn test_gain_clamped() {
        let buf = buffer(SoundName::Click);
        assert_eq!(Voice::new(buf.clone(), 3.5, false).gain(), 1.0);
        assert_eq!(Voice::new(buf.clone(), -0.5, false).gain(), 0.0);
        assert_eq!(Voice::new(buf.clone(), f32::NAN, false).gain(), 0.0);
        assert_eq!(Voice::new(buf, 0.4, false).gain(), 0.4);
    }

    #[test]
    fn test_runs_to_completion() {
        let buf = buffer(SoundName::Click);
        let frames = buf.frames();
        let mut voice = Voice::new(buf, 1.0, false);
        for _ in 0..frames {
            assert!(voice.next_frame().is_some());
        }
        assert!(voice.next_frame().is_none());
        assert!(voice.is_finished());
    }

    #[test]
    fn test_looping_wraps() {
        let buf = buffer(SoundName::LoadingBeep);
        let frames = buf.frames();
        let mut voice = Voice::new(buf.clone(), 1.0, true);
        for _ in 0..frames {
            voice.next_frame();
        }
        // wrapped: frame matches the buffer start again
        let (l, _) = voice.next_frame().unwrap();
        assert_eq!(l, buf.frame(0).0);
        assert!(!voice.is_finished());
    }

    #[test]
    fn test_gain_scales_output() {
        let buf = buffer(SoundName::Alert);
        let mut full = Voice::new(buf.clone(), 1.0, false);
        let mut half = Voice::new(buf, 0.5, false);
        for _ in 0..100 {
            let (fl, _) = full.next_frame().unwrap();
            let (hl, _) = half.next_frame().unwrap();
            assert!((hl - fl * 0.5).abs() < 1e-6);
        }
    }
}
