//! Rendered sample storage

use crate::catalog::SoundName;

/// An immutable, named, precomputed sound effect.
///
/// Holds two equal-length channels of f32 samples in roughly [-1, 1].
/// Buffers are rendered once at engine initialization and shared by
/// reference afterwards; nothing mutates them.
#[derive(Debug, Clone)]
pub struct SoundBuffer {
    name: SoundName,
    sample_rate: u32,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl SoundBuffer {
    /// Build a buffer from mono samples, duplicating them to both channels.
    ///
    /// Every catalog formula is channel-symmetric, so rendering mono and
    /// mirroring is equivalent to rendering each channel separately.
    pub(crate) fn from_mono(name: SoundName, sample_rate: u32, samples: Vec<f32>) -> Self {
        let right = samples.clone();
        Self {
            name,
            sample_rate,
            left: samples,
            right,
        }
    }

    /// Catalog name this buffer was rendered for.
    pub fn name(&self) -> SoundName {
        self.name
    }

    /// Sample rate the buffer was rendered at, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Duration in seconds, derived from frame count and sample rate.
    pub fn duration_secs(&self) -> f64 {
        self.left.len() as f64 / self.sample_rate as f64
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Stereo frame at `index`.
    ///
    /// Callers must keep `index < frames()`; the mixer advances voices
    /// within bounds.
    #[inline]
    pub fn frame(&self, index: usize) -> (f32, f32) {
        (self.left[index], self.right[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_equal_length() {
        let buf = SoundBuffer::from_mono(SoundName::Click, 48000, vec![0.1, -0.2, 0.3]);
        assert_eq!(buf.left().len(), buf.right().len());
        assert_eq!(buf.frames(), 3);
    }

    #[test]
    fn test_duration_derived() {
        let buf = SoundBuffer::from_mono(SoundName::Click, 48000, vec![0.0; 24000]);
        assert!((buf.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_frame_mirrors_channels() {
        let buf = SoundBuffer::from_mono(SoundName::Typing, 44100, vec![0.5, -0.5]);
        assert_eq!(buf.frame(0), (0.5, 0.5));
        assert_eq!(buf.frame(1), (-0.5, -0.5));
    }
}
