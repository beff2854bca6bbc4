//! Voice mixer - sums active voices into the output stream
//!
//! Fire-and-forget voices mix additively and are swept once finished. The
//! ambient loop occupies a dedicated slot so there is never more than one.
//! Master volume is smoothed per sample to avoid zipper noise and the mix
//! bus is soft-clipped so overlapping cues stay clean.

use crate::voice::Voice;

/// Polyphony cap. Cues are tens of milliseconds long, so hitting this
/// means something is spamming play; the oldest voice is evicted.
const MAX_VOICES: usize = 32;

/// Smoothing coefficient for master volume (~5ms at 48kHz).
const MASTER_VOLUME_SMOOTH_COEFF: f32 = 0.995;

/// Mixes the active voice set into interleaved output buffers.
pub struct VoiceMixer {
    voices: Vec<Voice>,
    /// The single looping ambient slot.
    ambient: Option<Voice>,
    master_volume: f32,
    smoothed_master_volume: f32,
    muted: bool,
}

impl Default for VoiceMixer {
    fn default() -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
            ambient: None,
            master_volume: 1.0,
            smoothed_master_volume: 1.0,
            muted: false,
        }
    }
}

impl VoiceMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an independent fire-and-forget voice. Concurrent spawns of the
    /// same sound overlap; there is no de-duplication or queueing.
    pub fn spawn(&mut self, voice: Voice) {
        if self.voices.len() >= MAX_VOICES {
            tracing::debug!(sound = voice.name().as_str(), "voice cap hit, evicting oldest");
            self.voices.remove(0);
        }
        self.voices.push(voice);
    }

    /// Install `voice` as the ambient loop, replacing any current one.
    ///
    /// Replacement happens in one step under the mixer lock, so there is no
    /// window where two ambient loops are registered.
    pub fn start_ambient(&mut self, voice: Voice) {
        self.ambient = Some(voice);
    }

    /// Stop the ambient loop. Returns whether one was playing; stopping
    /// with none active is a no-op.
    pub fn stop_ambient(&mut self) -> bool {
        self.ambient.take().is_some()
    }

    pub fn has_ambient(&self) -> bool {
        self.ambient.is_some()
    }

    /// Number of fire-and-forget voices still rendering.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Set master volume (0.0 to 2.0, same range a mixer fader covers).
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 2.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Drop every voice, ambient included.
    pub fn clear(&mut self) {
        self.voices.clear();
        self.ambient = None;
    }

    /// Mix all voices into `output`, an interleaved buffer of `channels`
    /// channels. Stereo maps directly, mono gets the channel average, and
    /// any extra channels stay silent. Finished voices are swept afterwards.
    pub fn mix(&mut self, output: &mut [f32], channels: usize) {
        output.fill(0.0);
        if channels == 0 {
            return;
        }

        let target_volume = if self.muted { 0.0 } else { self.master_volume };
        let frames = output.len() / channels;

        for frame_idx in 0..frames {
            self.smoothed_master_volume = MASTER_VOLUME_SMOOTH_COEFF * self.smoothed_master_volume
                + (1.0 - MASTER_VOLUME_SMOOTH_COEFF) * target_volume;

            let mut left = 0.0;
            let mut right = 0.0;
            if let Some(ambient) = self.ambient.as_mut() {
                if let Some((l, r)) = ambient.next_frame() {
                    left += l;
                    right += r;
                }
            }
            for voice in self.voices.iter_mut() {
                if let Some((l, r)) = voice.next_frame() {
                    left += l;
                    right += r;
                }
            }

            left *= self.smoothed_master_volume;
            right *= self.smoothed_master_volume;

            let base = frame_idx * channels;
            if channels == 1 {
                output[base] = soft_clip((left + right) * 0.5);
            } else {
                output[base] = soft_clip(left);
                output[base + 1] = soft_clip(right);
            }
        }

        self.voices.retain(|v| !v.is_finished());
    }
}

/// Soft clip threshold - the bus passes through untouched below this.
const SOFT_CLIP_THRESHOLD: f32 = 0.75;
/// Soft clip ceiling - peaks asymptotically approach this level.
const SOFT_CLIP_CEILING: f32 = 0.89;

/// Gentle soft clipper for the mix bus.
///
/// Transparent below the threshold, then an exponential knee that
/// approaches the ceiling asymptotically, so stacked cues compress rather
/// than fold over into digital clipping.
#[inline(always)]
fn soft_clip(x: f32) -> f32 {
    let abs_x = x.abs();
    if abs_x <= SOFT_CLIP_THRESHOLD {
        return x;
    }

    let sign = x.signum();
    let knee_width = SOFT_CLIP_CEILING - SOFT_CLIP_THRESHOLD;
    let ratio = (abs_x - SOFT_CLIP_THRESHOLD) / knee_width;
    let compressed = SOFT_CLIP_THRESHOLD + knee_width * (1.0 - (-ratio * 3.0).exp());
    sign * compressed.min(SOFT_CLIP_CEILING)
}
