//! Sound catalog - the fixed set of interface cues

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unrecognized sound key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sound: {0}")]
pub struct UnknownSound(pub String);

/// Identifier for a catalog cue.
///
/// The catalog is fixed at compile time; an initialized engine holds exactly
/// one rendered buffer per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundName {
    /// Short high tick for button presses.
    Click,
    /// Two-pitch alarm alternation.
    Alert,
    /// Rising confirmation sweep.
    Success,
    /// Distorted low buzz.
    Error,
    /// Percussive keypress tick.
    Typing,
    /// Long rising power-on sweep.
    Startup,
    /// Low drone, looped while a long operation runs.
    LoadingAmbient,
    /// Short mid-range beep for loading milestones.
    LoadingBeep,
    /// Quick upward chirp for incremental progress.
    LoadingProgress,
    /// Major-triad chord marking the end of a loading phase.
    LoadingComplete,
    /// Slow two-octave sweep for a cold boot.
    SystemInitialize,
    /// Rapid two-pitch warble with noise sprinkles.
    DataTransfer,
}

impl SoundName {
    /// All catalog entries, in render order.
    pub const ALL: [SoundName; 12] = [
        SoundName::Click,
        SoundName::Alert,
        SoundName::Success,
        SoundName::Error,
        SoundName::Typing,
        SoundName::Startup,
        SoundName::LoadingAmbient,
        SoundName::LoadingBeep,
        SoundName::LoadingProgress,
        SoundName::LoadingComplete,
        SoundName::SystemInitialize,
        SoundName::DataTransfer,
    ];

    /// Stable string key for this cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundName::Click => "click",
            SoundName::Alert => "alert",
            SoundName::Success => "success",
            SoundName::Error => "error",
            SoundName::Typing => "typing",
            SoundName::Startup => "startup",
            SoundName::LoadingAmbient => "loading_ambient",
            SoundName::LoadingBeep => "loading_beep",
            SoundName::LoadingProgress => "loading_progress",
            SoundName::LoadingComplete => "loading_complete",
            SoundName::SystemInitialize => "system_initialize",
            SoundName::DataTransfer => "data_transfer",
        }
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundName {
    type Err = UnknownSound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundName::ALL
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownSound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(SoundName::ALL.len(), 12);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in SoundName::ALL.iter().enumerate() {
            for b in &SoundName::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for name in SoundName::ALL {
            assert_eq!(name.as_str().parse::<SoundName>(), Ok(name));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "kaboom".parse::<SoundName>(),
            Err(UnknownSound("kaboom".to_string()))
        );
    }
}
