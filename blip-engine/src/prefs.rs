//! Playback preference persistence
//!
//! Stores master volume, ambient loop volume, and the mute flag in a
//! simple key=value file under the platform config directory. Loading is
//! best effort: a missing or garbled file yields defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// User playback preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefs {
    /// Overall output level (0.0 - 2.0).
    pub master_volume: f32,
    /// Gain of the looping ambient drone (0.0 - 1.0).
    pub ambient_volume: f32,
    /// Whether all sound output is muted.
    pub muted: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            ambient_volume: 0.35,
            muted: false,
        }
    }
}

impl Prefs {
    /// Load preferences from the default location.
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = Self::prefs_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load preferences from a specific path.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save preferences to the default location.
    pub fn save(&self) -> io::Result<()> {
        let path = Self::prefs_path();
        self.save_to(&path)
    }

    /// Save preferences to a specific path.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    /// Default preferences file path.
    pub fn prefs_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blip")
            .join("prefs.txt")
    }

    /// Parse preferences from simple key=value format.
    fn parse(content: &str) -> Self {
        let mut prefs = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "master_volume" => {
                        if let Ok(v) = value.parse::<f32>() {
                            prefs.master_volume = v.clamp(0.0, 2.0);
                        }
                    }
                    "ambient_volume" => {
                        if let Ok(v) = value.parse::<f32>() {
                            prefs.ambient_volume = v.clamp(0.0, 1.0);
                        }
                    }
                    "muted" => {
                        prefs.muted = value == "true" || value == "1";
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        prefs
    }

    /// Serialize preferences to simple key=value format.
    fn serialize(&self) -> String {
        format!(
            "# Blip playback preferences\nmaster_volume={}\nambient_volume={}\nmuted={}",
            self.master_volume, self.ambient_volume, self.muted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_gives_defaults() {
        assert_eq!(Prefs::parse(""), Prefs::default());
    }

    #[test]
    fn test_parse_values() {
        let prefs = Prefs::parse("master_volume=0.8\nambient_volume=0.2\nmuted=true");
        assert_eq!(prefs.master_volume, 0.8);
        assert_eq!(prefs.ambient_volume, 0.2);
        assert!(prefs.muted);
    }

    #[test]
    fn test_parse_clamps_ranges() {
        let prefs = Prefs::parse("master_volume=99\nambient_volume=-3");
        assert_eq!(prefs.master_volume, 2.0);
        assert_eq!(prefs.ambient_volume, 0.0);
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let prefs = Prefs::parse("# comment\nmaster_volume=loud\nnot a line\nunknown=1");
        assert_eq!(prefs, Prefs::default());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let prefs = Prefs {
            master_volume: 1.5,
            ambient_volume: 0.4,
            muted: true,
        };
        assert_eq!(Prefs::parse(&prefs.serialize()), prefs);
    }
}
