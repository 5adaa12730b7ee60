//! Game settings
//!
//! Chosen once at process start: the device class fixes the physics scales
//! for every run created from these settings.

use std::fs;
use std::io;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::{DeviceClass, GameState};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physics scaling class
    pub device: DeviceClass,
    /// Fixed seed for reproducible runs (random if unset)
    pub seed: Option<u64>,
    /// Host frame rate; one simulation step per frame
    pub frame_rate: u32,
    /// Stop a headless run after this many steps
    pub max_steps: Option<u64>,
    /// Let the demo steering play
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: DeviceClass::Desktop,
            seed: None,
            frame_rate: 60,
            max_steps: Some(60 * 60 * 5),
            autopilot: true,
        }
    }
}

impl Settings {
    /// Seconds per step
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Configured seed, or a fresh one from OS entropy
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// Build a new run from these settings
    pub fn new_game(&self) -> GameState {
        GameState::new(self.resolve_seed(), self.device)
    }

    /// Override the device class by name
    pub fn set_device(&mut self, name: &str) -> Result<(), SettingsError> {
        self.device =
            DeviceClass::from_name(name).ok_or_else(|| SettingsError::UnknownDevice(name.to_string()))?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.device, DeviceClass::Desktop);
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"device":"mobile","seed":7}"#).unwrap();
        assert_eq!(settings.device, DeviceClass::Mobile);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.frame_rate, 60);

        let game = settings.new_game();
        assert_eq!(game.seed, 7);
        assert_eq!(game.device, DeviceClass::Mobile);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json(r#"{"device":"console"}"#),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_set_device() {
        let mut settings = Settings::default();
        settings.set_device("Tablet").unwrap();
        assert_eq!(settings.device, DeviceClass::Tablet);
        assert!(matches!(
            settings.set_device("fridge"),
            Err(SettingsError::UnknownDevice(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(99),
            autopilot: false,
            ..Default::default()
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tommy-jumper-no-such-settings.json");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
