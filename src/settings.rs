//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/stride/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stride_core::TimeConfig;
use stride_game::LocomotionConfig;
use stride_physics::PhysicsConfig;
use tracing::{info, warn};

/// Everything the headless host can be tuned with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub locomotion: LocomotionConfig,
    pub time: TimeConfig,
    pub physics: PhysicsConfig,
    pub run: RunSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            locomotion: LocomotionConfig::default(),
            time: TimeConfig::default(),
            physics: PhysicsConfig::default(),
            run: RunSettings::default(),
        }
    }
}

impl SimulationSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse and validate settings from TOML
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.locomotion.validate()?;
        settings.time.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Headless run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Simulated seconds to run
    pub duration: f32,
    /// Simulated frame rate of the host loop
    pub frame_rate: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            duration: 12.0,
            frame_rate: 60.0,
        }
    }
}
