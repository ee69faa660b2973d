//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/ironhaven/settings.toml`

use std::fs;
use std::path::PathBuf;

use ironhaven_world::ChunkConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All driver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub world: ChunkConfig,
    pub simulation: SimulationSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ironhaven"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
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
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse and validate a settings document
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.world.validate()?;
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

/// Headless run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fixed ticks per second
    pub tick_rate: u32,
    /// Length of the scripted run in game seconds
    pub duration_secs: f32,
    /// Player walking speed in units per second
    pub walk_speed: f32,
    /// Time scale multiplier (affects gameplay speed)
    pub time_scale: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            duration_secs: 90.0,
            walk_speed: 6.0,
            time_scale: 1.0,
        }
    }
}

impl SimulationSettings {
    /// Seconds per tick
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs.max(0.0) * self.tick_rate.max(1) as f32) as u64
    }
}
