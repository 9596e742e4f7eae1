//! User settings persistence — save/load config to JSON file.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted user settings. Saved to `~/.config/outpost/settings.json`.
#[derive(Resource, Serialize, Deserialize, Clone)]
pub struct UserSettings {
    /// Multiplier on drag-pan deltas.
    pub pan_sensitivity: f32,
    /// Keep simulating at full rate when the window loses focus.
    #[serde(default)]
    pub background_fps: bool,
    /// Frame rate cap (0 disables the limiter).
    #[serde(default = "default_frame_cap")]
    pub frame_cap: f64,
}

fn default_frame_cap() -> f64 {
    60.0
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            pan_sensitivity: 1.0,
            background_fps: false,
            frame_cap: 60.0,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    let dir = PathBuf::from(home).join(".config").join("outpost");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("settings.json"))
}

pub fn save_settings(settings: &UserSettings) {
    let Some(path) = settings_path() else { return };
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                warn!("Failed to save settings: {}", e);
            }
        }
        Err(e) => warn!("Failed to serialize settings: {}", e),
    }
}

pub fn load_settings() -> UserSettings {
    let Some(path) = settings_path() else { return UserSettings::default() };
    match std::fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => UserSettings::default(),
    }
}
