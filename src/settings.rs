//! Player preferences
//!
//! Persisted in LocalStorage on web. Round timing lives in `tuning`.

use serde::{Deserialize, Serialize};

use crate::consts::DOLL_MODEL_PATH;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Doll model location (glTF or GLB)
    pub model_path: String,

    // === Audio ===
    /// Play sound cues
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: DOLL_MODEL_PATH.to_string(),
            sound: true,
            master_volume: 0.8,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "red_light_settings";

    /// Effective volume (0 when sound is off)
    pub fn volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Parse stored settings, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model_path, DOLL_MODEL_PATH);
        assert!((settings.volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            sound: false,
            ..Default::default()
        };
        assert_eq!(settings.volume(), 0.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            ..Default::default()
        };
        assert_eq!(settings.volume(), 1.0);
    }

    #[test]
    fn test_from_json_partial_and_garbage() {
        let settings = Settings::from_json(r#"{"sound": false}"#);
        assert!(!settings.sound);
        assert_eq!(settings.model_path, DOLL_MODEL_PATH);

        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_json_roundtrip_keeps_model_path() {
        let settings = Settings {
            model_path: "/models/doll.glb".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).model_path, "/models/doll.glb");
    }
}
