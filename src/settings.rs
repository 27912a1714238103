//! Game settings and preferences
//!
//! Read from LocalStorage in the browser and from the JSON file named by
//! `ROSE_QUEST_SETTINGS` on native. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::driver::Control;
use crate::renderer::SceneOptions;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Particle pool capacity for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 2048,
        }
    }
}

/// Keyboard key names (as reported by `KeyboardEvent.key`) for each control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into()],
            right: vec!["ArrowRight".into()],
            jump: vec![" ".into()],
        }
    }
}

impl KeyBindings {
    /// Control bound to `key`, if any. Left is checked first.
    pub fn control_for(&self, key: &str) -> Option<Control> {
        let bound = |keys: &[String]| keys.iter().any(|k| k == key);
        if bound(&self.left) {
            Some(Control::Left)
        } else if bound(&self.right) {
            Some(Control::Right)
        } else if bound(&self.jump) {
            Some(Control::Jump)
        } else {
            None
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle bursts (dust, candy, damage, petals, celebration)
    pub particles: bool,
    /// Sparkles, sparks and the rose trail
    pub effects: bool,

    // === HUD ===
    /// Show the level progress bar
    pub show_progress: bool,

    // === Input ===
    pub keys: KeyBindings,

    // === Accessibility ===
    /// Reduced motion (no grass sway, no sun parallax)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            effects: true,
            show_progress: true,
            keys: KeyBindings::default(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective particle pool capacity
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Render toggles for the scene pass
    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            effects: self.effects,
            reduced_motion: self.reduced_motion,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "rose_quest_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Environment variable naming the native settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub const PATH_VAR: &'static str = "ROSE_QUEST_SETTINGS";

    /// Load settings from the file named by `ROSE_QUEST_SETTINGS`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::PATH_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };
        let path = std::path::PathBuf::from(path);
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}
