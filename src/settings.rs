//! Player preferences
//!
//! Persisted as JSON in LocalStorage. Unknown or missing fields fall back to
//! their defaults so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::audio::MixLevels;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music bus volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects bus volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Screen shake on death
    pub screen_shake: bool,
    /// White flash on death
    pub flash: bool,
    /// Score bursts and background motes
    pub particles: bool,
    /// Afterimages behind the player
    pub trails: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, flash or slow-motion zoom)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mix = MixLevels::default();
        Self {
            master_volume: mix.master,
            music_volume: mix.music,
            sfx_volume: mix.sfx,
            muted: false,

            screen_shake: true,
            flash: true,
            particles: true,
            trails: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective death flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash && !self.reduced_motion
    }

    /// Whether the slow-motion zoom is applied to the camera
    pub fn effective_zoom(&self) -> bool {
        !self.reduced_motion
    }

    /// Bus gains for the audio output
    pub fn to_mix(&self) -> MixLevels {
        MixLevels {
            master: self.master_volume.clamp(0.0, 1.0),
            music: self.music_volume.clamp(0.0, 1.0),
            sfx: self.sfx_volume.clamp(0.0, 1.0),
            muted: self.muted,
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Parse a stored document, `None` if it is not valid JSON
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flap_emonad_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.as_deref().map(Self::from_json) {
            Some(Some(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(None) => {
                log::warn!("Stored settings are corrupt, using defaults");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };

        if let Ok(json) = serde_json::to_string(self) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
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
