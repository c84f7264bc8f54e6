//! Page settings
//!
//! Read once at start-up from an optional JSON element embedded in the page:
//!
//! ```html
//! <script id="target-lock-config" type="application/json">
//!   { "control_selector": ".pixel-btn", "tuning": { "max_targets": 60 } }
//! </script>
//! ```
//!
//! Missing fields keep their defaults. Nothing is ever written back.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Page wiring, audio and gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay tuning
    pub tuning: Tuning,

    // === Page wiring ===
    /// Id of the overlay canvas
    pub canvas_id: String,
    /// Id of the remaining-count text element
    pub status_id: String,
    /// Id of the win banner element
    pub banner_id: String,
    /// CSS selector matching the guarded controls
    pub control_selector: String,
    /// Class toggled on a control while a target covers it
    pub blocked_class: String,
    /// Class removed from the banner to reveal it
    pub hidden_class: String,

    // === Sprites ===
    pub face_src: String,
    pub alarmed_face_src: String,

    // === Audio ===
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),

            canvas_id: "game-canvas".into(),
            status_id: "ui".into(),
            banner_id: "win-banner".into(),
            control_selector: ".pixel-btn".into(),
            blocked_class: "is-locked".into(),
            hidden_class: "hidden".into(),

            face_src: "assets/face.png".into(),
            alarmed_face_src: "assets/face_scared.png".into(),

            volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Id of the embedded config element
    pub const CONFIG_ELEMENT_ID: &'static str = "target-lock-config";

    /// Parse settings from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.volume = settings.volume.clamp(0.0, 1.0);

        let tuning = settings.tuning.clone().sanitized();
        if tuning != settings.tuning {
            log::warn!("Config tuning out of range, invalid values reset to defaults");
            settings.tuning = tuning;
        }
        Ok(settings)
    }

    /// Effective audio gain multiplier
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Load settings from the embedded config element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(text) = text else {
            log::info!("No config element, using default settings");
            return Self::default();
        };

        match Self::from_json(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                settings
            }
            Err(e) => {
                log::warn!("Invalid config ({e}), using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "control_selector": "a.guarded", "tuning": { "max_targets": 12 } }"#)
                .unwrap();
        assert_eq!(settings.control_selector, "a.guarded");
        assert_eq!(settings.tuning.max_targets, 12);
        assert_eq!(settings.tuning.target_size, crate::consts::TARGET_SIZE);
        assert_eq!(settings.canvas_id, "game-canvas");
    }

    #[test]
    fn test_volume_is_clamped_and_mute_wins() {
        let settings = Settings::from_json(r#"{ "volume": 3.5 }"#).unwrap();
        assert_eq!(settings.volume, 1.0);

        let muted = Settings::from_json(r#"{ "volume": 0.5, "muted": true }"#).unwrap();
        assert_eq!(muted.effective_volume(), 0.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_unusable_tuning_falls_back_to_defaults() {
        let settings = Settings::from_json(
            r#"{ "tuning": {
                "trail_decay": 0, "particle_decay": -0.5, "hit_margin": -100,
                "target_size": 0, "grid_spacing": -1, "jitter": -3,
                "max_targets": 12
            } }"#,
        )
        .unwrap();
        let tuning = &settings.tuning;
        let defaults = Tuning::default();
        assert_eq!(tuning.trail_decay, defaults.trail_decay);
        assert_eq!(tuning.particle_decay, defaults.particle_decay);
        assert_eq!(tuning.hit_margin, defaults.hit_margin);
        assert_eq!(tuning.target_size, defaults.target_size);
        assert_eq!(tuning.grid_spacing, defaults.grid_spacing);
        assert_eq!(tuning.jitter, defaults.jitter);
        // Valid values survive
        assert_eq!(tuning.max_targets, 12);
    }

    #[test]
    fn test_loaded_tuning_keeps_board_playable() {
        use crate::sim::{BoardState, build_board, tick};
        use glam::Vec2;
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let settings = Settings::from_json(
            r#"{ "tuning": { "trail_decay": 0, "particle_decay": 0, "hit_margin": -100 } }"#,
        )
        .unwrap();
        let viewport = Vec2::new(800.0, 600.0);
        let mut state = BoardState::new(settings.tuning, viewport);
        build_board(&mut state, viewport);

        // Every face can still be hit at its center
        let center = state.targets[0].center();
        assert_eq!(state.target_at(center), Some(0));

        // Particles and trail points still expire
        let mut rng = Pcg32::seed_from_u64(9);
        state.spawn_burst(center, &mut rng);
        for _ in 0..100 {
            tick(&mut state, &mut rng);
        }
        assert!(state.particles.is_empty());
        assert!(state.trail.len() <= 11);
    }

    #[test]
    fn test_sanitized_keeps_valid_tuning() {
        let tuning = Tuning {
            hit_margin: 0.0,
            jitter: 0.0,
            target_size: 32.0,
            ..Tuning::default()
        };
        assert_eq!(tuning.clone().sanitized(), tuning);
    }
}
