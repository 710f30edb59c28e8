//! Flap Emonad - a razor-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (time normalization, physics, collisions, game state)
//! - `effects`: Time-driven cosmetic effects (shake, flash, slow motion, particles)
//! - `audio`: Cue playback and the session-gated music sequencer
//! - `render`: Frame planning and the Canvas 2D presenter
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod effects;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Per-tick quantities are expressed at the 60 Hz reference tick and get
/// multiplied by the frame's time scale.
pub mod consts {
    /// Reference frame rate the per-tick constants are tuned for
    pub const TARGET_FPS: f32 = 60.0;
    /// Nominal frame duration in milliseconds (~16.67)
    pub const TARGET_FRAME_MS: f32 = 1000.0 / TARGET_FPS;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 1080.0;
    pub const GAME_HEIGHT: f32 = 1620.0;

    /// Player physics (per reference tick)
    pub const GRAVITY: f32 = 1.2;
    /// Velocity set on flap (not added)
    pub const JUMP_VELOCITY: f32 = -24.0;
    pub const MAX_FALL_SPEED: f32 = 34.0;
    /// Degrees per tick while falling
    pub const ROTATION_SPEED: f32 = 4.0;
    pub const JUMP_ROTATION: f32 = -25.0;
    pub const MAX_ROTATION: f32 = 90.0;

    /// Player sprite box and fixed x
    pub const PLAYER_WIDTH: f32 = 270.0;
    pub const PLAYER_HEIGHT: f32 = 270.0;
    pub const PLAYER_X: f32 = 270.0;
    pub const PLAYER_START_Y: f32 = GAME_HEIGHT / 2.0 - PLAYER_HEIGHT / 2.0;
    /// Hitbox shrink on every side
    pub const HITBOX_PADDING: f32 = 40.0;

    /// Animation thresholds (ms)
    pub const FLAP_FRAME_MS: f32 = 100.0;
    pub const DEATH_FRAME_MS: f32 = 300.0;
    pub const ANIMATION_FRAMES: u8 = 3;

    /// Razors
    pub const RAZOR_WIDTH: f32 = 170.0;
    pub const RAZOR_GAP: f32 = 470.0;
    pub const RAZOR_SPEED: f32 = 8.5;
    pub const RAZOR_SPAWN_INTERVAL_MS: f32 = 1800.0;
    pub const MIN_RAZOR_Y: f32 = 270.0;
    pub const MAX_RAZOR_Y: f32 = GAME_HEIGHT - RAZOR_GAP - 270.0;
    /// Blade hitbox inset from the razor's left and right edges
    pub const BLADE_MARGIN: f32 = 17.0;

    /// Delay between entering game over and the game-over music (ms)
    pub const GAME_OVER_MUSIC_DELAY_MS: f32 = 600.0;
}
