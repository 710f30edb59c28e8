//! Data-driven game balance
//!
//! Defaults mirror `consts`. A JSON document may override any subset of
//! fields; missing fields keep their default.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    pub rotation_speed: f32,
    pub jump_rotation: f32,
    pub max_rotation: f32,
    pub hitbox_padding: f32,
    pub flap_frame_ms: f32,
    pub death_frame_ms: f32,
    pub razor_speed: f32,
    pub razor_gap: f32,
    pub razor_spawn_interval_ms: f32,
    pub min_razor_y: f32,
    pub max_razor_y: f32,
    pub blade_margin: f32,
    pub game_over_music_delay_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            max_fall_speed: MAX_FALL_SPEED,
            rotation_speed: ROTATION_SPEED,
            jump_rotation: JUMP_ROTATION,
            max_rotation: MAX_ROTATION,
            hitbox_padding: HITBOX_PADDING,
            flap_frame_ms: FLAP_FRAME_MS,
            death_frame_ms: DEATH_FRAME_MS,
            razor_speed: RAZOR_SPEED,
            razor_gap: RAZOR_GAP,
            razor_spawn_interval_ms: RAZOR_SPAWN_INTERVAL_MS,
            min_razor_y: MIN_RAZOR_Y,
            max_razor_y: MAX_RAZOR_Y,
            blade_margin: BLADE_MARGIN,
            game_over_music_delay_ms: GAME_OVER_MUSIC_DELAY_MS,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON, or a field has the wrong type
    Parse(serde_json::Error),
    /// A value is outside the range the simulation can handle
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "tuning parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value keeps the simulation well-formed
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("rotation_speed", self.rotation_speed),
            ("flap_frame_ms", self.flap_frame_ms),
            ("death_frame_ms", self.death_frame_ms),
            ("razor_speed", self.razor_speed),
            ("razor_gap", self.razor_gap),
            ("razor_spawn_interval_ms", self.razor_spawn_interval_ms),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        if self.jump_velocity >= 0.0 {
            return Err(TuningError::Invalid {
                field: "jump_velocity",
                reason: "must point upward (negative)",
            });
        }
        if self.hitbox_padding < 0.0
            || self.hitbox_padding * 2.0 >= PLAYER_WIDTH.min(PLAYER_HEIGHT)
        {
            return Err(TuningError::Invalid {
                field: "hitbox_padding",
                reason: "must leave a non-empty hitbox",
            });
        }
        if self.blade_margin < 0.0 || self.blade_margin * 2.0 >= RAZOR_WIDTH {
            return Err(TuningError::Invalid {
                field: "blade_margin",
                reason: "must leave a non-empty blade",
            });
        }
        if self.min_razor_y < 0.0 || self.min_razor_y > self.max_razor_y {
            return Err(TuningError::Invalid {
                field: "min_razor_y",
                reason: "must be within [0, max_razor_y]",
            });
        }
        if self.max_razor_y + self.razor_gap > GAME_HEIGHT {
            return Err(TuningError::Invalid {
                field: "max_razor_y",
                reason: "gap must end above the floor",
            });
        }
        if self.game_over_music_delay_ms < 0.0 {
            return Err(TuningError::Invalid {
                field: "game_over_music_delay_ms",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}
