//! Rendering
//!
//! [`FramePlan::build`] turns the game state and the player's settings into
//! everything a backend needs for one frame: which scene to draw, the camera
//! transform, sprite placements and overlay opacities. It is a pure function
//! so the layering rules can be tested without a canvas.
//!
//! Draw order, back to front: background (clouds, motes), razors, trail,
//! player, score, score particles, desaturation and vignette, transition
//! fade. Everything up to here is inside the shaken, zoomed camera. The
//! death flash is drawn last, outside the camera, so it never shakes.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Start screen idle animation frame time (ms)
pub const START_SCREEN_FRAME_MS: f64 = 150.0;
/// Where the idle flapping sprite hovers on the start screen
pub const START_SCREEN_SPRITE_CENTER: Vec2 = Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT * 0.35);
/// Vignette darkness relative to desaturation
pub const VIGNETTE_STRENGTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Title, idle sprites and rising motes on a dark gradient
    StartScreen,
    /// White playfield with razors and the player
    Gameplay,
}

/// Shake translation plus a zoom about a focus point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub shake: Vec2,
    pub zoom: f32,
    pub focus: Vec2,
}

impl Camera {
    pub const IDENTITY: Camera = Camera {
        shake: Vec2::ZERO,
        zoom: 1.0,
        focus: Vec2::ZERO,
    };

    /// Map a playfield point to the screen
    pub fn apply(&self, p: Vec2) -> Vec2 {
        (p - self.focus) * self.zoom + self.focus + self.shake
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSheet {
    Flap,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub center: Vec2,
    /// Radians, clockwise
    pub rotation: f32,
    pub sheet: SpriteSheet,
    pub frame: u8,
}

/// One razor pair; blades extend from the gap edges to the screen edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RazorSprite {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
}

/// Afterimage drawn behind the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub center: Vec2,
    pub rotation: f32,
    pub alpha: f32,
    /// Ellipse half-width
    pub radius: f32,
}

/// Full-screen overlays, all in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlays {
    pub desaturation: f32,
    pub vignette: f32,
    pub transition: f32,
    pub flash: f32,
    pub flash_burst: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub scene: Scene,
    pub camera: Camera,
    pub overlays: Overlays,
    pub player: PlayerSprite,
    pub razors: Vec<RazorSprite>,
    pub trail: Vec<Ghost>,
    /// Score drawn in the playfield, only while a run is live
    pub score: Option<u32>,
    pub draw_particles: bool,
    pub draw_motes: bool,
    /// Game clock (ms) for idle bobbing and pulsing text
    pub time_ms: f64,
}

impl FramePlan {
    pub fn build(state: &GameState, settings: &Settings) -> Self {
        let effects = &state.effects;
        let scene = match state.phase {
            GamePhase::Ready => Scene::StartScreen,
            _ => Scene::Gameplay,
        };

        let shake = if settings.effective_screen_shake() {
            effects.shake.offset()
        } else {
            Vec2::ZERO
        };
        let zoom = if settings.effective_zoom() {
            effects.slow_motion.zoom()
        } else {
            1.0
        };
        let camera = Camera {
            shake,
            zoom,
            focus: state.player.center(),
        };

        let desaturation = effects.slow_motion.desaturation();
        let (flash, flash_burst) = if settings.effective_flash() {
            (effects.flash.alpha(), effects.flash.burst_alpha())
        } else {
            (0.0, 0.0)
        };
        let overlays = Overlays {
            desaturation,
            vignette: desaturation * VIGNETTE_STRENGTH,
            transition: match scene {
                Scene::Gameplay => effects.transition.alpha(),
                Scene::StartScreen => 0.0,
            },
            flash,
            flash_burst,
        };

        let player = player_sprite(state);

        let razors = match scene {
            Scene::Gameplay => state
                .razors
                .iter()
                .map(|r| RazorSprite {
                    x: r.x,
                    gap_top: r.gap_y,
                    gap_bottom: r.gap_y + state.tuning.razor_gap,
                })
                .collect(),
            Scene::StartScreen => Vec::new(),
        };

        let trail = if settings.trails && scene == Scene::Gameplay {
            let trail = &effects.trail;
            trail
                .points()
                .enumerate()
                // The newest point sits under the sprite itself
                .skip(1)
                .map(|(i, p)| {
                    let (alpha, size) = trail.falloff(i);
                    Ghost {
                        center: p.center,
                        rotation: p.rotation.to_radians(),
                        alpha,
                        radius: PLAYER_WIDTH * size,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let score = match state.phase {
            GamePhase::Playing | GamePhase::Dying => Some(state.score),
            GamePhase::Ready | GamePhase::GameOver => None,
        };

        Self {
            scene,
            camera,
            overlays,
            player,
            razors,
            trail,
            score,
            draw_particles: settings.particles,
            draw_motes: settings.particles,
            time_ms: state.elapsed_ms,
        }
    }
}

fn player_sprite(state: &GameState) -> PlayerSprite {
    let player = &state.player;
    match state.phase {
        GamePhase::Ready => PlayerSprite {
            center: START_SCREEN_SPRITE_CENTER,
            rotation: 0.0,
            sheet: SpriteSheet::Flap,
            frame: ((state.elapsed_ms / START_SCREEN_FRAME_MS) as u64 % ANIMATION_FRAMES as u64)
                as u8,
        },
        GamePhase::Playing => PlayerSprite {
            center: player.center(),
            rotation: player.rotation.to_radians(),
            sheet: SpriteSheet::Flap,
            frame: player.current_frame,
        },
        GamePhase::Dying | GamePhase::GameOver => PlayerSprite {
            center: player.center(),
            rotation: player.rotation.to_radians(),
            sheet: SpriteSheet::Death,
            frame: player.death_frame,
        },
    }
}
