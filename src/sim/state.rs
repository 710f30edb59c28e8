//! Game state and core simulation types
//!
//! Everything the tick mutates lives here: the player, the razor set, the
//! phase machine's bookkeeping and the outgoing event queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::{SoundCue, TrackId};
use crate::consts::*;
use crate::effects::Effects;
use crate::tuning::Tuning;

/// Current phase of the game. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for the first tap
    Ready,
    /// Active gameplay
    Playing,
    /// Hit something; falling to the floor in slow motion
    Dying,
    /// Run ended, score shown
    GameOver,
}

impl GamePhase {
    pub const ALL: [GamePhase; 4] = [
        GamePhase::Ready,
        GamePhase::Playing,
        GamePhase::Dying,
        GamePhase::GameOver,
    ];
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeathType {
    Floor,
    RazorTop,
    RazorBottom,
}

impl DeathType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathType::Floor => "floor",
            DeathType::RazorTop => "razor-top",
            DeathType::RazorBottom => "razor-bottom",
        }
    }
}

/// Axis-aligned rectangle in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Sprite top-left x (fixed)
    pub x: f32,
    /// Sprite top-left y
    pub y: f32,
    /// Vertical velocity (per reference tick, positive is down)
    pub velocity: f32,
    /// Rotation in degrees (negative tilts up)
    pub rotation: f32,
    /// Flap animation frame (0..3, cyclic)
    pub current_frame: u8,
    pub animation_timer: f32,
    pub is_flapping: bool,
    /// Death animation frame (0..3, one-shot)
    pub death_frame: u8,
    pub death_animation_timer: f32,
    pub death_animation_complete: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: PLAYER_START_Y,
            velocity: 0.0,
            rotation: 0.0,
            current_frame: 0,
            animation_timer: 0.0,
            is_flapping: true,
            death_frame: 0,
            death_animation_timer: 0.0,
            death_animation_complete: false,
        }
    }
}

impl Player {
    /// Sprite bounding box
    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + PLAYER_WIDTH, self.y + PLAYER_HEIGHT)
    }

    /// Sprite box shrunk by `padding` on every side
    pub fn hitbox(&self, padding: f32) -> Rect {
        Rect::new(
            self.x + padding,
            self.y + padding,
            self.x + PLAYER_WIDTH - padding,
            self.y + PLAYER_HEIGHT - padding,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + PLAYER_WIDTH / 2.0, self.y + PLAYER_HEIGHT / 2.0)
    }

    /// Gravity, terminal velocity, then integrate position
    pub fn apply_gravity(&mut self, time_scale: f32, tuning: &Tuning) {
        self.velocity = (self.velocity + tuning.gravity * time_scale).min(tuning.max_fall_speed);
        self.y += self.velocity * time_scale;
    }

    /// Tilt toward a nose-dive while falling
    pub fn update_rotation(&mut self, time_scale: f32, tuning: &Tuning) {
        if self.velocity > 0.0 {
            self.rotation =
                (self.rotation + tuning.rotation_speed * time_scale).min(tuning.max_rotation);
        }
    }

    /// Snap velocity and tilt upward (not an additive impulse)
    pub fn flap(&mut self, tuning: &Tuning) {
        self.velocity = tuning.jump_velocity;
        self.rotation = tuning.jump_rotation;
        self.current_frame = 0;
        self.animation_timer = 0.0;
    }

    /// Cycle the three flap frames
    pub fn advance_flap_animation(&mut self, delta_ms: f32, tuning: &Tuning) {
        self.animation_timer += delta_ms;
        if self.animation_timer >= tuning.flap_frame_ms {
            self.animation_timer = 0.0;
            self.current_frame = (self.current_frame + 1) % ANIMATION_FRAMES;
        }
    }

    /// Play the three death frames once, then hold the last
    pub fn advance_death_animation(&mut self, delta_ms: f32, tuning: &Tuning) {
        if self.death_animation_complete {
            return;
        }
        self.death_animation_timer += delta_ms;
        if self.death_animation_timer >= tuning.death_frame_ms {
            self.death_animation_timer = 0.0;
            self.death_frame += 1;
            if self.death_frame >= ANIMATION_FRAMES {
                self.death_frame = ANIMATION_FRAMES - 1;
                self.death_animation_complete = true;
            }
        }
    }

    pub fn start_death_animation(&mut self) {
        self.death_frame = 0;
        self.death_animation_timer = 0.0;
        self.death_animation_complete = false;
    }
}

/// A razor pair: a top blade and a bottom blade around a passable gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Razor {
    pub id: u32,
    /// Left edge x
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
    /// Set once the player has passed it
    pub scored: bool,
}

impl Razor {
    pub fn right_edge(&self) -> f32 {
        self.x + RAZOR_WIDTH
    }

    /// Blade from the top of the screen down to the gap
    pub fn top_blade(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            self.x + tuning.blade_margin,
            f32::NEG_INFINITY,
            self.right_edge() - tuning.blade_margin,
            self.gap_y,
        )
    }

    /// Blade from the end of the gap down to the bottom of the screen
    pub fn bottom_blade(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            self.x + tuning.blade_margin,
            self.gap_y + tuning.razor_gap,
            self.right_edge() - tuning.blade_margin,
            f32::INFINITY,
        )
    }

    /// Entirely past the left edge of the screen
    pub fn is_offscreen(&self) -> bool {
        self.right_edge() < 0.0
    }
}

/// Snapshot of how a run ended. Written once on death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathCertificate {
    /// The razor that caused the death, as it was at the moment of impact
    pub killer_razor: Option<Razor>,
    pub death_type: DeathType,
    pub final_score: u32,
    /// Wall-clock time of death (ms since the Unix epoch)
    pub timestamp: f64,
}

/// Payload handed to an external leaderboard at game over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u32,
    pub started_at: f64,
    pub ended_at: f64,
}

/// Side effects requested by the simulation, drained by the host each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// One-shot sound effect
    Cue(SoundCue),
    /// Switch the music to a track
    PlayTrack(TrackId),
    /// Silence the music immediately
    StopMusic,
    /// Game over screen should become visible
    ShowScore { score: u32 },
    /// Run finished; optional leaderboard submission
    RunFinished(ScoreSubmission),
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub player: Player,
    /// Active razors in spawn order
    pub razors: Vec<Razor>,
    /// Time accumulated toward the next spawn (ms)
    pub spawn_timer: f32,
    /// Countdown to the game-over music, armed on entering game over
    pub game_over_music_timer: Option<f32>,
    /// Simulation time since construction (ms)
    pub elapsed_ms: f64,
    /// Wall-clock time at construction (ms since the Unix epoch)
    pub epoch_ms: f64,
    /// Wall-clock time the current run started
    pub run_started_at: f64,
    /// Best score seen so far; a run that beats it plays the high-score cue
    pub best_score: u32,
    /// Cosmetic effect state
    pub effects: Effects,
    pub(crate) certificate: Option<DeathCertificate>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a session on the start screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: GamePhase::Ready,
            score: 0,
            player: Player::default(),
            razors: Vec::new(),
            spawn_timer: 0.0,
            game_over_music_timer: None,
            elapsed_ms: 0.0,
            epoch_ms: 0.0,
            run_started_at: 0.0,
            best_score: 0,
            effects: Effects::new(seed),
            certificate: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Anchor simulation time to a wall clock (ms since the Unix epoch)
    pub fn with_epoch(mut self, epoch_ms: f64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    /// Seed the personal best, usually from the stored high-score table
    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = best;
        self
    }

    /// Current wall-clock time as seen by the simulation
    pub fn now(&self) -> f64 {
        self.epoch_ms + self.elapsed_ms
    }

    /// Allocate a new razor ID
    pub fn next_razor_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// How the last run ended, if it has ended
    pub fn death_certificate(&self) -> Option<&DeathCertificate> {
        self.certificate.as_ref()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Reset the player, razors and score without changing phase
    pub(crate) fn clear_run(&mut self) {
        self.player = Player::default();
        self.razors.clear();
        self.spawn_timer = 0.0;
        self.score = 0;
        self.game_over_music_timer = None;
    }
}
