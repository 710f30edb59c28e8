//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Normalized frame deltas only
//! - Seeded RNG only
//! - Razors kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod timing;

pub use collision::{Collision, Playfield, resolve_collision};
pub use state::{
    DeathCertificate, DeathType, GameEvent, GamePhase, GameState, Player, Razor, Rect,
    ScoreSubmission,
};
pub use tick::{Intent, TickInput, tick};
pub use timing::{FrameClock, time_scale};
