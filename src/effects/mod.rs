//! Time-driven cosmetic effects
//!
//! Effects read the current phase and the normalized delta but never feed
//! back into physics or collision. The one exception is slow motion, whose
//! scale the tick applies to the player and particle updates while dying.
//!
//! Cosmetic randomness uses its own generator so that shaking the screen or
//! scattering sparkles never perturbs the gameplay RNG.

pub mod ambient;
pub mod flash;
pub mod particles;
pub mod shake;
pub mod slow_motion;
pub mod trail;
pub mod transition;

use rand::SeedableRng;
use rand_pcg::Pcg32;

pub use ambient::{Ambient, Cloud, Mote};
pub use flash::ScreenFlash;
pub use particles::{Particle, ParticleKind, ParticleSystem, SCORE_BURST_ORIGIN};
pub use shake::ScreenShake;
pub use slow_motion::SlowMotion;
pub use trail::{Trail, TrailPoint};
pub use transition::ScreenTransition;

use crate::sim::{GamePhase, time_scale};

/// Stream selector so cosmetic draws differ from gameplay draws for one seed
const COSMETIC_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct Effects {
    pub shake: ScreenShake,
    pub flash: ScreenFlash,
    pub slow_motion: SlowMotion,
    pub transition: ScreenTransition,
    pub score_particles: ParticleSystem,
    pub ambient: Ambient,
    pub trail: Trail,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed ^ COSMETIC_STREAM);
        let mut ambient = Ambient::default();
        ambient.init_clouds(&mut rng);
        ambient.init_motes(&mut rng);
        Self {
            shake: ScreenShake::default(),
            flash: ScreenFlash::default(),
            slow_motion: SlowMotion::default(),
            transition: ScreenTransition::default(),
            score_particles: ParticleSystem::new(),
            ambient,
            trail: Trail::default(),
            rng,
        }
    }

    /// Impact bundle fired on death: shake, flash, slow motion
    pub fn trigger_death(&mut self) {
        self.shake.trigger(shake::SHAKE_INTENSITY, shake::SHAKE_DURATION_MS);
        self.flash.trigger(flash::FLASH_DURATION_MS);
        self.slow_motion.trigger();
    }

    /// Fade in from the start screen and repopulate the background
    pub fn start_transition(&mut self) {
        self.transition.start();
        self.score_particles.clear();
        self.trail.clear();
        self.ambient.init_motes(&mut self.rng);
    }

    pub fn spawn_score_burst(&mut self) {
        self.score_particles
            .spawn_score_burst(SCORE_BURST_ORIGIN, &mut self.rng);
    }

    /// Drop everything tied to the finished run
    pub fn reset(&mut self) {
        self.shake.reset();
        self.flash.reset();
        self.slow_motion.reset();
        self.score_particles.clear();
        self.trail.clear();
    }

    /// Advance the transition and slow motion, returning the delta (ms) that
    /// the player update should use this frame
    pub fn begin_frame(&mut self, delta_ms: f32, phase: GamePhase) -> f32 {
        self.transition.update(delta_ms);
        let scale = self.slow_motion.update(delta_ms);
        if phase == GamePhase::Dying {
            delta_ms * scale
        } else {
            delta_ms
        }
    }

    /// Advance particles, shake, flash and background
    ///
    /// `effective_ms` is the slow-motion-scaled delta returned by
    /// [`Effects::begin_frame`]; shake and flash run on the canonical delta.
    pub fn update(&mut self, delta_ms: f32, effective_ms: f32, phase: GamePhase) {
        match phase {
            GamePhase::Playing | GamePhase::Dying => {
                self.score_particles.update(time_scale(effective_ms));
            }
            GamePhase::Ready | GamePhase::GameOver => {}
        }
        self.shake.update(delta_ms, &mut self.rng);
        self.flash.update(delta_ms);
        self.ambient.update(time_scale(delta_ms), &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_bundle_activates_all() {
        let mut effects = Effects::new(1);
        effects.trigger_death();
        assert!(effects.shake.is_active());
        assert!(effects.flash.is_active());
        assert!(effects.slow_motion.is_active());
    }

    #[test]
    fn test_slow_motion_only_scales_while_dying() {
        let mut effects = Effects::new(1);
        effects.trigger_death();
        // Deep in the hold phase
        effects.begin_frame(200.0, GamePhase::Dying);
        let dying = effects.begin_frame(16.0, GamePhase::Dying);
        assert!((dying - 16.0 * slow_motion::TARGET_TIME_SCALE).abs() < 1e-4);
        let playing = effects.begin_frame(16.0, GamePhase::Playing);
        assert_eq!(playing, 16.0);
    }

    #[test]
    fn test_cosmetic_rng_is_seeded() {
        let mut a = Effects::new(42);
        let mut b = Effects::new(42);
        a.trigger_death();
        b.trigger_death();
        a.update(16.0, 16.0, GamePhase::Dying);
        b.update(16.0, 16.0, GamePhase::Dying);
        assert_eq!(a.shake.offset(), b.shake.offset());
    }
}
