//! Death impact screen shake

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

pub const SHAKE_INTENSITY: f32 = 25.0;
pub const SHAKE_DURATION_MS: f32 = 300.0;
/// Share of the intensity added along a random direction
const DIRECTIONAL_BIAS: f32 = 0.3;

/// Quadratically decaying random offset applied to the render transform
#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    active: bool,
    intensity: f32,
    duration: f32,
    elapsed: f32,
    offset: Vec2,
}

impl ScreenShake {
    pub fn trigger(&mut self, intensity: f32, duration_ms: f32) {
        self.active = true;
        self.intensity = intensity;
        self.duration = duration_ms;
        self.elapsed = 0.0;
    }

    /// Advance and sample this frame's offset
    pub fn update<R: Rng>(&mut self, delta_ms: f32, rng: &mut R) {
        if !self.active {
            self.offset = Vec2::ZERO;
            return;
        }

        self.elapsed += delta_ms;
        if self.elapsed >= self.duration {
            self.active = false;
            self.offset = Vec2::ZERO;
            return;
        }

        let current = self.current_intensity();
        let jitter =
            Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 2.0 * current;
        let angle = rng.random::<f32>() * TAU;
        let bias = Vec2::new(angle.cos(), angle.sin()) * current * DIRECTIONAL_BIAS;
        self.offset = jitter + bias;
    }

    /// Intensity after quadratic ease-out
    pub fn current_intensity(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 0.0;
        }
        let progress = (self.elapsed / self.duration).min(1.0);
        self.intensity * (1.0 - progress * progress)
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_offset_bounded_by_decaying_intensity() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut shake = ScreenShake::default();
        shake.trigger(SHAKE_INTENSITY, SHAKE_DURATION_MS);

        let mut last_bound = f32::MAX;
        for _ in 0..17 {
            shake.update(16.0, &mut rng);
            let bound = shake.current_intensity() * (1.0 + DIRECTIONAL_BIAS);
            assert!(shake.offset().x.abs() <= bound + 1e-3);
            assert!(shake.offset().y.abs() <= bound + 1e-3);
            assert!(bound <= last_bound);
            last_bound = bound;
        }
    }

    #[test]
    fn test_expires_and_zeroes_offset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut shake = ScreenShake::default();
        shake.trigger(SHAKE_INTENSITY, SHAKE_DURATION_MS);
        shake.update(SHAKE_DURATION_MS, &mut rng);
        assert!(!shake.is_active());
        assert_eq!(shake.offset(), Vec2::ZERO);
    }
}
