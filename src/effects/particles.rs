//! Score burst particles
//!
//! A burst is six coordinated profiles spawned together. Each profile has its
//! own motion rule; all of them are frame-rate independent (additive terms
//! scale with the time scale, multiplicative ones are raised to it).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::consts::GAME_WIDTH;

/// Where score bursts originate (just under the score readout)
pub const SCORE_BURST_ORIGIN: Vec2 = Vec2::new(GAME_WIDTH / 2.0, 140.0);

/// Particles smaller than this are dropped
pub const MIN_PARTICLE_SIZE: f32 = 0.3;

/// Behavior profile of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Evenly spaced expanding ring with strong drag
    Ring,
    /// Chunky spinning pieces under gravity
    Coin,
    /// Small twinkling specks
    Sparkle,
    /// Medium glowing blobs
    Orb,
    /// Tumbling squares that fall slowly
    Confetti,
    /// Slow floaty particles that rise
    Ember,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 6] = [
        ParticleKind::Ring,
        ParticleKind::Coin,
        ParticleKind::Sparkle,
        ParticleKind::Orb,
        ParticleKind::Confetti,
        ParticleKind::Ember,
    ];

    /// Number spawned per burst
    pub fn burst_count(&self) -> usize {
        match self {
            ParticleKind::Ring => 24,
            ParticleKind::Coin => 10,
            ParticleKind::Sparkle => 30,
            ParticleKind::Orb => 14,
            ParticleKind::Confetti => 12,
            ParticleKind::Ember => 8,
        }
    }

    /// Life lost per reference tick
    pub fn decay(&self) -> f32 {
        match self {
            ParticleKind::Ring => 0.035,
            ParticleKind::Coin => 0.018,
            ParticleKind::Sparkle => 0.05,
            ParticleKind::Orb => 0.02,
            ParticleKind::Confetti | ParticleKind::Ember => 0.012,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub decay: f32,
    /// Radians; used by coins and confetti
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Phase of the sparkle shimmer
    pub twinkle: f32,
    /// Index into the burst palette
    pub shade: u8,
}

impl Particle {
    fn new(kind: ParticleKind, pos: Vec2, vel: Vec2, size: f32, shade: u8) -> Self {
        Self {
            kind,
            pos,
            vel,
            size,
            life: 1.0,
            decay: kind.decay(),
            rotation: 0.0,
            rotation_speed: 0.0,
            twinkle: 0.0,
            shade,
        }
    }

    /// Opacity falls off quadratically with life
    pub fn alpha(&self) -> f32 {
        let life = self.life.max(0.0);
        life * life
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size < MIN_PARTICLE_SIZE
    }

    fn step(&mut self, ts: f32) {
        self.pos += self.vel * ts;

        match self.kind {
            ParticleKind::Ember => {
                self.vel.y += 0.08 * ts;
                self.vel.x *= 0.97f32.powf(ts);
                self.size *= 0.985f32.powf(ts);
            }
            ParticleKind::Ring => {
                self.vel *= 0.96f32.powf(ts);
                self.size *= 0.97f32.powf(ts);
            }
            ParticleKind::Confetti => {
                self.vel.y += 0.5 * ts;
                self.vel.x *= 0.99f32.powf(ts);
                self.rotation += self.rotation_speed * ts;
                self.size *= 0.995f32.powf(ts);
            }
            ParticleKind::Coin => {
                self.vel.y += 0.4 * ts;
                self.rotation += self.rotation_speed * ts;
                self.size *= 0.985f32.powf(ts);
            }
            ParticleKind::Sparkle => {
                self.vel.y += 0.25 * ts;
                self.twinkle += 0.3 * ts;
                self.size *= 0.97f32.powf(ts);
            }
            ParticleKind::Orb => {
                self.vel.y += 0.35 * ts;
                self.size *= 0.985f32.powf(ts);
            }
        }

        self.life -= self.decay * ts;
    }
}

/// Number of shades in the burst palette
pub const PALETTE_SIZE: u8 = 6;

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one coordinated burst of every profile at `origin`
    pub fn spawn_score_burst<R: Rng>(&mut self, origin: Vec2, rng: &mut R) {
        for kind in ParticleKind::ALL {
            let count = kind.burst_count();
            for i in 0..count {
                let particle = Self::spawn_one(kind, i, count, origin, rng);
                self.particles.push(particle);
            }
        }
    }

    fn spawn_one<R: Rng>(
        kind: ParticleKind,
        i: usize,
        count: usize,
        origin: Vec2,
        rng: &mut R,
    ) -> Particle {
        let even_angle = TAU / count as f32 * i as f32;
        let shade = rng.random_range(0..PALETTE_SIZE);
        let dir = |angle: f32| Vec2::new(angle.cos(), angle.sin());

        match kind {
            ParticleKind::Ring => {
                let speed = rng.random_range(18.0..22.0);
                let size = rng.random_range(5.0..8.0);
                Particle::new(kind, origin, dir(even_angle) * speed, size, shade)
            }
            ParticleKind::Coin => {
                let angle = even_angle + rng.random_range(0.0..0.3);
                let speed = rng.random_range(12.0..20.0);
                let size = rng.random_range(12.0..20.0);
                let vel = dir(angle) * speed - Vec2::Y * 6.0;
                let mut p = Particle::new(kind, origin, vel, size, shade);
                p.rotation = rng.random_range(0.0..TAU);
                p.rotation_speed = rng.random_range(-0.2..0.2);
                p
            }
            ParticleKind::Sparkle => {
                let angle = rng.random_range(0.0..TAU);
                let speed = rng.random_range(8.0..24.0);
                let size = rng.random_range(2.0..6.0);
                let jitter = Vec2::new(
                    rng.random_range(-15.0..15.0),
                    rng.random_range(-15.0..15.0),
                );
                let vel = dir(angle) * speed - Vec2::Y * 4.0;
                let mut p = Particle::new(kind, origin + jitter, vel, size, shade);
                p.twinkle = rng.random_range(0.0..TAU);
                p
            }
            ParticleKind::Orb => {
                let angle = even_angle + rng.random_range(0.0..0.4);
                let speed = rng.random_range(10.0..16.0);
                let size = rng.random_range(10.0..18.0);
                // Orbs use the brighter half of the palette
                let shade = shade % 3;
                Particle::new(kind, origin, dir(angle) * speed - Vec2::Y * 3.0, size, shade)
            }
            ParticleKind::Confetti => {
                let angle = rng.random_range(0.0..TAU);
                let speed = rng.random_range(6.0..16.0);
                let size = rng.random_range(8.0..14.0);
                let vel = dir(angle) * speed - Vec2::Y * 8.0;
                let mut p = Particle::new(kind, origin, vel, size, shade);
                p.rotation = rng.random_range(0.0..TAU);
                p.rotation_speed = rng.random_range(-0.15..0.15);
                p
            }
            ParticleKind::Ember => {
                let offset = Vec2::new(rng.random_range(-40.0..40.0), rng.random_range(0.0..20.0));
                let vel = Vec2::new(rng.random_range(-1.5..1.5), -rng.random_range(10.0..16.0));
                let size = rng.random_range(6.0..12.0);
                Particle::new(kind, origin + offset, vel, size, shade)
            }
        }
    }

    /// Advance every particle by `ts` reference ticks and drop the dead
    pub fn update(&mut self, ts: f32) {
        for p in &mut self.particles {
            p.step(ts);
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn burst() -> ParticleSystem {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new();
        system.spawn_score_burst(SCORE_BURST_ORIGIN, &mut rng);
        system
    }

    #[test]
    fn test_burst_spawns_all_profiles() {
        let system = burst();
        let total: usize = ParticleKind::ALL.iter().map(|k| k.burst_count()).sum();
        assert_eq!(system.len(), total);
        for kind in ParticleKind::ALL {
            let n = system.particles().iter().filter(|p| p.kind == kind).count();
            assert_eq!(n, kind.burst_count(), "{kind:?}");
        }
    }

    #[test]
    fn test_ring_is_evenly_spaced() {
        let system = burst();
        let ring: Vec<_> = system
            .particles()
            .iter()
            .filter(|p| p.kind == ParticleKind::Ring)
            .collect();
        // First ring particle heads straight right
        assert!(ring[0].vel.y.abs() < 1e-4);
        assert!(ring[0].vel.x > 0.0);
    }

    #[test]
    fn test_embers_rise() {
        let system = burst();
        assert!(
            system
                .particles()
                .iter()
                .filter(|p| p.kind == ParticleKind::Ember)
                .all(|p| p.vel.y < 0.0)
        );
    }

    #[test]
    fn test_all_particles_eventually_die() {
        let mut system = burst();
        // Slowest decay is 0.012/tick, so ~84 ticks
        for _ in 0..100 {
            system.update(1.0);
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_decay_is_frame_rate_independent() {
        let mut a = burst();
        let mut b = burst();
        for _ in 0..14 {
            a.update(1.0);
        }
        for _ in 0..7 {
            b.update(2.0);
        }
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert!((pa.life - pb.life).abs() < 1e-4);
            assert!((pa.size - pb.size).abs() < 1e-2);
        }
    }
}
