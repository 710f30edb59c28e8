//! Ambient background: rising motes and slow clouds

use glam::Vec2;
use rand::Rng;

use crate::consts::{GAME_HEIGHT, GAME_WIDTH};

pub const NUM_BACKGROUND_PARTICLES: usize = 25;
pub const NUM_CLOUDS: usize = 6;
/// Motes respawn at the bottom once this far above the top edge
const WRAP_MARGIN: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct Mote {
    pub pos: Vec2,
    pub size: f32,
    /// Upward speed per reference tick
    pub speed: f32,
    pub opacity: f32,
    /// Use the lighter of the two tints
    pub light: bool,
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed per reference tick
    pub speed: f32,
    pub opacity: f32,
}

fn cloud_y<R: Rng>(rng: &mut R) -> f32 {
    100.0 + rng.random_range(0.0..GAME_HEIGHT - 300.0)
}

#[derive(Debug, Clone, Default)]
pub struct Ambient {
    motes: Vec<Mote>,
    clouds: Vec<Cloud>,
    /// Sway phase, advanced in reference ticks
    phase: f32,
}

impl Ambient {
    /// Scatter a fresh set of motes over the playfield
    pub fn init_motes<R: Rng>(&mut self, rng: &mut R) {
        self.motes = (0..NUM_BACKGROUND_PARTICLES)
            .map(|_| Mote {
                pos: Vec2::new(
                    rng.random_range(0.0..GAME_WIDTH),
                    rng.random_range(0.0..GAME_HEIGHT),
                ),
                size: rng.random_range(4.0..12.0),
                speed: rng.random_range(0.8..2.0),
                opacity: rng.random_range(0.15..0.4),
                light: rng.random_bool(0.4),
            })
            .collect();
    }

    pub fn init_clouds<R: Rng>(&mut self, rng: &mut R) {
        self.clouds = (0..NUM_CLOUDS)
            .map(|_| Cloud {
                pos: Vec2::new(rng.random_range(0.0..GAME_WIDTH), cloud_y(rng)),
                size: Vec2::new(rng.random_range(200.0..500.0), rng.random_range(80.0..200.0)),
                speed: rng.random_range(0.3..0.7),
                opacity: rng.random_range(0.03..0.07),
            })
            .collect();
    }

    pub fn update<R: Rng>(&mut self, ts: f32, rng: &mut R) {
        self.phase += ts;

        for mote in &mut self.motes {
            mote.pos.y -= mote.speed * ts;
            mote.pos.x += (self.phase / 90.0 + mote.pos.y / 80.0).sin() * 0.5 * ts;
            if mote.pos.y < -WRAP_MARGIN {
                mote.pos.y = GAME_HEIGHT + WRAP_MARGIN;
                mote.pos.x = rng.random_range(0.0..GAME_WIDTH);
            }
        }

        for cloud in &mut self.clouds {
            cloud.pos.x -= cloud.speed * ts;
            if cloud.pos.x + cloud.size.x < 0.0 {
                cloud.pos.x = GAME_WIDTH + 50.0;
                cloud.pos.y = cloud_y(rng);
            }
        }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_motes_wrap_to_bottom() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ambient = Ambient::default();
        ambient.init_motes(&mut rng);
        assert_eq!(ambient.motes().len(), NUM_BACKGROUND_PARTICLES);

        // Slowest mote needs 1640 / 0.8 ticks to cross the screen
        for _ in 0..2100 {
            ambient.update(1.0, &mut rng);
            for mote in ambient.motes() {
                assert!(mote.pos.y >= -WRAP_MARGIN - 2.0);
                assert!(mote.pos.y <= GAME_HEIGHT + WRAP_MARGIN);
            }
        }
    }

    #[test]
    fn test_clouds_scroll_left_and_wrap() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ambient = Ambient::default();
        ambient.init_clouds(&mut rng);
        let start: Vec<f32> = ambient.clouds().iter().map(|c| c.pos.x).collect();
        ambient.update(1.0, &mut rng);
        for (cloud, x) in ambient.clouds().iter().zip(start) {
            assert!(cloud.pos.x < x);
        }

        for _ in 0..10_000 {
            ambient.update(1.0, &mut rng);
        }
        for cloud in ambient.clouds() {
            assert!(cloud.pos.x + cloud.size.x >= 0.0);
        }
    }
}
