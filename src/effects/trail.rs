//! Afterimage trail behind the player

use std::collections::VecDeque;

use glam::Vec2;

pub const TRAIL_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub center: Vec2,
    /// Degrees
    pub rotation: f32,
}

/// Most recent player positions, newest first
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn record(&mut self, center: Vec2, rotation: f32) {
        self.points.push_front(TrailPoint { center, rotation });
        self.points.truncate(TRAIL_LENGTH);
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ghost alpha and size factor for the `i`th point; the newest is skipped
    pub fn falloff(&self, i: usize) -> (f32, f32) {
        let fade = 1.0 - i as f32 / self.points.len().max(1) as f32;
        (fade * 0.3, fade * 0.5)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
