//! Death slow motion
//!
//! Over its duration the effect ramps time down to a minimum while zooming
//! in and desaturating (first 15%), holds there (to 60%), then returns to
//! normal (last 40%).

pub const SLOW_MOTION_DURATION_MS: f32 = 800.0;
pub const TARGET_TIME_SCALE: f32 = 0.2;
pub const TARGET_ZOOM: f32 = 1.15;
pub const MAX_DESATURATION: f32 = 0.6;

/// Progress at which the ramp-down ends
const RAMP_END: f32 = 0.15;
/// Progress at which the return begins
const HOLD_END: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct SlowMotion {
    active: bool,
    duration: f32,
    elapsed: f32,
    time_scale: f32,
    zoom: f32,
    desaturation: f32,
}

impl Default for SlowMotion {
    fn default() -> Self {
        Self {
            active: false,
            duration: SLOW_MOTION_DURATION_MS,
            elapsed: 0.0,
            time_scale: 1.0,
            zoom: 1.0,
            desaturation: 0.0,
        }
    }
}

impl SlowMotion {
    pub fn trigger(&mut self) {
        *self = Self {
            active: true,
            ..Self::default()
        };
    }

    /// Advance by the canonical delta and return the scale for this frame
    pub fn update(&mut self, delta_ms: f32) -> f32 {
        if !self.active {
            return 1.0;
        }

        self.elapsed += delta_ms;
        let progress = self.elapsed / self.duration;

        if progress < RAMP_END {
            let r = progress / RAMP_END;
            self.set_blend(r);
        } else if progress < HOLD_END {
            self.set_blend(1.0);
        } else if progress < 1.0 {
            let r = (progress - HOLD_END) / (1.0 - HOLD_END);
            self.set_blend(1.0 - r);
        } else {
            *self = Self::default();
        }

        self.time_scale
    }

    /// `amount` 0 is normal, 1 is full slow motion
    fn set_blend(&mut self, amount: f32) {
        self.time_scale = 1.0 - (1.0 - TARGET_TIME_SCALE) * amount;
        self.zoom = 1.0 + (TARGET_ZOOM - 1.0) * amount;
        self.desaturation = MAX_DESATURATION * amount;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn desaturation(&self) -> f32 {
        self.desaturation
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

    fn at(elapsed: f32) -> SlowMotion {
        let mut slow = SlowMotion::default();
        slow.trigger();
        slow.update(elapsed);
        slow
    }

    #[test]
    fn test_ramp_down_midpoint() {
        // 60ms is half of the 120ms ramp
        let slow = at(60.0);
        assert!((slow.time_scale() - 0.6).abs() < 1e-5);
        assert!((slow.zoom() - 1.075).abs() < 1e-5);
        assert!((slow.desaturation() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_hold_at_minimum() {
        for elapsed in [120.0, 300.0, 479.0] {
            let slow = at(elapsed);
            assert!((slow.time_scale() - TARGET_TIME_SCALE).abs() < 1e-5);
            assert!((slow.zoom() - TARGET_ZOOM).abs() < 1e-5);
            assert!((slow.desaturation() - MAX_DESATURATION).abs() < 1e-5);
        }
    }

    #[test]
    fn test_return_to_normal() {
        // 640ms is halfway through the 320ms return
        let slow = at(640.0);
        assert!((slow.time_scale() - 0.6).abs() < 1e-5);

        let done = at(SLOW_MOTION_DURATION_MS);
        assert!(!done.is_active());
        assert_eq!(done.time_scale(), 1.0);
        assert_eq!(done.zoom(), 1.0);
        assert_eq!(done.desaturation(), 0.0);
    }

    #[test]
    fn test_inactive_is_unit_scale() {
        let mut slow = SlowMotion::default();
        assert_eq!(slow.update(16.0), 1.0);
    }

    #[test]
    fn test_scale_never_below_target() {
        let mut slow = SlowMotion::default();
        slow.trigger();
        for _ in 0..100 {
            let scale = slow.update(10.0);
            assert!((TARGET_TIME_SCALE - 1e-5..=1.0).contains(&scale));
        }
    }
}
