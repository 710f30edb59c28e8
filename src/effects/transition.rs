//! Fade-in on game start

pub const TRANSITION_DURATION_MS: f32 = 400.0;

#[derive(Debug, Clone, Default)]
pub struct ScreenTransition {
    active: bool,
    elapsed: f32,
    alpha: f32,
}

impl ScreenTransition {
    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
        self.alpha = 1.0;
    }

    pub fn update(&mut self, delta_ms: f32) {
        if !self.active {
            return;
        }
        self.elapsed += delta_ms;
        self.alpha = 1.0 - self.elapsed / TRANSITION_DURATION_MS;
        if self.alpha <= 0.0 {
            self.alpha = 0.0;
            self.active = false;
        }
    }

    /// Opacity of the cover drawn over the frame
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fade() {
        let mut t = ScreenTransition::default();
        t.start();
        assert_eq!(t.alpha(), 1.0);
        t.update(100.0);
        assert!((t.alpha() - 0.75).abs() < 1e-6);
        t.update(400.0);
        assert_eq!(t.alpha(), 0.0);
        assert!(!t.is_active());
    }
}
