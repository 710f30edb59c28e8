//! Red impact flash with a white burst at its onset

pub const FLASH_DURATION_MS: f32 = 250.0;
pub const FLASH_IN_MS: f32 = 50.0;
pub const FLASH_HOLD_MS: f32 = 80.0;
pub const FLASH_PEAK_ALPHA: f32 = 0.8;
pub const WHITE_BURST_MS: f32 = 30.0;
pub const WHITE_BURST_ALPHA: f32 = 0.5;

/// Three-phase opacity envelope: ramp up, hold, ramp down
#[derive(Debug, Clone, Default)]
pub struct ScreenFlash {
    active: bool,
    duration: f32,
    elapsed: f32,
}

impl ScreenFlash {
    pub fn trigger(&mut self, duration_ms: f32) {
        self.active = true;
        self.duration = duration_ms;
        self.elapsed = 0.0;
    }

    pub fn update(&mut self, delta_ms: f32) {
        if !self.active {
            return;
        }
        self.elapsed += delta_ms;
        if self.elapsed >= self.duration {
            self.active = false;
        }
    }

    /// Overlay opacity at the current point of the envelope
    pub fn alpha(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        let e = self.elapsed;
        if e < FLASH_IN_MS {
            e / FLASH_IN_MS * FLASH_PEAK_ALPHA
        } else if e < FLASH_IN_MS + FLASH_HOLD_MS {
            FLASH_PEAK_ALPHA
        } else {
            let fade_out = (self.duration - FLASH_IN_MS - FLASH_HOLD_MS).max(f32::EPSILON);
            let progress = (e - FLASH_IN_MS - FLASH_HOLD_MS) / fade_out;
            (FLASH_PEAK_ALPHA * (1.0 - progress)).max(0.0)
        }
    }

    /// White overlay layered over the red one during the first few ms
    pub fn burst_alpha(&self) -> f32 {
        if !self.active || self.elapsed >= WHITE_BURST_MS {
            return 0.0;
        }
        (1.0 - self.elapsed / WHITE_BURST_MS) * WHITE_BURST_ALPHA
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
