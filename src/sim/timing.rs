//! Frame time normalization
//!
//! Raw `requestAnimationFrame` deltas jitter and spike (tab switches, GC
//! pauses, PWA resume). `FrameClock` turns them into one smoothed delta per
//! frame that drives every per-tick increment in the simulation.

use crate::consts::TARGET_FRAME_MS;

/// Raw deltas above this (ms) are treated as a stall and replaced
pub const MAX_RAW_DELTA_MS: f32 = 100.0;
/// Raw deltas below this (ms) are treated as duplicate timestamps and replaced
pub const MIN_RAW_DELTA_MS: f32 = 1.0;
/// Number of raw samples the median is taken over
pub const HISTORY_SIZE: usize = 5;
/// Weight of the previous smoothed value in the moving average
pub const SMOOTHING: f32 = 0.85;
/// Output clamp (ms)
pub const MIN_DELTA_MS: f32 = 8.0;
pub const MAX_DELTA_MS: f32 = 32.0;

/// Ratio of a delta to the nominal 60 Hz frame
#[inline]
pub fn time_scale(delta_ms: f32) -> f32 {
    delta_ms / TARGET_FRAME_MS
}

/// Smooths raw frame timestamps into a bounded simulation delta
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    history: [f32; HISTORY_SIZE],
    len: usize,
    next: usize,
    smoothed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            history: [TARGET_FRAME_MS; HISTORY_SIZE],
            len: 0,
            next: 0,
            smoothed: TARGET_FRAME_MS,
        }
    }

    /// Feed the current frame's timestamp (ms) and get this frame's delta
    ///
    /// The first call has no previous timestamp and yields the nominal frame.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let raw = match self.last_timestamp {
            Some(last) => (now_ms - last) as f32,
            None => TARGET_FRAME_MS,
        };
        self.last_timestamp = Some(now_ms);
        self.push_raw(raw)
    }

    /// Feed a raw delta directly (ms)
    pub fn push_raw(&mut self, raw_ms: f32) -> f32 {
        let in_range = (MIN_RAW_DELTA_MS..=MAX_RAW_DELTA_MS).contains(&raw_ms);
        let raw = if !raw_ms.is_finite() || !in_range {
            TARGET_FRAME_MS
        } else {
            raw_ms
        };

        self.history[self.next] = raw;
        self.next = (self.next + 1) % HISTORY_SIZE;
        self.len = (self.len + 1).min(HISTORY_SIZE);

        let median = self.median();
        let blended = self.smoothed * SMOOTHING + median * (1.0 - SMOOTHING);
        self.smoothed = blended.clamp(MIN_DELTA_MS, MAX_DELTA_MS);
        self.smoothed
    }

    /// Most recent smoothed delta (ms)
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Forget the previous timestamp (after the loop was suspended)
    pub fn resync(&mut self) {
        self.last_timestamp = None;
    }

    fn median(&self) -> f32 {
        // Slots fill from index 0, so the first `len` entries are the live samples
        let mut samples = self.history;
        let samples = &mut samples[..self.len];
        samples.sort_by(|a, b| a.total_cmp(b));
        samples[samples.len() / 2]
    }
}
