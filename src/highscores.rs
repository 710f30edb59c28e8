//! Local best scores
//!
//! Top 10 runs, sorted best first, persisted to LocalStorage. The best entry
//! seeds `GameState::best_score` so beating it plays the high-score cue.

use serde::{Deserialize, Serialize};

use crate::sim::ScoreSubmission;

/// Maximum number of runs kept
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Unix timestamp (ms) the run ended
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flap_emonad_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Zero never qualifies; otherwise the table must have room or the score
    /// must beat its lowest entry
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a run. Returns the 1-based rank, or `None` if it didn't make
    /// the table.
    ///
    /// Ties rank below existing entries with the same score.
    pub fn add_score(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Record a finished run
    pub fn record(&mut self, run: &ScoreSubmission) -> Option<usize> {
        let rank = self.add_score(run.score, run.ended_at);
        if let Some(rank) = rank {
            log::info!("Score {} ranked #{rank}", run.score);
        }
        rank
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        if let Some(json) = stored {
            match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(err) => log::warn!("Discarding stored high scores: {err}"),
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match (storage, serde_json::to_string(self)) {
            (Some(storage), Ok(json)) => {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("High scores saved ({} entries)", self.entries.len());
            }
            _ => log::warn!("High scores not saved"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
