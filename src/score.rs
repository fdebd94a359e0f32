//! Score tracking
//!
//! Current score for the session and the best score across sessions. A new
//! best is written through to the [`ScoreStore`] as soon as it happens.

use crate::platform::ScoreStore;

/// Current and best score, backed by a store
pub struct ScoreTracker {
    score: u32,
    best: u32,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("score", &self.score)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl ScoreTracker {
    /// Start at 0 with the stored best
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let best = store.get();
        log::info!("Loaded best score: {}", best);
        Self {
            score: 0,
            best,
            store,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// One scoring event. Returns true when it set a new best.
    pub fn record_merge(&mut self) -> bool {
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
            self.store.set(self.best);
            true
        } else {
            false
        }
    }

    /// Back to 0; best is kept
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Hand the store back for the next session
    pub fn into_store(self) -> Box<dyn ScoreStore> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryScoreStore;

    #[test]
    fn test_loads_best_from_store() {
        let tracker = ScoreTracker::new(Box::new(MemoryScoreStore::new(7)));
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.best(), 7);
    }

    #[test]
    fn test_persists_only_new_best() {
        let store = MemoryScoreStore::new(2);
        let mut tracker = ScoreTracker::new(Box::new(store.clone()));

        assert!(!tracker.record_merge());
        assert!(!tracker.record_merge());
        assert_eq!(store.writes(), 0);

        assert!(tracker.record_merge());
        assert_eq!(tracker.best(), 3);
        assert_eq!(store.get(), 3);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_reset_keeps_best() {
        let store = MemoryScoreStore::default();
        let mut tracker = ScoreTracker::new(Box::new(store.clone()));
        for _ in 0..4 {
            tracker.record_merge();
        }
        tracker.reset();
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.best(), 4);

        tracker.record_merge();
        assert_eq!(tracker.best(), 4);
        assert_eq!(store.get(), 4);
    }
}
