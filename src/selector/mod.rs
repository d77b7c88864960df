//! Weighted random selection.
//!
//! Draws one candidate with probability proportional to its weight. The
//! random source is an owned `ChaCha8Rng` so that a seeded selector replays
//! the exact same draw sequence, which keeps statistical tests and bug
//! reproductions deterministic.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, EngineResult};
use crate::types::Note;
use crate::weights::WeightedNote;

/// Weighted random selector with an injectable seed.
#[derive(Clone, Debug)]
pub struct WeightedSelector {
    rng: ChaCha8Rng,
}

impl WeightedSelector {
    /// Selector seeded from system time.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(seed)
    }

    /// Selector with a fixed seed, for reproducible draws.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw one note from a weighted candidate set.
    ///
    /// Walks the set subtracting each weight from a uniform draw in
    /// `[0, total)` and returns the candidate that brings the remainder to
    /// zero or below. Floating-point rounding can leave a sliver of
    /// remainder after the walk; the last candidate absorbs it, so a
    /// non-empty input always yields a result. An empty input is the only
    /// failure.
    pub fn select<'a>(&mut self, weighted: &'a [WeightedNote]) -> EngineResult<&'a Note> {
        let Some(last) = weighted.last() else {
            return Err(EngineError::EmptyCandidatePool);
        };

        let total: f64 = weighted.iter().map(|w| w.weight).sum();
        if !(total > 0.0) || !total.is_finite() {
            return Ok(&last.note);
        }

        let mut remainder = self.rng.gen_range(0.0..total);
        for candidate in weighted {
            remainder -= candidate.weight;
            if remainder <= 0.0 {
                return Ok(&candidate.note);
            }
        }
        Ok(&last.note)
    }
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new()
    }
}
