//! Performance-weighted scoring.
//!
//! Combines the tier's base weights, the performance ledger, and the
//! recent-selection window into one positive scalar per candidate. The
//! multipliers compound, so the order below is part of the contract:
//!
//! 1. base weight (default 1.0)
//! 2. performance adjustment (struggle boost, failing-streak boost,
//!    mastered damping, novelty boost)
//! 3. recency penalty with a hard floor
//! 4. clef distribution multiplier
//! 5. final clamp, so every candidate stays selectable
//!
//! Pure given its inputs; no side effects.

use crate::history::SelectionHistory;
use crate::ledger::PerformanceLedger;
use crate::types::{Note, TierConfig};

// ==================== Tuning constants ====================

/// Struggle boost scale: weight *= 1 + (1 - accuracy) * STRUGGLE_GAIN.
const STRUGGLE_GAIN: f64 = 2.0;

/// Per-step boost while an item is on a failing streak.
const FAILING_STREAK_GAIN: f64 = 0.5;

/// Damping applied once an item's correct streak passes MASTERY_STREAK.
const MASTERED_DAMPING: f64 = 0.7;

/// Correct-streak length beyond which an item counts as mastered.
const MASTERY_STREAK: u32 = 3;

/// Multiplier for never-attempted items.
const NOVELTY_BOOST: f64 = 1.3;

/// Recency penalty step per history slot.
const RECENCY_STEP: f64 = 0.3;

/// Floor of the recency multiplier.
const RECENCY_FLOOR: f64 = 0.1;

/// Final lower clamp; no candidate ever weighs zero.
pub const MIN_WEIGHT: f64 = 0.01;

// ==================== Weighted candidate ====================

/// One candidate with its computed selection weight.
#[derive(Clone, Debug)]
pub struct WeightedNote {
    pub note: Note,
    pub weight: f64,
}

// ==================== Scoring ====================

/// Score every candidate against the ledger and selection history.
pub fn compute_weights(
    candidates: Vec<Note>,
    cfg: &TierConfig,
    ledger: &PerformanceLedger,
    history: &SelectionHistory,
) -> Vec<WeightedNote> {
    candidates
        .into_iter()
        .map(|note| {
            let mut weight = cfg.base_weight(&note.id);

            match ledger.get(&note.id) {
                Some(record) => {
                    weight *= 1.0 + (1.0 - record.accuracy()) * STRUGGLE_GAIN;
                    if record.consecutive_incorrect > 0 {
                        weight *= 1.0 + record.consecutive_incorrect as f64 * FAILING_STREAK_GAIN;
                    }
                    if record.consecutive_correct > MASTERY_STREAK {
                        weight *= MASTERED_DAMPING;
                    }
                }
                None => weight *= NOVELTY_BOOST,
            }

            if let Some(slot) = history.position(&note.id) {
                weight *= (1.0 - (slot as f64 + 1.0) * RECENCY_STEP).max(RECENCY_FLOOR);
            }

            weight *= cfg.distribution_weight(note.clef);
            weight = weight.max(MIN_WEIGHT);

            WeightedNote { note, weight }
        })
        .collect()
}
