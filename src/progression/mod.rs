//! Tier progression.
//!
//! A transition fires only when the learner's global accuracy, global
//! question count, and session-level consecutive-correct streak all meet the
//! current tier's criteria at once. Transitions are forward-only and single
//! step; the terminal tier is a no-op.
//!
//! The progress collaborator owns the cumulative stats the evaluation reads;
//! the engine reads them through [`ProgressTracker`] and commits transitions
//! back through it.

use log::info;
use serde::{Deserialize, Serialize};

use crate::types::{GlobalStats, ProgressionCriteria, Tier};

// ==================== Collaborator seam ====================

/// External progress collaborator.
pub trait ProgressTracker {
    /// Current tier plus cumulative accuracy and attempt count.
    fn stats(&self) -> GlobalStats;

    /// Fold one answered question into the cumulative stats.
    fn note_attempt(&mut self, correct: bool);

    /// Commit a tier transition.
    fn advance_tier(&mut self, tier: Tier);
}

/// In-memory progress collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearnerProgress {
    tier: Tier,
    total_attempts: u32,
    total_correct: u32,
}

impl LearnerProgress {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            total_attempts: 0,
            total_correct: 0,
        }
    }
}

impl Default for LearnerProgress {
    fn default() -> Self {
        Self::new(Tier::Starter)
    }
}

impl ProgressTracker for LearnerProgress {
    fn stats(&self) -> GlobalStats {
        GlobalStats {
            tier: self.tier,
            accuracy: if self.total_attempts == 0 {
                0.0
            } else {
                self.total_correct as f64 / self.total_attempts as f64
            },
            total_attempts: self.total_attempts,
        }
    }

    fn note_attempt(&mut self, correct: bool) {
        self.total_attempts += 1;
        if correct {
            self.total_correct += 1;
        }
    }

    fn advance_tier(&mut self, tier: Tier) {
        // Progression is monotonic; a stale or backwards request is dropped.
        if tier > self.tier {
            info!("advancing from {:?} to {:?}", self.tier, tier);
            self.tier = tier;
        }
    }
}

// ==================== Evaluation ====================

/// Whether the learner currently satisfies a tier's progression criteria.
///
/// All three thresholds must hold simultaneously, boundary values included.
pub fn criteria_met(criteria: &ProgressionCriteria, stats: &GlobalStats, streak: u32) -> bool {
    stats.accuracy >= criteria.min_accuracy
        && stats.total_attempts >= criteria.min_questions_at_level
        && streak >= criteria.consecutive_correct_required
}
