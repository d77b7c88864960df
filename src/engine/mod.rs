//! Drill engine façade.
//!
//! Owns the ledger, the selection history, the selector and the session
//! streak, and wires them to the configuration store and the progress
//! collaborator. Two operations drive everything: [`DrillEngine::next_note`]
//! produces the next item to present, [`DrillEngine::record_answer`] folds
//! one answer into the ledger and evaluates progression.
//!
//! Single-threaded by contract: each operation is one synchronous call, and
//! the engine instance owns its mutable state exclusively. Embedders in a
//! concurrent environment should serialize calls per learner session.

use crate::catalog::build_candidates;
use crate::config::TierConfigStore;
use crate::error::{EngineError, EngineResult};
use crate::history::SelectionHistory;
use crate::ledger::{LedgerStats, PerformanceLedger};
use crate::persist::{KeyValueStore, HISTORY_KEY, LEDGER_KEY, TIER_KEY};
use crate::progression::{criteria_met, LearnerProgress, ProgressTracker};
use crate::selector::WeightedSelector;
use crate::types::{ActiveFilters, GlobalStats, Note, Tier};
use crate::weights::compute_weights;

/// Result of recording one answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttemptOutcome {
    /// The tier entered by this answer, if progression fired.
    pub advanced_to: Option<Tier>,
    /// Global stats after the answer was folded in.
    pub stats: GlobalStats,
}

/// Adaptive item-selection and progression engine.
pub struct DrillEngine<P: ProgressTracker = LearnerProgress> {
    config: TierConfigStore,
    filters: ActiveFilters,
    ledger: PerformanceLedger,
    history: SelectionHistory,
    selector: WeightedSelector,
    progress: P,
    /// Session-level consecutive-correct streak, independent of the
    /// per-item streaks in the ledger.
    session_streak: u32,
}

impl DrillEngine<LearnerProgress> {
    /// Engine over the standard curriculum with a time-seeded selector.
    pub fn new() -> Self {
        Self::with_parts(
            TierConfigStore::standard(),
            LearnerProgress::default(),
            WeightedSelector::new(),
        )
    }

    /// Engine over the standard curriculum with a fixed selector seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(
            TierConfigStore::standard(),
            LearnerProgress::default(),
            WeightedSelector::with_seed(seed),
        )
    }
}

impl Default for DrillEngine<LearnerProgress> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProgressTracker> DrillEngine<P> {
    /// Engine from explicit collaborators.
    pub fn with_parts(config: TierConfigStore, progress: P, selector: WeightedSelector) -> Self {
        Self {
            config,
            filters: ActiveFilters::default(),
            ledger: PerformanceLedger::new(),
            history: SelectionHistory::new(),
            selector,
            progress,
            session_streak: 0,
        }
    }

    // ==================== Core operations ====================

    /// Choose the next note to present.
    ///
    /// Candidates come from the current tier's catalog, pass through the
    /// active filters, get scored against the ledger and history, and one
    /// is drawn by weight. The draw is pushed onto the history before it is
    /// returned.
    pub fn next_note(&mut self) -> EngineResult<Note> {
        let tier = self.progress.stats().tier;
        let cfg = self.config.get(tier)?;

        let candidates = build_candidates(cfg, &self.filters);
        if candidates.is_empty() {
            return Err(EngineError::EmptyCandidatePool);
        }

        let weighted = compute_weights(candidates, cfg, &self.ledger, &self.history);
        let note = self.selector.select(&weighted)?.clone();
        self.history.push(note.clone());
        Ok(note)
    }

    /// Record one answered question and evaluate progression.
    ///
    /// The ledger and the session streak update first, then the progress
    /// collaborator folds the answer into the global stats, and finally the
    /// current tier's criteria are checked. A transition moves exactly one
    /// tier forward; at the terminal tier evaluation is a no-op.
    pub fn record_answer(
        &mut self,
        item_id: &str,
        correct: bool,
        response_time_ms: f64,
    ) -> EngineResult<AttemptOutcome> {
        self.ledger.record_attempt(item_id, correct, response_time_ms)?;
        if correct {
            self.session_streak += 1;
        } else {
            self.session_streak = 0;
        }
        self.progress.note_attempt(correct);

        let stats = self.progress.stats();
        let cfg = self.config.get(stats.tier)?;
        let mut advanced_to = None;
        if criteria_met(&cfg.progression, &stats, self.session_streak) {
            if let Some(next) = stats.tier.next() {
                self.progress.advance_tier(next);
                advanced_to = Some(next);
            }
        }

        Ok(AttemptOutcome {
            advanced_to,
            stats: self.progress.stats(),
        })
    }

    // ==================== State access ====================

    pub fn set_filters(&mut self, filters: ActiveFilters) {
        self.filters = filters;
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn stats(&self) -> GlobalStats {
        self.progress.stats()
    }

    pub fn ledger_stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    pub fn session_streak(&self) -> u32 {
        self.session_streak
    }

    /// Clear ledger, history and the session streak.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.history.reset();
        self.session_streak = 0;
    }

    // ==================== Persistence ====================

    /// Write the three persistent records to the store.
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> EngineResult<()> {
        let ledger = serde_json::to_string(&self.ledger.snapshot())?;
        store.save(LEDGER_KEY, &ledger)?;
        let history = serde_json::to_string(&self.history.snapshot())?;
        store.save(HISTORY_KEY, &history)?;
        let tier = serde_json::to_string(&self.progress.stats().tier)?;
        store.save(TIER_KEY, &tier)?;
        Ok(())
    }

    /// Restore whatever of the three records the store holds.
    pub fn load_from(&mut self, store: &dyn KeyValueStore) -> EngineResult<()> {
        if let Some(json) = store.load(LEDGER_KEY)? {
            self.ledger.restore(serde_json::from_str(&json)?);
        }
        if let Some(json) = store.load(HISTORY_KEY)? {
            self.history.restore(serde_json::from_str(&json)?);
        }
        if let Some(json) = store.load(TIER_KEY)? {
            let tier: Tier = serde_json::from_str(&json)?;
            self.progress.advance_tier(tier);
        }
        Ok(())
    }

    /// Remove the three persistent records from the store.
    pub fn clear_saved(&self, store: &mut dyn KeyValueStore) -> EngineResult<()> {
        store.clear(LEDGER_KEY)?;
        store.clear(HISTORY_KEY)?;
        store.clear(TIER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::persist::MemoryStore;
    use crate::types::{Clef, ProgressionCriteria};

    /// Standard store with relaxed starter criteria for progression tests.
    fn quick_progression_store() -> TierConfigStore {
        let standard = TierConfigStore::standard();
        let mut starter = standard.get(Tier::Starter).unwrap().clone();
        starter.progression = ProgressionCriteria {
            min_accuracy: 0.8,
            min_questions_at_level: 5,
            consecutive_correct_required: 3,
        };
        TierConfigStore::new(vec![
            starter,
            standard.get(Tier::Intermediate).unwrap().clone(),
            standard.get(Tier::Advanced).unwrap().clone(),
        ])
        .unwrap()
    }

    #[test]
    fn test_next_note_draws_from_current_tier() {
        let mut engine = DrillEngine::with_seed(42);
        for _ in 0..20 {
            let note = engine.next_note().expect("starter pool is non-empty");
            // Starter: octave 4 treble, octave 3 bass, no accidentals.
            assert!(note.accidental.is_none());
            match note.clef {
                Clef::Treble => assert_eq!(note.octave, 4),
                Clef::Bass => assert_eq!(note.octave, 3),
            }
        }
    }

    #[test]
    fn test_selection_lands_in_history() {
        let mut engine = DrillEngine::with_seed(42);
        let note = engine.next_note().unwrap();
        assert_eq!(
            engine.history().position(&note.id),
            Some(0),
            "The draw is the most recent history entry"
        );
    }

    #[test]
    fn test_empty_pool_is_surfaced() {
        let mut engine = DrillEngine::with_seed(42);
        engine.set_filters(ActiveFilters {
            clef: None,
            focus: Some(HashSet::new()),
        });
        let err = engine.next_note().unwrap_err();
        assert!(matches!(err, EngineError::EmptyCandidatePool));
    }

    #[test]
    fn test_missing_tier_config_is_surfaced() {
        let store = TierConfigStore::new(vec![]).unwrap();
        let mut engine =
            DrillEngine::with_parts(store, LearnerProgress::default(), WeightedSelector::with_seed(1));
        let err = engine.next_note().unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationNotFound(Tier::Starter)));
    }

    #[test]
    fn test_focus_filter_narrows_the_draw() {
        let mut engine = DrillEngine::with_seed(42);
        let focus: HashSet<String> = ["C4-treble".to_string()].into_iter().collect();
        engine.set_filters(ActiveFilters {
            clef: None,
            focus: Some(focus),
        });
        for _ in 0..10 {
            assert_eq!(engine.next_note().unwrap().id, "C4-treble");
        }
    }

    #[test]
    fn test_progression_fires_exactly_once_at_the_boundary() {
        let mut engine = DrillEngine::with_parts(
            quick_progression_store(),
            LearnerProgress::default(),
            WeightedSelector::with_seed(42),
        );

        // One miss, then four hits: after the fifth answer accuracy is
        // exactly 0.8 over exactly 5 attempts with a streak of 4.
        let outcome = engine.record_answer("C4-treble", false, 900.0).unwrap();
        assert_eq!(outcome.advanced_to, None);
        for i in 0..4 {
            let outcome = engine.record_answer("C4-treble", true, 900.0).unwrap();
            if i < 3 {
                assert_eq!(outcome.advanced_to, None, "Criteria not yet met at answer {i}");
            } else {
                assert_eq!(
                    outcome.advanced_to,
                    Some(Tier::Intermediate),
                    "Boundary-exact stats advance exactly one tier"
                );
            }
        }
        assert_eq!(engine.stats().tier, Tier::Intermediate);

        // The next answer evaluates against intermediate criteria and must
        // not advance again.
        let outcome = engine.record_answer("C4-treble", true, 900.0).unwrap();
        assert_eq!(outcome.advanced_to, None);
        assert_eq!(outcome.stats.tier, Tier::Intermediate);
    }

    #[test]
    fn test_session_streak_resets_on_miss() {
        let mut engine = DrillEngine::with_seed(42);
        engine.record_answer("C4-treble", true, 500.0).unwrap();
        engine.record_answer("D4-treble", true, 500.0).unwrap();
        assert_eq!(engine.session_streak(), 2);

        engine.record_answer("E4-treble", false, 500.0).unwrap();
        assert_eq!(engine.session_streak(), 0);

        // The per-item streak for earlier items is untouched.
        assert_eq!(engine.ledger().get("C4-treble").unwrap().consecutive_correct, 1);
    }

    #[test]
    fn test_terminal_tier_is_a_no_op() {
        let mut engine = DrillEngine::with_parts(
            quick_progression_store(),
            LearnerProgress::new(Tier::Advanced),
            WeightedSelector::with_seed(42),
        );
        // Far past any criteria.
        for _ in 0..100 {
            let outcome = engine.record_answer("C4-treble", true, 400.0).unwrap();
            assert_eq!(outcome.advanced_to, None);
            assert_eq!(outcome.stats.tier, Tier::Advanced);
        }
    }

    #[test]
    fn test_invalid_item_id_does_not_disturb_state() {
        let mut engine = DrillEngine::with_seed(42);
        engine.record_answer("C4-treble", true, 500.0).unwrap();

        let err = engine.record_answer("", true, 500.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAttempt(_)));
        assert_eq!(engine.stats().total_attempts, 1, "Rejected answer is not counted");
        assert_eq!(engine.session_streak(), 1);
    }

    #[test]
    fn test_negative_response_time_still_counts() {
        let mut engine = DrillEngine::with_seed(42);
        let outcome = engine.record_answer("C4-treble", true, -250.0).unwrap();
        assert_eq!(outcome.stats.total_attempts, 1);
        assert_eq!(engine.ledger().get("C4-treble").unwrap().average_response_time_ms, 0.0);
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut store = MemoryStore::new();

        let mut engine = DrillEngine::with_parts(
            quick_progression_store(),
            LearnerProgress::default(),
            WeightedSelector::with_seed(42),
        );
        let first = engine.next_note().unwrap();
        engine.record_answer(&first.id, false, 1100.0).unwrap();
        for _ in 0..4 {
            engine.record_answer(&first.id, true, 800.0).unwrap();
        }
        assert_eq!(engine.stats().tier, Tier::Intermediate);
        engine.save_to(&mut store).unwrap();

        let mut restored = DrillEngine::with_parts(
            quick_progression_store(),
            LearnerProgress::default(),
            WeightedSelector::with_seed(7),
        );
        restored.load_from(&store).unwrap();

        assert_eq!(restored.stats().tier, Tier::Intermediate, "Tier round-trips");
        let record = restored.ledger().get(&first.id).expect("ledger round-trips");
        assert_eq!(record.attempts, 5);
        assert_eq!(record.correct, 4);
        assert_eq!(restored.history().position(&first.id), Some(0), "History round-trips");
    }

    #[test]
    fn test_clear_saved_removes_all_records() {
        let mut store = MemoryStore::new();
        let mut engine = DrillEngine::with_seed(42);
        engine.next_note().unwrap();
        engine.save_to(&mut store).unwrap();

        engine.clear_saved(&mut store).unwrap();
        assert_eq!(store.load(LEDGER_KEY).unwrap(), None);
        assert_eq!(store.load(HISTORY_KEY).unwrap(), None);
        assert_eq!(store.load(TIER_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_clears_session_state() {
        let mut engine = DrillEngine::with_seed(42);
        engine.next_note().unwrap();
        engine.record_answer("C4-treble", true, 500.0).unwrap();

        engine.reset();
        assert!(engine.ledger().is_empty());
        assert!(engine.history().is_empty());
        assert_eq!(engine.session_streak(), 0);
    }

    #[test]
    fn test_struggling_items_come_up_more_often() {
        let mut engine = DrillEngine::with_seed(42);
        // Miss C4-treble badly, master everything else lightly.
        for _ in 0..6 {
            engine.record_answer("C4-treble", false, 1500.0).unwrap();
        }
        for name in ["D4-treble", "E4-treble", "F4-treble", "G4-treble"] {
            engine.record_answer(name, true, 600.0).unwrap();
        }

        let mut c4_draws = 0usize;
        let draws = 2_000usize;
        for _ in 0..draws {
            if engine.next_note().unwrap().id == "C4-treble" {
                c4_draws += 1;
            }
        }
        // 14 starter items drawn uniformly would give ~143 of 2000; the
        // failing streak should pull well above that even with the recency
        // penalty pushing back.
        assert!(
            c4_draws > draws / 10,
            "Struggling item drawn only {c4_draws} of {draws}"
        );
    }
}
