//! Per-item performance ledger.
//!
//! Records are created lazily on the first attempt at an item, updated on
//! every attempt after that, and only ever cleared by a full reset. Accuracy
//! and difficulty are derived from the raw counters on demand, never stored,
//! so the two can never drift apart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// ==================== PerformanceRecord ====================

/// Mutable per-item statistics, owned exclusively by the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub attempts: u32,
    pub correct: u32,
    /// Incremental running mean of response latency.
    pub average_response_time_ms: f64,
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub last_seen: DateTime<Utc>,
}

impl PerformanceRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            attempts: 0,
            correct: 0,
            average_response_time_ms: 0.0,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            last_seen: now,
        }
    }

    /// Fraction of correct attempts, 0 when nothing was attempted.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    /// Derived difficulty in [0, 100]; higher means more trouble.
    pub fn difficulty_score(&self) -> u32 {
        ((1.0 - self.accuracy()) * 100.0).round() as u32
    }

    fn apply(&mut self, correct: bool, response_time_ms: f64, now: DateTime<Utc>) {
        let old_attempts = self.attempts as f64;
        self.attempts += 1;
        if correct {
            self.correct += 1;
            self.consecutive_correct += 1;
            self.consecutive_incorrect = 0;
        } else {
            self.consecutive_incorrect += 1;
            self.consecutive_correct = 0;
        }
        self.average_response_time_ms = (self.average_response_time_ms * old_attempts
            + response_time_ms)
            / self.attempts as f64;
        self.last_seen = now;
    }
}

// ==================== Aggregate stats ====================

/// Ledger-wide aggregates for the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub attempted_items: usize,
    pub total_attempts: u64,
    pub total_correct: u64,
    pub accuracy: f64,
}

// ==================== PerformanceLedger ====================

/// Store of per-item historical performance.
#[derive(Clone, Debug, Default)]
pub struct PerformanceLedger {
    records: HashMap<String, PerformanceRecord>,
}

impl PerformanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt at an item.
    ///
    /// An unknown item id creates a fresh record. Negative or non-finite
    /// response times are clamped to zero and logged; an empty id is
    /// rejected before any mutation. Losing one latency sample must never
    /// block the learner, so only the id is a hard error.
    pub fn record_attempt(
        &mut self,
        item_id: &str,
        correct: bool,
        response_time_ms: f64,
    ) -> EngineResult<()> {
        if item_id.is_empty() {
            return Err(EngineError::InvalidAttempt("empty item id".to_string()));
        }
        let response_time_ms = if response_time_ms.is_finite() && response_time_ms >= 0.0 {
            response_time_ms
        } else {
            warn!(
                "clamping invalid response time {} for {} to 0",
                response_time_ms, item_id
            );
            0.0
        };

        let now = Utc::now();
        self.records
            .entry(item_id.to_string())
            .or_insert_with(|| PerformanceRecord::new(now))
            .apply(correct, response_time_ms, now);
        Ok(())
    }

    pub fn get(&self, item_id: &str) -> Option<&PerformanceRecord> {
        self.records.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ledger-wide aggregates.
    pub fn stats(&self) -> LedgerStats {
        let total_attempts: u64 = self.records.values().map(|r| r.attempts as u64).sum();
        let total_correct: u64 = self.records.values().map(|r| r.correct as u64).sum();
        LedgerStats {
            attempted_items: self.records.len(),
            total_attempts,
            total_correct,
            accuracy: if total_attempts == 0 {
                0.0
            } else {
                total_correct as f64 / total_attempts as f64
            },
        }
    }

    /// Ordered snapshot for persistence (sorted by item id).
    pub fn snapshot(&self) -> Vec<(String, PerformanceRecord)> {
        let mut entries: Vec<(String, PerformanceRecord)> = self
            .records
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Replace the ledger contents from a snapshot.
    pub fn restore(&mut self, entries: Vec<(String, PerformanceRecord)>) {
        self.records = entries.into_iter().collect();
    }

    /// Drop every record. The only way records are ever removed.
    pub fn reset(&mut self) {
        self.records.clear();
    }
}
