//! Tier configuration store.
//!
//! Read-mostly table of per-tier definitions, validated once at load time.
//! Lookups for an unknown tier fail with `ConfigurationNotFound` rather than
//! silently defaulting to another tier.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::types::{Clef, OctaveRange, ProgressionCriteria, Tier, TierConfig};

/// Owns the tier configuration table.
#[derive(Clone, Debug)]
pub struct TierConfigStore {
    configs: HashMap<Tier, TierConfig>,
}

impl TierConfigStore {
    /// Build a store from an explicit table, validating every entry.
    pub fn new(configs: Vec<TierConfig>) -> EngineResult<Self> {
        let mut table = HashMap::new();
        for cfg in configs {
            validate(&cfg)?;
            table.insert(cfg.tier, cfg);
        }
        Ok(Self { configs: table })
    }

    /// The built-in three-tier curriculum.
    ///
    /// Starter stays within one octave around middle C per clef with no
    /// accidentals; Intermediate widens the ranges; Advanced opens the full
    /// ranges, enables accidentals, and weights ledger-line notes up.
    pub fn standard() -> Self {
        let starter = TierConfig {
            tier: Tier::Starter,
            ranges: [
                (Clef::Treble, OctaveRange::new(4, 4)),
                (Clef::Bass, OctaveRange::new(3, 3)),
            ]
            .into_iter()
            .collect(),
            distribution: [(Clef::Treble, 1.0), (Clef::Bass, 1.0)].into_iter().collect(),
            accidentals: false,
            base_weights: HashMap::new(),
            progression: ProgressionCriteria {
                min_accuracy: 0.85,
                min_questions_at_level: 20,
                consecutive_correct_required: 5,
            },
        };

        let intermediate = TierConfig {
            tier: Tier::Intermediate,
            ranges: [
                (Clef::Treble, OctaveRange::new(4, 5)),
                (Clef::Bass, OctaveRange::new(2, 3)),
            ]
            .into_iter()
            .collect(),
            distribution: [(Clef::Treble, 1.0), (Clef::Bass, 1.2)].into_iter().collect(),
            accidentals: false,
            base_weights: [
                // Ledger-line notes around middle C trip learners up most.
                ("C4-treble".to_string(), 1.5),
                ("C4-bass".to_string(), 1.5),
            ]
            .into_iter()
            .collect(),
            progression: ProgressionCriteria {
                min_accuracy: 0.9,
                min_questions_at_level: 40,
                consecutive_correct_required: 8,
            },
        };

        let advanced = TierConfig {
            tier: Tier::Advanced,
            ranges: [
                (Clef::Treble, OctaveRange::new(3, 6)),
                (Clef::Bass, OctaveRange::new(1, 4)),
            ]
            .into_iter()
            .collect(),
            distribution: [(Clef::Treble, 1.0), (Clef::Bass, 1.0)].into_iter().collect(),
            accidentals: true,
            base_weights: [
                ("A5-treble".to_string(), 1.4),
                ("B5-treble".to_string(), 1.4),
                ("C6-treble".to_string(), 1.6),
                ("E1-bass".to_string(), 1.6),
                ("F1-bass".to_string(), 1.4),
            ]
            .into_iter()
            .collect(),
            progression: ProgressionCriteria {
                min_accuracy: 0.95,
                min_questions_at_level: 60,
                consecutive_correct_required: 10,
            },
        };

        // The built-in table is statically valid.
        Self::new(vec![starter, intermediate, advanced]).expect("standard table is valid")
    }

    /// Look up the configuration for a tier.
    pub fn get(&self, tier: Tier) -> EngineResult<&TierConfig> {
        self.configs
            .get(&tier)
            .ok_or(EngineError::ConfigurationNotFound(tier))
    }
}

impl Default for TierConfigStore {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reject configurations that would corrupt weighting or progression.
fn validate(cfg: &TierConfig) -> EngineResult<()> {
    for (clef, range) in &cfg.ranges {
        if range.low > range.high {
            return Err(EngineError::InvalidConfiguration(format!(
                "tier {:?}: inverted octave range for {:?}",
                cfg.tier, clef
            )));
        }
    }
    for (clef, weight) in &cfg.distribution {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "tier {:?}: non-positive distribution weight for {:?}",
                cfg.tier, clef
            )));
        }
    }
    for (id, weight) in &cfg.base_weights {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "tier {:?}: non-positive base weight for {}",
                cfg.tier, id
            )));
        }
    }
    let p = &cfg.progression;
    if !(0.0..=1.0).contains(&p.min_accuracy) {
        return Err(EngineError::InvalidConfiguration(format!(
            "tier {:?}: min_accuracy outside [0, 1]",
            cfg.tier
        )));
    }
    Ok(())
}
