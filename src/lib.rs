//! # notedrill - adaptive note-drill selection engine
//!
//! Core selection and progression logic for a note-identification drill:
//! given a learner's history over a fixed universe of staff notes, pick the
//! next note to present so that weak items come up more, just-seen items
//! come up less, and the learner climbs through difficulty tiers once
//! mastery criteria are met.
//!
//! Design goals:
//! - **Pure Rust** - no UI, storage or network concerns; collaborators sit
//!   behind small traits
//! - **Deterministic** - catalogs are pure functions of configuration, and
//!   the selector takes an explicit seed
//! - **Fully tested** - every component carries unit tests, invariants are
//!   property-tested
//!
//! ## Module structure
//!
//! - [`types`] - notes, clefs, tiers, configuration and filter types
//! - [`config`] - validated tier configuration store
//! - [`catalog`] - deterministic candidate enumeration and filtering
//! - [`ledger`] - per-item performance records
//! - [`history`] - bounded recent-selection window
//! - [`weights`] - performance-weighted scoring
//! - [`selector`] - seeded weighted random draw
//! - [`progression`] - tier criteria evaluation and the progress seam
//! - [`persist`] - key-value persistence boundary
//! - [`engine`] - the façade wiring it all together
//!
//! ## Usage
//!
//! ```rust
//! use notedrill::DrillEngine;
//!
//! let mut engine = DrillEngine::with_seed(42);
//!
//! let note = engine.next_note().unwrap();
//! // ... present the note, collect the learner's answer ...
//! let outcome = engine.record_answer(&note.id, true, 850.0).unwrap();
//!
//! if let Some(tier) = outcome.advanced_to {
//!     println!("advanced to {tier:?}");
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod ledger;
pub mod persist;
pub mod progression;
pub mod selector;
pub mod types;
pub mod weights;

pub use catalog::build_candidates;
pub use config::TierConfigStore;
pub use engine::{AttemptOutcome, DrillEngine};
pub use error::{EngineError, EngineResult};
pub use history::{SelectionHistory, HISTORY_CAPACITY};
pub use ledger::{LedgerStats, PerformanceLedger, PerformanceRecord};
pub use persist::{KeyValueStore, MemoryStore, HISTORY_KEY, LEDGER_KEY, TIER_KEY};
pub use progression::{criteria_met, LearnerProgress, ProgressTracker};
pub use selector::WeightedSelector;
pub use types::{
    Accidental, ActiveFilters, Clef, GlobalStats, Note, NoteName, OctaveRange,
    ProgressionCriteria, Tier, TierConfig,
};
pub use weights::{compute_weights, WeightedNote, MIN_WEIGHT};
