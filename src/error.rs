//! Engine error taxonomy.
//!
//! Configuration and empty-pool errors propagate to the caller; there is no
//! safe default item to fall back to. Data-quality problems in recorded
//! attempts are clamped and logged locally instead of propagating, so one
//! bad data point never blocks the learner.

use thiserror::Error;

use crate::types::Tier;

/// Errors surfaced by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested tier has no configuration. Never silently defaulted.
    #[error("no configuration for tier {0:?}")]
    ConfigurationNotFound(Tier),

    /// Active filters eliminated every candidate.
    #[error("candidate pool is empty after filtering")]
    EmptyCandidatePool,

    /// A malformed field was passed to the ledger.
    #[error("invalid attempt: {0}")]
    InvalidAttempt(String),

    /// A tier configuration failed load-time validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A snapshot failed to encode or decode.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persistence collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
