//! Persistence boundary.
//!
//! The engine round-trips exactly three logical records through a key-value
//! collaborator: the performance ledger, the selection history, and the
//! current tier. Values cross the boundary as JSON; `chrono` timestamps
//! serialize as RFC 3339, so `last_seen` survives a round trip as a
//! timestamp rather than an opaque string. When to save is the caller's
//! schedule, not the engine's.

use std::collections::HashMap;

use crate::error::EngineResult;

/// Storage key for the ledger snapshot.
pub const LEDGER_KEY: &str = "notedrill.performance";
/// Storage key for the selection-history snapshot.
pub const HISTORY_KEY: &str = "notedrill.history";
/// Storage key for the current tier.
pub const TIER_KEY: &str = "notedrill.tier";

/// Key-value persistence collaborator.
pub trait KeyValueStore {
    fn save(&mut self, key: &str, value: &str) -> EngineResult<()>;
    fn load(&self, key: &str) -> EngineResult<Option<String>>;
    fn clear(&mut self, key: &str) -> EngineResult<()>;
}

/// In-memory store, used by tests and as a reference implementation.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn clear(&mut self, key: &str) -> EngineResult<()> {
        self.values.remove(key);
        Ok(())
    }
}
