//! The slot-store seam and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

/// A durable string-keyed slot store.
///
/// Callers serialize their own payloads; a slot holds one opaque string.
/// Implementations must tolerate unknown keys (`get`/`remove` of an absent
/// key is not an error).
pub trait SlotStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Volatile slot store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}
