use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::Reading;

/// Point-in-time view of the store, for logging and tests.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub reading:    Reading,
    /// Number of `set` calls since startup
    pub updates:    u64,
    /// When the last `set` happened, `None` while still serving the default
    pub updated_at: Option<DateTime<Utc>>
}

#[derive(Debug)]
struct Slot {
    reading:    Reading,
    updates:    u64,
    updated_at: Option<DateTime<Utc>>
}

/// Single-slot holder of the latest reading.
///
/// Handles are cheap to clone and all point at the same slot. The lock only
/// guards a pointer swap, so a reader never sees a partially written payload
/// and never waits on a copy.
#[derive(Debug, Clone)]
pub struct ReadingStore {
    slot: Arc<RwLock<Slot>>
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::with_initial(Reading::default())
    }

    pub fn with_initial(reading: Reading) -> Self {
        Self { slot: Arc::new(RwLock::new(Slot { reading, updates: 0, updated_at: None })) }
    }

    /// Replace the stored reading unconditionally.
    pub fn set<R: Into<Reading>>(&self, reading: R) {
        let reading = reading.into();
        let now = Utc::now();
        let previous = {
            let mut slot = self.slot.write();
            slot.updates += 1;
            slot.updated_at = Some(now);
            std::mem::replace(&mut slot.reading, reading)
        };
        // drop the old payload outside the lock
        drop(previous);
    }

    pub fn get(&self) -> Reading {
        self.slot.read().reading.clone()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let slot = self.slot.read();
        StoreSnapshot { reading: slot.reading.clone(), updates: slot.updates, updated_at: slot.updated_at }
    }
}

impl Default for ReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread};

    use super::*;
    use crate::domain::ZERO_READING;

    #[test]
    fn starts_with_zero_reading() {
        let store = ReadingStore::new();
        assert_eq!(store.get().as_str(), ZERO_READING);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.updates, 0);
        assert!(snapshot.updated_at.is_none());
    }

    #[test]
    fn set_replaces_value() {
        let store = ReadingStore::new();
        store.set("{\"attention\":\"1\"}");
        store.set("{\"attention\":\"2\"}");

        assert_eq!(store.get().as_str(), "{\"attention\":\"2\"}");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.updates, 2);
        assert!(snapshot.updated_at.is_some());
    }

    #[test]
    fn clones_share_the_slot() {
        let store = ReadingStore::new();
        let handle = store.clone();
        handle.set("shared");
        assert_eq!(store.get().as_str(), "shared");
    }

    #[test]
    fn concurrent_readers_only_see_written_values() {
        let store = ReadingStore::new();
        let written: Vec<String> =
            (0..500).map(|i| format!("{{\"attention\":\"{i}\",\"padding\":\"{}\"}}", "x".repeat(i % 64))).collect();

        let mut allowed: HashSet<String> = written.iter().cloned().collect();
        allowed.insert(ZERO_READING.to_string());

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || (0..2_000).map(|_| store.get().as_str().to_string()).collect::<Vec<_>>())
            })
            .collect();

        for value in &written {
            store.set(value.as_str());
        }

        for reader in readers {
            for seen in reader.join().unwrap() {
                assert!(allowed.contains(&seen), "torn or unknown value: {seen}");
            }
        }
        assert_eq!(store.get().as_str(), written.last().unwrap().as_str());
    }
}
