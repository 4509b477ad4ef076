use crate::error::Result;
use crate::FrequencyStore;
use std::collections::HashMap;

/// In-memory frequency store for tests and dry runs.
///
/// Counts live only as long as the process; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counts: HashMap<String, u64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-existing counts.
    #[must_use]
    pub fn with_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        MemoryStore {
            counts: counts.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl FrequencyStore for MemoryStore {
    fn lookup(&self, number: &str) -> Result<u64> {
        Ok(self.counts.get(number).copied().unwrap_or(0))
    }

    fn increment(&mut self, number: &str) -> Result<()> {
        *self.counts.entry(number.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn reset_all(&mut self) -> Result<()> {
        self.counts.clear();
        Ok(())
    }

    fn entry_count(&self) -> Result<u64> {
        Ok(self.counts.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unseen_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.lookup("5551234567").unwrap(), 0);
    }

    #[test]
    fn test_increment_adds_exactly_one() {
        let mut store = MemoryStore::new();
        store.increment("5551234567").unwrap();
        store.increment("5551234567").unwrap();
        assert_eq!(store.lookup("5551234567").unwrap(), 2);
    }

    #[test]
    fn test_commit_kept_batch() {
        let mut store = MemoryStore::with_counts([("5550000000", 3)]);
        store
            .commit_kept(&["5550000000".to_string(), "5551111111".to_string()])
            .unwrap();
        assert_eq!(store.lookup("5550000000").unwrap(), 4);
        assert_eq!(store.lookup("5551111111").unwrap(), 1);
        assert_eq!(store.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_reset_all() {
        let mut store = MemoryStore::with_counts([("5550000000", 3), ("5551111111", 1)]);
        store.reset_all().unwrap();
        assert_eq!(store.lookup("5550000000").unwrap(), 0);
        assert_eq!(store.lookup("5551111111").unwrap(), 0);
        assert_eq!(store.entry_count().unwrap(), 0);
    }
}
