//! # datacleanse-ledger
//!
//! The historical frequency ledger: a durable mapping from normalized
//! phone number to the cumulative count of runs that kept it.
//!
//! The engine is the only writer. All mutation goes through `&mut self`,
//! so two runs against one store are serialized by the borrow checker;
//! callers sharing a store across processes must serialize runs
//! themselves. Per-run increments are applied through [`FrequencyStore::commit_kept`]
//! so a failed run leaves no partial counts behind.

mod error;
mod memory;
mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistent occurrence counts keyed by normalized phone number.
pub trait FrequencyStore {
    /// Cumulative count of prior kept occurrences, 0 if unseen.
    fn lookup(&self, number: &str) -> Result<u64>;

    /// Add exactly 1 to a number's count. Callers invoke this at most once
    /// per kept occurrence per run.
    fn increment(&mut self, number: &str) -> Result<()>;

    /// Apply one run's kept numbers as a batch. Implementations with a
    /// durable backend make this atomic: either every count lands or none
    /// does.
    fn commit_kept(&mut self, numbers: &[String]) -> Result<()> {
        for number in numbers {
            self.increment(number)?;
        }
        Ok(())
    }

    /// Irreversibly clear every frequency entry.
    fn reset_all(&mut self) -> Result<()>;

    /// Number of distinct numbers currently tracked.
    fn entry_count(&self) -> Result<u64>;
}
