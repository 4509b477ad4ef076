use crate::error::{Result, StoreError};
use crate::FrequencyStore;
use datacleanse_types::{ProcessingStats, RunRecord};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS number_frequency (
    number TEXT PRIMARY KEY,
    occurrence_count INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS run_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    file_name TEXT NOT NULL,
    stats_json TEXT NOT NULL
);
";

/// SQLite-backed frequency store.
///
/// Durable across process restarts. One database holds both the
/// number-frequency table and the run history.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::apply_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Open an in-memory store (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::apply_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    fn apply_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT INTO schema_version (version)
             SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM schema_version LIMIT 1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Record a completed run in the history table.
    pub fn record_run(&mut self, file_name: &str, stats: &ProcessingStats) -> Result<i64> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let stats_json = serde_json::to_string(stats)?;
        self.conn.execute(
            "INSERT INTO run_history (created_at, file_name, stats_json) VALUES (?1, ?2, ?3)",
            params![created_at, file_name, stats_json],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent runs, newest first.
    pub fn recent_runs(&self, limit: u32) -> Result<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, file_name, stats_json FROM run_history
             ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, date, file_name, stats_json) = row?;
            let stats: ProcessingStats = serde_json::from_str(&stats_json)
                .map_err(|e| StoreError::InvalidData(format!("run {id} stats: {e}")))?;
            out.push(RunRecord {
                id,
                date,
                file_name,
                stats,
            });
        }
        Ok(out)
    }
}

impl FrequencyStore for SqliteStore {
    fn lookup(&self, number: &str) -> Result<u64> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT occurrence_count FROM number_frequency WHERE number = ?1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    fn increment(&mut self, number: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO number_frequency (number, occurrence_count) VALUES (?1, 1)
             ON CONFLICT(number) DO UPDATE SET occurrence_count = occurrence_count + 1",
            params![number],
        )?;
        Ok(())
    }

    // One transaction per run: a crash mid-commit leaves no partial counts.
    fn commit_kept(&mut self, numbers: &[String]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO number_frequency (number, occurrence_count) VALUES (?1, 1)
                 ON CONFLICT(number) DO UPDATE SET occurrence_count = occurrence_count + 1",
            )?;
            for number in numbers {
                stmt.execute(params![number])?;
            }
        }
        tx.commit()?;
        debug!(count = numbers.len(), "committed kept numbers");
        Ok(())
    }

    fn reset_all(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM number_frequency", [])?;
        debug!("frequency ledger cleared");
        Ok(())
    }

    fn entry_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM number_frequency", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_stats() -> ProcessingStats {
        ProcessingStats {
            total_rows: 4,
            total_numbers: 3,
            intra_sheet_duplicates: 1,
            historical_duplicates: 0,
            valid_numbers: 2,
            processed_file_name: "cleaned_daily.xlsx".to_string(),
            processing_time_ms: 7,
        }
    }

    #[test]
    fn test_lookup_and_increment() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.lookup("5551234567").unwrap(), 0);

        store.increment("5551234567").unwrap();
        store.increment("5551234567").unwrap();
        assert_eq!(store.lookup("5551234567").unwrap(), 2);
        assert_eq!(store.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_commit_kept_is_batched() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .commit_kept(&["5551111111".to_string(), "5552222222".to_string()])
            .unwrap();
        assert_eq!(store.lookup("5551111111").unwrap(), 1);
        assert_eq!(store.lookup("5552222222").unwrap(), 1);
    }

    #[test]
    fn test_reset_all_clears_every_entry() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.increment("5551111111").unwrap();
        store.increment("5552222222").unwrap();

        store.reset_all().unwrap();
        assert_eq!(store.lookup("5551111111").unwrap(), 0);
        assert_eq!(store.lookup("5552222222").unwrap(), 0);
        assert_eq!(store.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_counts_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.increment("5551234567").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.lookup("5551234567").unwrap(), 1);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/history.db");
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.entry_count().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_run_history_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let stats = sample_stats();
        let id = store.record_run("daily.xlsx", &stats).unwrap();

        let runs = store.recent_runs(10).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].id, id);
        assert_eq!(runs[0].file_name, "daily.xlsx");
        assert_eq!(runs[0].stats, stats);

        // reset_all clears frequencies, not the processing history
        store.reset_all().unwrap();
        assert_eq!(store.recent_runs(10).unwrap().len(), 1);
    }

    #[test]
    fn test_recent_runs_newest_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.record_run("monday.xlsx", &sample_stats()).unwrap();
        store.record_run("tuesday.xlsx", &sample_stats()).unwrap();

        let runs = store.recent_runs(1).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].file_name, "tuesday.xlsx");
    }
}
