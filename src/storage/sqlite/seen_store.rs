use std::path::Path;

use crate::errors::CollectorResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::SeenStore;

/// Seen IDs in a `seen_articles` table; every `add` is written immediately
pub struct SqliteSeenStore {
    storage: SqliteStorage,
}

impl SqliteSeenStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> CollectorResult<Self> {
        Ok(Self::new(SqliteStorage::new(path)?))
    }
}

impl SeenStore for SqliteSeenStore {
    fn contains(&self, id: &str) -> CollectorResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM seen_articles WHERE id = ?1)")?;
        let exists: bool = stmt.query_row([id], |row| row.get(0))?;
        Ok(exists)
    }

    fn add(&mut self, id: &str) -> CollectorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute("INSERT OR IGNORE INTO seen_articles (id) VALUES (?1)", [id])?;
        Ok(())
    }

    fn save(&mut self) -> CollectorResult<()> {
        Ok(())
    }

    fn len(&self) -> CollectorResult<usize> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM seen_articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
