pub mod traits;
pub mod json;
pub mod sqlite;

use std::path::Path;

use crate::errors::CollectorResult;

pub use json::JsonSeenStore;
pub use sqlite::SqliteSeenStore;
pub use traits::SeenStore;

/// Open the store for `path`: SQLite for `.db`/`.sqlite` files, a JSON array otherwise
pub fn open_seen_store(path: &Path) -> CollectorResult<Box<dyn SeenStore>> {
    let is_sqlite = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "db" | "sqlite" | "sqlite3"))
        .unwrap_or(false);

    if is_sqlite {
        Ok(Box::new(SqliteSeenStore::open(path)?))
    } else {
        Ok(Box::new(JsonSeenStore::load(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_picks_backend_by_extension() {
        let dir = TempDir::new().unwrap();

        let mut sqlite = open_seen_store(&dir.path().join("state.db")).unwrap();
        sqlite.add("a").unwrap();
        sqlite.save().unwrap();
        assert!(dir.path().join("state.db").exists());

        let mut json = open_seen_store(&dir.path().join("seen_ids.json")).unwrap();
        json.add("b").unwrap();
        json.save().unwrap();
        let raw = std::fs::read_to_string(dir.path().join("seen_ids.json")).unwrap();
        assert!(raw.contains("\"b\""));
    }
}
