use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CollectorResult;
use crate::storage::traits::SeenStore;

/// Seen IDs kept as one JSON array, read and written whole
pub struct JsonSeenStore {
    path: PathBuf,
    ids: BTreeSet<String>,
    dirty: bool,
}

impl JsonSeenStore {
    /// A missing file is an empty store; an unreadable one is an error
    pub fn load<P: AsRef<Path>>(path: P) -> CollectorResult<Self> {
        let path = path.as_ref().to_path_buf();

        let ids = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeSet::new()
            } else {
                serde_json::from_str::<Vec<String>>(&raw)?.into_iter().collect()
            }
        } else {
            tracing::warn!(path = %path.display(), "No seen-ID file yet, starting empty");
            BTreeSet::new()
        };

        Ok(Self {
            path,
            ids,
            dirty: false,
        })
    }
}

impl SeenStore for JsonSeenStore {
    fn contains(&self, id: &str) -> CollectorResult<bool> {
        Ok(self.ids.contains(id))
    }

    fn add(&mut self, id: &str) -> CollectorResult<()> {
        if self.ids.insert(id.to_string()) {
            self.dirty = true;
        }
        Ok(())
    }

    fn save(&mut self) -> CollectorResult<()> {
        if !self.dirty && self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.ids)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        self.dirty = false;
        Ok(())
    }

    fn len(&self) -> CollectorResult<usize> {
        Ok(self.ids.len())
    }
}
