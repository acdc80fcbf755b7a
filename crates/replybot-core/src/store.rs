//! File-backed store for the reply configuration document.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{document::ConfigDocument, error::ReplyBotError};

/// Loads and replaces the configuration document as a whole; there is no
/// field-level persistence. Every inbound event reads a fresh snapshot, so
/// dashboard edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current document.
    ///
    /// A missing file is first-run: the default seed is written to disk and
    /// returned. An unreadable or unparseable file falls back to the seed
    /// WITHOUT touching what is on disk; missing fields inside a readable
    /// document recover to field defaults.
    pub fn load(&self) -> Result<ConfigDocument, ReplyBotError> {
        if !self.path.exists() {
            let seed = ConfigDocument::default();
            self.write(&seed)?;
            info!(
                "seeded default reply configuration at {}",
                self.path.display()
            );
            return Ok(seed);
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "failed to read {}: {e}, using defaults",
                    self.path.display()
                );
                return Ok(ConfigDocument::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(
                    "malformed reply configuration in {}: {e}, using defaults",
                    self.path.display()
                );
                Ok(ConfigDocument::default())
            }
        }
    }

    /// Replace the document wholesale.
    ///
    /// Rejects the write when the document on disk has moved past the
    /// revision this replacement was derived from; the caller re-renders
    /// from the winning document. On success the stored revision is bumped;
    /// the bumped document is returned.
    pub fn replace(&self, doc: &ConfigDocument) -> Result<ConfigDocument, ReplyBotError> {
        let current = self.load()?;
        if current.revision != doc.revision {
            return Err(ReplyBotError::StaleRevision {
                expected: doc.revision,
                found: current.revision,
            });
        }

        let mut stored = doc.clone();
        stored.revision = current.revision + 1;
        self.write(&stored)?;
        Ok(stored)
    }

    // Whole-file atomic replace: write a sibling temp file, rename over.
    fn write(&self, doc: &ConfigDocument) -> Result<(), ReplyBotError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{self, ReconcileBatch};

    fn temp_store(tag: &str) -> ConfigStore {
        let dir = std::env::temp_dir().join(format!("__replybot_store_{tag}__"));
        let _ = std::fs::remove_dir_all(&dir);
        ConfigStore::new(dir.join("reply_config.json"))
    }

    fn cleanup(store: &ConfigStore) {
        if let Some(dir) = store.path().parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_first_run_seeds_defaults() {
        let store = temp_store("seed");
        assert!(!store.path().exists());

        let doc = store.load().unwrap();
        assert_eq!(doc, ConfigDocument::default());
        assert!(store.path().exists(), "seed must be written on first run");

        cleanup(&store);
    }

    #[test]
    fn test_malformed_file_falls_back_without_overwriting() {
        let store = temp_store("malformed");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc, ConfigDocument::default());
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "{ not json",
            "a broken file must be left for the operator to inspect"
        );

        cleanup(&store);
    }

    #[test]
    fn test_replace_bumps_revision() {
        let store = temp_store("bump");
        let mut doc = store.load().unwrap();
        doc.keywords.push("support".to_string());

        let stored = store.replace(&doc).unwrap();
        assert_eq!(stored.revision, 1);

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.revision, 1);
        assert!(reloaded.keywords.contains(&"support".to_string()));

        cleanup(&store);
    }

    #[test]
    fn test_replace_rejects_stale_revision() {
        let store = temp_store("stale");
        let first = store.load().unwrap();
        let second = first.clone();

        store.replace(&first).unwrap();

        // A second writer still holding revision 0 loses.
        let err = store.replace(&second).unwrap_err();
        assert!(matches!(
            err,
            ReplyBotError::StaleRevision {
                expected: 0,
                found: 1
            }
        ));

        cleanup(&store);
    }

    #[test]
    fn test_noop_reconcile_round_trips_content() {
        let store = temp_store("roundtrip");
        let before = store.load().unwrap();

        let next = reconcile::reconcile(&before, &ReconcileBatch::default());
        store.replace(&next).unwrap();
        let after = store.load().unwrap();

        // Content is untouched; only the persistence counter moved.
        assert!(after.same_content(&before));
        assert_eq!(after.revision, before.revision + 1);

        cleanup(&store);
    }
}
