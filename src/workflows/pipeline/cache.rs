use crate::workflows::scoring::{
    AttributeScoreSet, OccupationCode, RankingResult, ScoreResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Unit of idempotent resume: everything the pipeline derived for one
/// occupation. Once `completed` is set the scoring payload is never
/// rewritten; only the `ranking` slot is refreshed by the finalization pass,
/// which is deterministic over the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub attributes: AttributeScoreSet,
    pub score: ScoreResult,
    pub key_drivers: String,
    pub batch_index: usize,
    pub completed: bool,
    #[serde(default)]
    pub ranking: Option<RankingResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable record of completed work, keyed by occupation code and stored as
/// human-inspectable JSON.
///
/// Every insert is flushed to stable storage (temp file, sync, atomic
/// rename) before it is acknowledged, so a crash mid-write reads back as
/// "not yet computed" rather than a torn entry. Single-process use only;
/// concurrent writers against the same file are undefined.
pub struct CacheStore {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn get(&self, code: &OccupationCode) -> Option<&CacheEntry> {
        self.entries.get(&code.0)
    }

    pub fn is_completed(&self, code: &OccupationCode) -> bool {
        self.get(code).is_some_and(|entry| entry.completed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores one occupation's entry and flushes the store to disk before
    /// returning.
    pub fn insert(&mut self, code: &OccupationCode, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(code.0.clone(), entry);
        self.persist()
    }

    /// Writes finalized rankings back into their entries in one flush. The
    /// scoring payloads are left untouched.
    pub fn store_rankings(
        &mut self,
        rankings: &[(OccupationCode, RankingResult)],
    ) -> Result<(), CacheError> {
        let mut changed = false;
        for (code, ranking) in rankings {
            if let Some(entry) = self.entries.get_mut(&code.0) {
                if entry.ranking != Some(*ranking) {
                    entry.ranking = Some(*ranking);
                    changed = true;
                }
            }
        }

        if changed {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scoring::compute_score;

    fn sample_entry(batch_index: usize) -> CacheEntry {
        let attributes =
            AttributeScoreSet::from_scores([4, 3, 4, 4, 3, 2, 3, 3, 4, 3]).expect("in range");
        CacheEntry {
            attributes,
            score: compute_score(&attributes),
            key_drivers: "Hands-on, high-trust work.".to_string(),
            batch_index,
            completed: true,
            ranking: None,
        }
    }

    #[test]
    fn entries_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let code = OccupationCode("29-1141.00".to_string());

        let mut store = CacheStore::open(&path).expect("open");
        assert!(store.is_empty());
        store.insert(&code, sample_entry(0)).expect("insert");

        let reopened = CacheStore::open(&path).expect("reopen");
        assert_eq!(reopened.len(), 1);
        assert!(reopened.is_completed(&code));
        assert_eq!(reopened.get(&code), store.get(&code));
    }

    #[test]
    fn persist_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let mut store = CacheStore::open(&path).expect("open");
        store
            .insert(&OccupationCode("15-1252.00".to_string()), sample_entry(2))
            .expect("insert");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn store_rankings_updates_only_the_ranking_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let code = OccupationCode("29-1141.00".to_string());

        let mut store = CacheStore::open(&path).expect("open");
        let entry = sample_entry(1);
        store.insert(&code, entry.clone()).expect("insert");

        let ranking = RankingResult {
            final_ranking: 0.812,
        };
        store
            .store_rankings(&[(code.clone(), ranking)])
            .expect("rankings");

        let reopened = CacheStore::open(&path).expect("reopen");
        let stored = reopened.get(&code).expect("entry");
        assert_eq!(stored.ranking, Some(ranking));
        assert_eq!(stored.score, entry.score);
        assert_eq!(stored.attributes, entry.attributes);
    }

    #[test]
    fn missing_file_opens_as_an_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CacheStore::open(dir.path().join("nested/cache.json")).expect("open");
        assert!(store.is_empty());
    }
}
