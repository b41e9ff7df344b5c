use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use vocab_core::model::{DictionaryId, ReviewRecord, WordId, WordSetId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Which part of the collection to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewScope {
    All,
    Dictionary(DictionaryId),
    WordSet(WordSetId),
}

/// Capability interface the engine's callers use to fetch and persist records.
///
/// Any backend (SQL, in-memory, remote) can implement it; the engine itself
/// never sees this trait.
#[async_trait]
pub trait ReviewRecordRepository: Send + Sync {
    /// Load every record in `scope`, ordered by word id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the scope names a missing dictionary
    /// or word set, or other storage errors.
    async fn load(&self, scope: ReviewScope) -> Result<Vec<ReviewRecord>, StorageError>;

    /// Fetch a single record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing word is `Ok(None)`.
    async fn get(&self, id: WordId) -> Result<Option<ReviewRecord>, StorageError>;

    /// Persist an updated record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word is not in the collection.
    async fn save(&self, record: &ReviewRecord) -> Result<(), StorageError>;
}

#[derive(Default)]
struct Collection {
    records: BTreeMap<WordId, ReviewRecord>,
    dictionaries: BTreeMap<DictionaryId, BTreeSet<WordId>>,
    word_sets: BTreeMap<WordSetId, BTreeSet<WordId>>,
}

impl Collection {
    fn collect(&self, ids: &BTreeSet<WordId>) -> Vec<ReviewRecord> {
        ids.iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }
}

/// In-memory repository for tests, prototyping and the web build.
///
/// State sits behind an `Arc<Mutex<..>>`, so clones share the same collection.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<Collection>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Add a word to a dictionary with a fresh, never-reviewed record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the word already exists.
    pub fn insert_word(&self, dictionary: DictionaryId, id: WordId) -> Result<(), StorageError> {
        self.insert_record(dictionary, ReviewRecord::new(id))
    }

    /// Add a word with existing review state, e.g. when seeding from a backup.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the word already exists.
    pub fn insert_record(
        &self,
        dictionary: DictionaryId,
        record: ReviewRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.records.contains_key(&record.id) {
            return Err(StorageError::Conflict);
        }
        guard
            .dictionaries
            .entry(dictionary)
            .or_default()
            .insert(record.id);
        guard.records.insert(record.id, record);
        Ok(())
    }

    /// Put an existing word into a word set. Adding twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    pub fn add_to_set(&self, set: WordSetId, id: WordId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.records.contains_key(&id) {
            return Err(StorageError::NotFound);
        }
        guard.word_sets.entry(set).or_default().insert(id);
        Ok(())
    }

    /// Number of words in the collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.records.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl ReviewRecordRepository for InMemoryRepository {
    async fn load(&self, scope: ReviewScope) -> Result<Vec<ReviewRecord>, StorageError> {
        let guard = self.lock()?;
        let records = match scope {
            ReviewScope::All => guard.records.values().cloned().collect(),
            ReviewScope::Dictionary(id) => {
                let ids = guard.dictionaries.get(&id).ok_or(StorageError::NotFound)?;
                guard.collect(ids)
            }
            ReviewScope::WordSet(id) => {
                let ids = guard.word_sets.get(&id).ok_or(StorageError::NotFound)?;
                guard.collect(ids)
            }
        };
        tracing::debug!(?scope, count = records.len(), "loaded review records");
        Ok(records)
    }

    async fn get(&self, id: WordId) -> Result<Option<ReviewRecord>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.records.get(&id).cloned())
    }

    async fn save(&self, record: &ReviewRecord) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        match guard.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                tracing::debug!(word = %record.id, "saved review record");
                Ok(())
            }
            None => {
                tracing::warn!(word = %record.id, "save for unknown word");
                Err(StorageError::NotFound)
            }
        }
    }
}

/// Holds the repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub records: Arc<dyn ReviewRecordRepository>,
}

impl Storage {
    #[must_use]
    pub fn new(records: Arc<dyn ReviewRecordRepository>) -> Self {
        Self { records }
    }

    /// Storage over a fresh in-memory collection, also returning the concrete
    /// repository so callers can seed it.
    #[must_use]
    pub fn in_memory() -> (Self, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let records: Arc<dyn ReviewRecordRepository> = Arc::new(repo.clone());
        (Self { records }, repo)
    }
}
