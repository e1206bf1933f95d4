use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::domain::{CaseId, CaseRecord};

/// Storage abstraction so the service can be exercised in isolation.
///
/// Implementations keep at most their configured number of records,
/// most recent first.
pub trait CaseRepository: Send + Sync {
    /// Replaces a record with the same id in place, otherwise inserts it at
    /// the front, then drops anything beyond the retention limit.
    fn save(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<CaseRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case {0} not found")]
    NotFound(CaseId),
    #[error("case history unavailable: {0}")]
    Unavailable(String),
    #[error("unable to persist case history to {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("case history file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn upsert(entries: &mut VecDeque<CaseRecord>, record: CaseRecord, limit: usize) {
    match entries.iter().position(|existing| existing.id == record.id) {
        Some(index) => entries[index] = record,
        None => entries.push_front(record),
    }
    entries.truncate(limit);
}

type Entries<'a> = MutexGuard<'a, VecDeque<CaseRecord>>;

fn lock(entries: &Mutex<VecDeque<CaseRecord>>) -> Result<Entries<'_>, RepositoryError> {
    entries
        .lock()
        .map_err(|_| RepositoryError::Unavailable("case history lock poisoned".to_string()))
}

/// Bounded history held in process memory.
#[derive(Debug)]
pub struct InMemoryCaseHistory {
    limit: usize,
    entries: Mutex<VecDeque<CaseRecord>>,
}

impl InMemoryCaseHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl CaseRepository for InMemoryCaseHistory {
    fn save(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut entries = lock(&self.entries)?;
        upsert(&mut entries, record.clone(), self.limit);
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let entries = lock(&self.entries)?;
        Ok(entries.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        let entries = lock(&self.entries)?;
        Ok(entries.iter().take(limit).cloned().collect())
    }
}

/// Bounded history mirrored to a JSON file, rewritten in full on every save.
#[derive(Debug)]
pub struct JsonFileCaseHistory {
    path: PathBuf,
    limit: usize,
    entries: Mutex<VecDeque<CaseRecord>>,
}

impl JsonFileCaseHistory {
    /// Loads existing history from `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>, limit: usize) -> Result<Self, RepositoryError> {
        let path = path.into();
        let limit = limit.max(1);
        let mut entries: VecDeque<CaseRecord> = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => VecDeque::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => VecDeque::new(),
            Err(source) => {
                return Err(RepositoryError::Persistence {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        entries.truncate(limit);
        debug!(path = %path.display(), cases = entries.len(), "opened case history");

        Ok(Self {
            path,
            limit,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &VecDeque<CaseRecord>) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec_pretty(entries)?;
        let persistence = |source| RepositoryError::Persistence {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persistence)?;
        }
        fs::write(&self.path, payload).map_err(persistence)
    }
}

impl CaseRepository for JsonFileCaseHistory {
    fn save(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut entries = lock(&self.entries)?;
        let mut updated = entries.clone();
        upsert(&mut updated, record.clone(), self.limit);
        self.persist(&updated)?;
        *entries = updated;
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let entries = lock(&self.entries)?;
        Ok(entries.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        let entries = lock(&self.entries)?;
        Ok(entries.iter().take(limit).cloned().collect())
    }
}
