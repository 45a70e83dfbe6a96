//! Draft persistence for in-progress answers
//!
//! The draft is an opaque JSON object stored under one fixed key. It is
//! written after every accepted step and removed after a successful
//! submission.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::schema::SubmittedData;

/// Storage key of the draft.
pub const DRAFT_KEY: &str = "formData";

/// Draft entry holding typed custom-input text, keyed by field prop.
pub const CUSTOM_TEXT_KEY: &str = "$customText";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Draft is not a JSON object: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type DraftResult<T> = Result<T, DraftError>;

/// Where a wizard keeps its draft between runs.
pub trait DraftStore: Send + Sync {
    fn load(&self) -> DraftResult<Option<SubmittedData>>;
    fn save(&self, draft: &SubmittedData) -> DraftResult<()>;
    fn clear(&self) -> DraftResult<()>;
}

/// Draft kept as `<dir>/formData.json`.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", DRAFT_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> DraftError {
        DraftError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> DraftResult<Option<SubmittedData>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, draft: &SubmittedData) -> DraftResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string(draft)?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> DraftResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory draft, for tests and embedded use.
#[derive(Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<SubmittedData>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: SubmittedData) -> Self {
        Self {
            draft: Mutex::new(Some(draft)),
        }
    }

    pub fn snapshot(&self) -> Option<SubmittedData> {
        self.slot().clone()
    }

    /// The slot only ever holds a whole value, so a poisoned lock is taken over.
    fn slot(&self) -> MutexGuard<'_, Option<SubmittedData>> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> DraftResult<Option<SubmittedData>> {
        Ok(self.snapshot())
    }

    fn save(&self, draft: &SubmittedData) -> DraftResult<()> {
        *self.slot() = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> DraftResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
