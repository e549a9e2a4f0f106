#![forbid(unsafe_code)]

//! Pluggable storage for the offline response queue.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; operations
//!    return `Result` and callers decide how to degrade.
//! 2. **Atomic writes**: file storage writes to a temp file and renames,
//!    so a crash mid-save never corrupts the previous queue.
//! 3. **Replace semantics**: `save_all` replaces the stored queue wholesale
//!    rather than merging.
//! 4. Backends are `Send + Sync` behind the trait boundary.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::api::{FormId, ResponseSubmission};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from queue storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure during file operations.
    Io(std::io::Error),
    /// Encode/decode failure.
    Serialization(String),
    /// The stored file exists but is not a queue file we understand.
    Corruption(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Queued submissions keyed by form id.
pub type QueueMap = HashMap<FormId, Vec<ResponseSubmission>>;

// ---------------------------------------------------------------------------
// QueueStorage trait
// ---------------------------------------------------------------------------

/// Trait for pluggable queue storage backends.
pub trait QueueStorage: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load every queued submission. Empty map on first run.
    fn load_all(&self) -> StorageResult<QueueMap>;

    /// Save the whole queue atomically, replacing any previous content.
    fn save_all(&self, queues: &QueueMap) -> StorageResult<()>;

    /// Drop all stored submissions.
    fn clear(&self) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    queues: Mutex<QueueMap>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load_all(&self) -> StorageResult<QueueMap> {
        Ok(self
            .queues
            .lock()
            .map_err(|_| StorageError::Corruption("poisoned lock".into()))?
            .clone())
    }

    fn save_all(&self, queues: &QueueMap) -> StorageResult<()> {
        *self
            .queues
            .lock()
            .map_err(|_| StorageError::Corruption("poisoned lock".into()))? = queues.clone();
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.queues
            .lock()
            .map_err(|_| StorageError::Corruption("poisoned lock".into()))?
            .clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// On-disk queue file format.
#[derive(Debug, Serialize, Deserialize)]
struct QueueFile {
    format_version: u32,
    queues: QueueMap,
}

impl QueueFile {
    const FORMAT_VERSION: u32 = 1;
}

/// JSON-file backend with atomic write-then-rename saves.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file storage at the given path.
    ///
    /// The file does not need to exist; it is created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

impl QueueStorage for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn load_all(&self) -> StorageResult<QueueMap> {
        if !self.path.exists() {
            // First run, nothing queued yet.
            return Ok(QueueMap::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let queue_file: QueueFile = serde_json::from_reader(reader)
            .map_err(|e| StorageError::Corruption(format!("failed to parse queue file: {e}")))?;

        if queue_file.format_version != QueueFile::FORMAT_VERSION {
            tracing::warn!(
                stored = queue_file.format_version,
                expected = QueueFile::FORMAT_VERSION,
                "queue file format version mismatch, ignoring stored queue"
            );
            return Ok(QueueMap::new());
        }

        Ok(queue_file.queues)
    }

    fn save_all(&self, queues: &QueueMap) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let queue_file = QueueFile {
            format_version: QueueFile::FORMAT_VERSION,
            queues: queues.clone(),
        };

        // Write to temp file first, then rename over the old file.
        let tmp_path = self.temp_path();
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &queue_file)
                .map_err(|e| StorageError::Serialization(format!("failed to serialize: {e}")))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "queue saved");
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
