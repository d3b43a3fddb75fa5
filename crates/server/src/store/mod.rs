//! JSON document store.
//!
//! The whole database is one [`Document`] held in memory behind a
//! `tokio::sync::RwLock` and mirrored to a single JSON file. Every write is
//! one critical section: the closure mutates the document, the result is
//! persisted (temp file, then atomic rename), and the in-memory copy is
//! rolled back if either step fails. Concurrent writers queue on the lock,
//! so no update is lost.

mod seed;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use honor_culture_core::Document;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

pub use seed::seed_document;

/// Errors from reading or persisting the document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid document.
    #[error("Malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the in-memory document failed.
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Building the seed document failed.
    #[error("Failed to build seed document: {0}")]
    Seed(String),
}

/// Handle to the persisted document.
///
/// Opened once at start-up and shared through `AppState`.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    doc: RwLock<Document>,
    healthy: AtomicBool,
}

impl DocumentStore {
    /// Open the document at `path`, seeding it if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed, or if the
    /// seed document cannot be written.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => load_document(&path, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Data file not found, writing seed document");
                let doc = seed_document()?;
                persist(&path, &doc).await?;
                doc
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::info!(
            products = doc.products.len(),
            categories = doc.categories.len(),
            orders = doc.orders.len(),
            audit_entries = doc.audit_log.len(),
            "Document store opened"
        );

        Ok(Self::from_document(path, doc))
    }

    /// Wrap an already-loaded document without touching the filesystem.
    ///
    /// The first write will create `path`.
    #[must_use]
    pub fn from_document(path: impl Into<PathBuf>, doc: Document) -> Self {
        Self {
            path: path.into(),
            doc: RwLock::new(doc),
            healthy: AtomicBool::new(true),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the most recent persist succeeded.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    /// Run `f` against a shared view of the document.
    pub async fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let doc = self.doc.read().await;
        f(&doc)
    }

    /// Run `f` against the document and persist the result.
    ///
    /// If `f` returns an error, persisting fails, or the returned future is
    /// dropped before persisting finishes, the in-memory document is
    /// restored to its state before the call.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `StoreError` converted into `E`.
    pub async fn write<T, E>(&self, f: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut doc = self.doc.write().await;
        let snapshot = doc.clone();
        let mut guard = Rollback {
            doc: &mut *doc,
            snapshot: Some(snapshot),
        };

        let value = f(&mut *guard.doc)?;

        if let Err(e) = persist(&self.path, &*guard.doc).await {
            tracing::error!(error = %e, "Persist failed, rolling back in-memory document");
            self.healthy.store(false, Ordering::Relaxed);
            return Err(e.into());
        }

        guard.commit();
        self.healthy.store(true, Ordering::Relaxed);
        Ok(value)
    }

    /// Write the current document to disk.
    ///
    /// Called at graceful shutdown.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn flush(&self) -> Result<(), StoreError> {
        let doc = self.doc.read().await;
        let result = persist(&self.path, &doc).await;
        self.healthy.store(result.is_ok(), Ordering::Relaxed);
        result
    }
}

/// Parse a document from raw file contents.
///
/// # Errors
///
/// Returns `StoreError::Malformed` if the bytes are not a valid document.
pub fn load_document(path: &Path, bytes: &[u8]) -> Result<Document, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `doc` to a sibling temp file and rename it over `path`.
///
/// # Errors
///
/// Returns `StoreError` if serialization or any filesystem step fails.
pub async fn persist(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Restores the snapshot on drop unless committed.
struct Rollback<'a> {
    doc: &'a mut Document,
    snapshot: Option<Document>,
}

impl Rollback<'_> {
    fn commit(mut self) {
        self.snapshot = None;
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.doc = snapshot;
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Mint an id of the form `<prefix><unix millis>`.
///
/// Bumps the millisecond value until `taken` reports the id as free. Call
/// inside a write critical section so the check and the insert are atomic.
pub fn unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let candidate = format!("{prefix}{millis}");
        if !taken(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}
