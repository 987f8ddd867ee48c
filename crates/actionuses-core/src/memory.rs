//! In-memory content store
//!
//! Mirrors the contents API semantics closely enough to exercise the
//! publisher: version identifiers change on every write, and a write whose
//! `sha` does not match the stored file is rejected as a conflict. Holds a
//! single repository; the coordinates of each write are recorded but not
//! used as part of the key.

use crate::error::{Error, Result};
use crate::traits::ContentStore;
use crate::types::{CommitDescriptor, RemoteFile, RepoCoordinates, WriteReceipt};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A write accepted by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Target repository
    pub repo: RepoCoordinates,
    /// File path
    pub path: String,
    /// Commit message
    pub message: String,
    /// Payload bytes
    pub content: Vec<u8>,
    /// Version identifier submitted with the write
    pub sha: Option<String>,
    /// Committer name
    pub committer: String,
}

/// Content store backed by a hash map
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, RemoteFile>>,
    writes: Mutex<Vec<RecordedWrite>>,
    read_failure: RwLock<Option<String>>,
    write_failures: RwLock<HashSet<String>>,
    reads: AtomicUsize,
    next_version: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a file
    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Seed or replace a file without recording a write; returns its version
    pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) -> String {
        let sha = self.next_sha();
        self.files.write().insert(
            path.to_string(),
            RemoteFile {
                sha: sha.clone(),
                content: content.into(),
            },
        );
        sha
    }

    /// Current state of a file
    pub fn file(&self, path: &str) -> Option<RemoteFile> {
        self.files.read().get(path).cloned()
    }

    /// Every accepted write, in order
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().clone()
    }

    /// Number of accepted writes
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    /// Number of read attempts, failed ones included
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Make every subsequent read fail with an HTTP error
    pub fn fail_reads(&self, message: &str) {
        *self.read_failure.write() = Some(message.to_string());
    }

    /// Make writes to `path` fail with an HTTP error
    pub fn fail_writes_to(&self, path: &str) {
        self.write_failures.write().insert(path.to_string());
    }

    fn next_sha(&self) -> String {
        let n = self.next_version.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:040x}", n)
    }

    fn read(&self, path: &str) -> Result<Option<RemoteFile>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = self.read_failure.read().as_ref() {
            return Err(Error::Http(message.clone()));
        }
        Ok(self.file(path))
    }

    fn write(&self, commit: &CommitDescriptor<'_>) -> Result<WriteReceipt> {
        if self.write_failures.read().contains(commit.path) {
            return Err(Error::Http(format!(
                "GitHub API returned error for {}: 500 Internal Server Error",
                commit.path
            )));
        }

        let mut files = self.files.write();
        let current = files.get(commit.path).map(|f| f.sha.as_str());
        if current != commit.sha {
            return Err(Error::Conflict(format!(
                "{} is at {:?}, write supplied {:?}",
                commit.path, current, commit.sha
            )));
        }

        let sha = self.next_sha();
        files.insert(
            commit.path.to_string(),
            RemoteFile {
                sha: sha.clone(),
                content: commit.content.to_vec(),
            },
        );
        drop(files);

        self.writes.lock().push(RecordedWrite {
            repo: commit.repo.clone(),
            path: commit.path.to_string(),
            message: commit.message.to_string(),
            content: commit.content.to_vec(),
            sha: commit.sha.map(str::to_owned),
            committer: commit.committer.name.to_string(),
        });

        Ok(WriteReceipt { sha })
    }
}

impl ContentStore for MemoryStore {
    fn get_content<'a>(
        &'a self,
        _repo: &'a RepoCoordinates,
        path: &'a str,
    ) -> impl Future<Output = Result<Option<RemoteFile>>> + Send + 'a {
        std::future::ready(self.read(path))
    }

    fn create_or_update_file_contents<'a>(
        &'a self,
        commit: &'a CommitDescriptor<'a>,
    ) -> impl Future<Output = Result<WriteReceipt>> + Send + 'a {
        std::future::ready(self.write(commit))
    }
}
