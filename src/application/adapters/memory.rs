//! In-memory resume store for tests.

use super::filesystem::check_size;
use crate::application::{
    domain::ResumeRef,
    ports::{ResumeStore, ResumeStoreError, ResumeStoreResult, ResumeUpload},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const DEFAULT_LIMIT: usize = 5 * 1024 * 1024;

/// Keeps uploaded resumes in memory under `memory://` references.
#[derive(Debug, Clone)]
pub struct InMemoryResumeStore {
    files: Arc<RwLock<HashMap<ResumeRef, Vec<u8>>>>,
    max_bytes: usize,
}

impl Default for InMemoryResumeStore {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl InMemoryResumeStore {
    /// Creates an empty store with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with a custom size limit.
    #[must_use]
    pub fn with_limit(max_bytes: usize) -> Self {
        Self {
            files: Arc::default(),
            max_bytes,
        }
    }

    /// Returns the stored bytes for a reference.
    ///
    /// # Errors
    ///
    /// Returns storage errors when lock acquisition fails.
    pub fn contents(&self, reference: &ResumeRef) -> ResumeStoreResult<Option<Vec<u8>>> {
        let files = self
            .files
            .read()
            .map_err(|err| ResumeStoreError::storage(std::io::Error::other(err.to_string())))?;
        Ok(files.get(reference).cloned())
    }

    /// Returns how many resumes are stored.
    ///
    /// # Errors
    ///
    /// Returns storage errors when lock acquisition fails.
    pub fn stored_count(&self) -> ResumeStoreResult<usize> {
        let files = self
            .files
            .read()
            .map_err(|err| ResumeStoreError::storage(std::io::Error::other(err.to_string())))?;
        Ok(files.len())
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, upload: ResumeUpload) -> ResumeStoreResult<ResumeRef> {
        check_size(&upload, self.max_bytes)?;
        let reference = ResumeRef::new(format!(
            "memory://resumes/{}/{}",
            uuid::Uuid::new_v4().simple(),
            upload.file_name.trim()
        ))
        .map_err(ResumeStoreError::storage)?;
        let mut files = self
            .files
            .write()
            .map_err(|err| ResumeStoreError::storage(std::io::Error::other(err.to_string())))?;
        files.insert(reference.clone(), upload.bytes);
        Ok(reference)
    }
}
