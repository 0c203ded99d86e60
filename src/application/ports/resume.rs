//! Storage port for uploaded resume files.

use crate::application::domain::ResumeRef;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for resume storage operations.
pub type ResumeStoreResult<T> = Result<T, ResumeStoreError>;

/// An uploaded resume file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Durable storage for resume artifacts.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Stores the upload and returns a reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeStoreError::Empty`] or [`ResumeStoreError::TooLarge`]
    /// for unacceptable uploads and [`ResumeStoreError::Storage`] for I/O
    /// failures.
    async fn save(&self, upload: ResumeUpload) -> ResumeStoreResult<ResumeRef>;
}

/// Errors returned by resume stores.
#[derive(Debug, Clone, Error)]
pub enum ResumeStoreError {
    /// The upload contained no bytes.
    #[error("resume upload is empty")]
    Empty,

    /// The upload exceeds the configured size limit.
    #[error("resume upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Upload size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Storage-layer failure.
    #[error("resume storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResumeStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
