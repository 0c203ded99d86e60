//! Capability-scoped filesystem storage for resumes.

use crate::application::{
    domain::ResumeRef,
    ports::{ResumeStore, ResumeStoreError, ResumeStoreResult, ResumeUpload},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use sha2::{Digest, Sha256};
use std::sync::Arc;

const MAX_EXTENSION_LEN: usize = 8;

/// Stores resumes under a single directory using content-addressed names.
///
/// Identical uploads share one file. All writes go through a directory
/// capability, so names can never escape the root.
#[derive(Debug, Clone)]
pub struct FilesystemResumeStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
    max_bytes: usize,
}

impl FilesystemResumeStore {
    /// Opens (creating if needed) the resume directory.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeStoreError::Storage`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path, max_bytes: usize) -> ResumeStoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(ResumeStoreError::storage)?;
        let dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(ResumeStoreError::storage)?;
        Ok(Self {
            root: root.to_owned(),
            dir: Arc::new(dir),
            max_bytes,
        })
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn content_name(upload: &ResumeUpload) -> String {
    let digest = Sha256::digest(&upload.bytes);
    let stem = format!("{digest:x}");
    let extension = Utf8Path::new(&upload.file_name)
        .extension()
        .map(str::to_ascii_lowercase)
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

pub(crate) fn check_size(upload: &ResumeUpload, limit: usize) -> ResumeStoreResult<()> {
    let size = upload.bytes.len();
    if size == 0 {
        return Err(ResumeStoreError::Empty);
    }
    if size > limit {
        return Err(ResumeStoreError::TooLarge { size, limit });
    }
    Ok(())
}

#[async_trait]
impl ResumeStore for FilesystemResumeStore {
    async fn save(&self, upload: ResumeUpload) -> ResumeStoreResult<ResumeRef> {
        check_size(&upload, self.max_bytes)?;
        let name = content_name(&upload);
        let location = self.root.join(&name);

        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || dir.write(&name, &upload.bytes))
            .await
            .map_err(ResumeStoreError::storage)?
            .map_err(ResumeStoreError::storage)?;

        ResumeRef::new(location.into_string()).map_err(ResumeStoreError::storage)
    }
}
