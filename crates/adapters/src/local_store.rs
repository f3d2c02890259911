//! Directory-backed submission store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<submissionId>/submission.json   revision metadata + file list
//! <root>/<submissionId>/files/<rank>      raw content of each file
//! ```

use crate::limits::StoreLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use submission_diff_config::StoreConfig;
use submission_diff_domain::{find_duplicate_rank, order_by_rank};
use submission_diff_ports::{
    BoxFuture, NamedFile, RevisionQuery, SubmissionFileStore, SubmissionId, SubmissionRevision,
    SubmissionRevisionStore,
};
use submission_diff_shared::{ErrorClass, ErrorCode, ErrorEnvelope, RequestContext, Result};

const MANIFEST_FILE_NAME: &str = "submission.json";
const FILES_DIR_NAME: &str = "files";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SubmissionManifest {
    revision: SubmissionRevision,
    #[serde(default)]
    files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ManifestFile {
    filename: Box<str>,
    rank: u32,
}

/// Submission store reading revisions from a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalSubmissionStore {
    root: PathBuf,
    limits: StoreLimits,
}

impl LocalSubmissionStore {
    /// Build a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, limits: StoreLimits) -> Self {
        Self {
            root: root.into(),
            limits,
        }
    }

    /// Build a store from the store section of the configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let Some(root) = config.root.as_deref() else {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "missing_store_root"),
                "store.root must be set to read stored submissions",
            ));
        };
        Ok(Self::new(root, StoreLimits::from_config(config)))
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a revision and its files, replacing any previous manifest.
    pub async fn write_submission(
        &self,
        ctx: &RequestContext,
        revision: &SubmissionRevision,
        files: &[NamedFile],
    ) -> Result<()> {
        ctx.ensure_not_cancelled("local_store.write_submission")?;
        if let Some(rank) = find_duplicate_rank(files) {
            return Err(duplicate_rank(&revision.id, rank));
        }

        let dir = self.submission_dir(&revision.id)?;
        let files_dir = dir.join(FILES_DIR_NAME);
        tokio::fs::create_dir_all(&files_dir)
            .await
            .map_err(|error| io_error(&files_dir, error))?;

        for file in files {
            let path = files_dir.join(file.rank().to_string());
            tokio::fs::write(&path, file.content())
                .await
                .map_err(|error| io_error(&path, error))?;
        }

        let manifest = SubmissionManifest {
            revision: revision.clone(),
            files: files
                .iter()
                .map(|file| ManifestFile {
                    filename: file.filename().into(),
                    rank: file.rank(),
                })
                .collect(),
        };
        let payload = serde_json::to_vec_pretty(&manifest).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("store", "manifest_serialize_failed"),
                format!("failed to serialize manifest: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;
        let path = dir.join(MANIFEST_FILE_NAME);
        tokio::fs::write(&path, payload)
            .await
            .map_err(|error| io_error(&path, error))
    }

    fn submission_dir(&self, submission_id: &SubmissionId) -> Result<PathBuf> {
        if !is_safe_segment(submission_id.as_str()) {
            return Err(ErrorEnvelope::invalid_argument(
                "submission id must be a single path segment of [A-Za-z0-9_.-]",
            )
            .with_metadata("submissionId", submission_id.as_str()));
        }
        Ok(self.root.join(submission_id.as_str()))
    }

    async fn read_manifest(&self, submission_id: &SubmissionId) -> Result<SubmissionManifest> {
        let path = self.submission_dir(submission_id)?.join(MANIFEST_FILE_NAME);
        let payload = match tokio::fs::read(&path).await {
            Ok(payload) => payload,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(ErrorEnvelope::expected(
                    ErrorCode::not_found(),
                    "submission not found",
                )
                .with_metadata("submissionId", submission_id.as_str()));
            },
            Err(error) => return Err(io_error(&path, error)),
        };
        let manifest: SubmissionManifest = serde_json::from_slice(&payload).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("store", "invalid_manifest"),
                format!("failed to parse manifest: {error}"),
            )
            .with_metadata("submissionId", submission_id.as_str())
        })?;

        if manifest.revision.id != *submission_id {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("store", "manifest_id_mismatch"),
                "manifest describes a different submission",
            )
            .with_metadata("submissionId", submission_id.as_str())
            .with_metadata("manifestId", manifest.revision.id.as_str()));
        }
        Ok(manifest)
    }

    async fn read_files(
        &self,
        ctx: &RequestContext,
        submission_id: &SubmissionId,
    ) -> Result<Vec<NamedFile>> {
        let manifest = self.read_manifest(submission_id).await?;
        self.limits.check_file_count(manifest.files.len())?;

        let files_dir = self.submission_dir(submission_id)?.join(FILES_DIR_NAME);
        let mut files = Vec::with_capacity(manifest.files.len());
        for entry in manifest.files {
            ctx.ensure_not_cancelled("local_store.read_file")?;
            let path = files_dir.join(entry.rank.to_string());
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|error| io_error(&path, error))?;
            self.limits.check_file_size(&entry.filename, metadata.len())?;
            let content = tokio::fs::read(&path)
                .await
                .map_err(|error| io_error(&path, error))?;
            files.push(NamedFile::new(entry.filename, content, entry.rank)?);
        }

        if let Some(rank) = find_duplicate_rank(&files) {
            return Err(duplicate_rank(submission_id, rank));
        }
        Ok(order_by_rank(files))
    }

    async fn scan_revisions(
        &self,
        ctx: &RequestContext,
        query: &RevisionQuery,
    ) -> Result<Vec<SubmissionRevision>> {
        let mut read_dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|error| io_error(&self.root, error))?;

        let mut ids = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|error| io_error(&self.root, error))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|error| io_error(&entry.path(), error))?
                .is_dir();
            let name = entry.file_name();
            let Some(name) = name.to_str().filter(|name| is_dir && is_safe_segment(name)) else {
                tracing::debug!(path = %entry.path().display(), "skipping store entry");
                continue;
            };
            if tokio::fs::try_exists(entry.path().join(MANIFEST_FILE_NAME))
                .await
                .map_err(|error| io_error(&entry.path(), error))?
            {
                ids.push(SubmissionId::parse(name)?);
            } else {
                tracing::debug!(path = %entry.path().display(), "skipping directory without manifest");
            }
        }
        ids.sort_unstable();

        let mut revisions = Vec::new();
        for id in ids {
            ctx.ensure_not_cancelled("local_store.revisions_of")?;
            let manifest = self.read_manifest(&id).await?;
            if query.matches(&manifest.revision) {
                revisions.push(manifest.revision);
            }
        }
        Ok(revisions)
    }
}

impl SubmissionFileStore for LocalSubmissionStore {
    fn files_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<Vec<NamedFile>>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("local_store.files_of")?;
            self.read_files(ctx, submission_id).await
        })
    }
}

impl SubmissionRevisionStore for LocalSubmissionStore {
    fn revision<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission_id: &'a SubmissionId,
    ) -> BoxFuture<'a, Result<SubmissionRevision>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("local_store.revision")?;
            Ok(self.read_manifest(submission_id).await?.revision)
        })
    }

    fn revisions_of<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a RevisionQuery,
    ) -> BoxFuture<'a, Result<Vec<SubmissionRevision>>> {
        Box::pin(async move {
            ctx.ensure_not_cancelled("local_store.revisions_of")?;
            self.scan_revisions(ctx, query).await
        })
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-'))
}

fn duplicate_rank(submission_id: &SubmissionId, rank: u32) -> ErrorEnvelope {
    ErrorEnvelope::expected(
        ErrorCode::new("store", "duplicate_rank"),
        "rank appears more than once in one revision",
    )
    .with_metadata("submissionId", submission_id.as_str())
    .with_metadata("rank", rank.to_string())
}

/// Normalize an I/O failure, keeping a missing path an expected error.
pub(crate) fn io_error(path: &Path, error: std::io::Error) -> ErrorEnvelope {
    let path = path.display().to_string();
    if error.kind() == std::io::ErrorKind::NotFound {
        return ErrorEnvelope::expected(ErrorCode::not_found(), "path not found")
            .with_metadata("path", path);
    }
    ErrorEnvelope::from(error).with_metadata("path", path)
}
