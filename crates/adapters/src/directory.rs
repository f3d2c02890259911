//! Plain directories read as one submission revision.

use crate::limits::StoreLimits;
use crate::local_store::io_error;
use std::path::Path;
use submission_diff_domain::NamedFile;
use submission_diff_shared::{ErrorCode, ErrorEnvelope, RequestContext, Result};

/// Read every regular file directly inside `dir` as one revision.
///
/// Subdirectories and other entries are skipped. Files are ranked by their
/// position in byte-wise filename order, so the same directory always yields
/// the same ranks.
pub async fn load_directory_manifest(
    ctx: &RequestContext,
    dir: &Path,
    limits: StoreLimits,
) -> Result<Vec<NamedFile>> {
    ctx.ensure_not_cancelled("directory_manifest.read_dir")?;
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|error| io_error(dir, error))?;

    let mut names = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|error| io_error(dir, error))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|error| io_error(&entry.path(), error))?;
        if !file_type.is_file() {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        let name = entry.file_name().into_string().map_err(|raw| {
            ErrorEnvelope::expected(
                ErrorCode::new("store", "invalid_filename"),
                "filename is not valid UTF-8",
            )
            .with_metadata("filename", raw.to_string_lossy())
        })?;
        names.push(name.into_boxed_str());
    }
    names.sort_unstable();
    limits.check_file_count(names.len())?;

    let mut files = Vec::with_capacity(names.len());
    for (rank, name) in names.into_iter().enumerate() {
        ctx.ensure_not_cancelled("directory_manifest.read_file")?;
        let path = dir.join(&*name);
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|error| io_error(&path, error))?;
        limits.check_file_size(&name, metadata.len())?;
        let content = tokio::fs::read(&path)
            .await
            .map_err(|error| io_error(&path, error))?;
        let rank = u32::try_from(rank).map_err(|_| {
            ErrorEnvelope::invariant(ErrorCode::internal(), "rank does not fit in u32")
        })?;
        files.push(NamedFile::new(name, content, rank)?);
    }
    Ok(files)
}
