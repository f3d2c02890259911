//! Size limits applied when reading submission sources from disk.

use submission_diff_config::StoreConfig;
use submission_diff_shared::{ErrorCode, ErrorEnvelope, Result};

/// Upper bounds for one revision read from a store or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Largest number of files accepted for one revision.
    pub max_files: u32,
    /// Largest accepted file, in bytes.
    pub max_file_size_bytes: u64,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl StoreLimits {
    /// Limits taken from the store section of the configuration.
    #[must_use]
    pub const fn from_config(config: &StoreConfig) -> Self {
        Self {
            max_files: config.max_files,
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }

    pub(crate) fn check_file_count(self, count: usize) -> Result<()> {
        if u64::try_from(count).unwrap_or(u64::MAX) > u64::from(self.max_files) {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("store", "too_many_files"),
                format!("revision has {count} files, limit is {}", self.max_files),
            )
            .with_metadata("maxFiles", self.max_files.to_string()));
        }
        Ok(())
    }

    pub(crate) fn check_file_size(self, filename: &str, size_bytes: u64) -> Result<()> {
        if size_bytes > self.max_file_size_bytes {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("store", "file_too_large"),
                format!(
                    "file exceeds max size ({size_bytes} > {} bytes)",
                    self.max_file_size_bytes
                ),
            )
            .with_metadata("filename", filename)
            .with_metadata("maxFileSizeBytes", self.max_file_size_bytes.to_string()));
        }
        Ok(())
    }
}
