//! Temporary directories for adapter tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use submission_diff_shared::{ErrorEnvelope, Result};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Unique directory under the system temp dir, removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "subdiff-{prefix}-{}-{nanos}-{seq}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).map_err(ErrorEnvelope::from)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, relative: &str, content: &str) -> Result<()> {
        std::fs::write(self.path.join(relative), content).map_err(ErrorEnvelope::from)
    }

    pub fn mkdir(&self, relative: &str) -> Result<()> {
        std::fs::create_dir_all(self.path.join(relative)).map_err(ErrorEnvelope::from)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
