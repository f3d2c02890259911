//! Source files of one submission revision.

use crate::PrimitiveError;
use std::borrow::Cow;

/// One source file of a submission revision.
///
/// `filename` is the comparison key and is not guaranteed unique within a
/// revision. `rank` orders files within their revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedFile {
    filename: Box<str>,
    content: Box<[u8]>,
    rank: u32,
}

impl NamedFile {
    /// Build a file, rejecting an empty filename.
    pub fn new(
        filename: impl Into<Box<str>>,
        content: impl Into<Box<[u8]>>,
        rank: u32,
    ) -> Result<Self, PrimitiveError> {
        let filename = filename.into();
        if filename.is_empty() {
            return Err(PrimitiveError::EmptyFilename { rank });
        }
        Ok(Self {
            filename,
            content: content.into(),
            rank,
        })
    }

    /// Filename used as the comparison key.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw file content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn content_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Ordering key within the revision.
    #[must_use]
    pub const fn rank(&self) -> u32 {
        self.rank
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true when the file has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Sort files into rank order. The sort is stable, so equal ranks keep their
/// input order.
#[must_use]
pub fn order_by_rank(mut files: Vec<NamedFile>) -> Vec<NamedFile> {
    files.sort_by_key(NamedFile::rank);
    files
}

/// Returns the first rank that appears more than once, if any.
#[must_use]
pub fn find_duplicate_rank(files: &[NamedFile]) -> Option<u32> {
    let mut seen = std::collections::BTreeSet::new();
    files
        .iter()
        .map(NamedFile::rank)
        .find(|rank| !seen.insert(*rank))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filename_is_rejected() {
        let error = NamedFile::new("", b"x".to_vec(), 4).err();
        assert_eq!(error, Some(PrimitiveError::EmptyFilename { rank: 4 }));
    }

    #[test]
    fn order_by_rank_is_stable() -> Result<(), PrimitiveError> {
        let files = vec![
            NamedFile::new("b.c", b"".to_vec(), 2)?,
            NamedFile::new("a.c", b"".to_vec(), 0)?,
            NamedFile::new("c.c", b"".to_vec(), 2)?,
        ];
        let ordered = order_by_rank(files);
        let names: Vec<&str> = ordered.iter().map(NamedFile::filename).collect();
        assert_eq!(names, ["a.c", "b.c", "c.c"]);
        assert_eq!(find_duplicate_rank(&ordered), Some(2));
        Ok(())
    }

    #[test]
    fn lossy_content_replaces_invalid_utf8() -> Result<(), PrimitiveError> {
        let file = NamedFile::new("bin", vec![b'o', b'k', 0xff], 0)?;
        assert_eq!(file.content_lossy(), "ok\u{fffd}");
        assert_eq!(file.len(), 3);
        assert!(!file.is_empty());
        Ok(())
    }
}
