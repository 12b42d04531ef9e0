//! File archives used as blob content.
//!
//! An archive is a directory uploaded as a single blob by the provider. At
//! declaration time only its content hash enters the graph, so an unchanged
//! directory yields an unchanged declaration across runs.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AzureError, AzureResult};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(hash, |acc, b| {
        (acc ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// A directory of application files packaged as blob content.
#[derive(Debug, Clone)]
pub struct FileArchive {
    path: PathBuf,
}

impl FileArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deterministic hash over relative paths and file contents, in path
    /// order. Fails if the directory is missing.
    pub fn content_hash(&self) -> AzureResult<String> {
        if !self.path.exists() {
            return Err(AzureError::ArchiveNotFound(self.path.clone()));
        }
        if !self.path.is_dir() {
            return Err(AzureError::ArchiveNotDirectory(self.path.clone()));
        }

        let mut hash = FNV_OFFSET;
        for entry in WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let rel = entry
                .path()
                .strip_prefix(&self.path)
                .unwrap_or_else(|_| entry.path());
            hash = fnv1a(hash, rel.to_string_lossy().as_bytes());
            let contents = fs::read(entry.path())?;
            hash = fnv1a(hash, &contents);
        }
        Ok(format!("{hash:016x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        write!(f, "{contents}").unwrap();
    }

    #[test]
    fn hash_is_stable_for_unchanged_content() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.html", "<html></html>");

        let archive = FileArchive::new(dir.path());
        assert_eq!(archive.content_hash().unwrap(), archive.content_hash().unwrap());
    }

    #[test]
    fn hash_changes_when_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.html", "v1");
        let archive = FileArchive::new(dir.path());
        let before = archive.content_hash().unwrap();

        write_file(dir.path(), "index.html", "v2");
        assert_ne!(before, archive.content_hash().unwrap());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let archive = FileArchive::new("no-such-wwwroot");
        assert!(matches!(
            archive.content_hash(),
            Err(AzureError::ArchiveNotFound(_))
        ));
    }
}
