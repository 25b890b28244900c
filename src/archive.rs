// ─── Archive Access ───
// Reading single named entries out of jar/zip containers. The trait keeps
// metadata extraction testable against in-memory fakes.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{ResolverError, ResolverResult};

/// Narrow read-one-entry capability over a package archive.
pub trait ArchiveSource {
    /// Read the named entry in full. `Ok(None)` when the entry is absent.
    fn read_entry(&mut self, name: &str) -> ResolverResult<Option<Vec<u8>>>;
}

/// `ArchiveSource` backed by an in-memory zip.
pub struct ZipSource {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipSource {
    /// Open a jar/zip from disk, reading it fully into memory.
    pub async fn open(path: &Path) -> ResolverResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ResolverError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> ResolverResult<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }
}

impl ArchiveSource for ZipSource {
    fn read_entry(&mut self, name: &str) -> ResolverResult<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(f) => f,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// In-memory fake archive for metadata tests.
    pub struct FakeArchive {
        entries: HashMap<String, Vec<u8>>,
    }

    impl FakeArchive {
        pub fn new() -> Self {
            Self {
                entries: HashMap::new(),
            }
        }

        pub fn with_entry(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
            self.entries.insert(name.to_string(), bytes.into());
            self
        }
    }

    impl ArchiveSource for FakeArchive {
        fn read_entry(&mut self, name: &str) -> ResolverResult<Option<Vec<u8>>> {
            Ok(self.entries.get(name).cloned())
        }
    }
}
