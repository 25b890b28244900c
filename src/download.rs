// ─── Fetch / Verify ───
// Content-addressable artifact acquisition. A destination path either does
// not exist or holds bytes matching the declared hash; each fetch streams
// into its own uniquely named `.part` temp file in the destination
// directory and is renamed only after verification, so concurrent fetches
// of the same artifact never touch each other's partial bytes.

use std::path::Path;

use futures::StreamExt;
use md5::Md5;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{ResolverError, ResolverResult};
use crate::http::build_http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Md5,
}

enum Hasher {
    Sha1(Sha1),
    Md5(Md5),
}

impl Hasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha1 => Hasher::Sha1(Sha1::new()),
            HashAlgorithm::Md5 => Hasher::Md5(Md5::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Hasher::Sha1(h) => h.update(bytes),
            Hasher::Md5(h) => h.update(bytes),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Md5(h) => hex::encode(h.finalize()),
        }
    }
}

/// Compute the hex digest of a local file. No network dependency; used for
/// the cache-hit fast path before any fetch is attempted.
pub async fn file_hash(path: &Path, algorithm: HashAlgorithm) -> ResolverResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ResolverError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut hasher = Hasher::new(algorithm);
    hasher.update(&bytes);
    Ok(hasher.finalize_hex())
}

/// Whether `path` already holds verified content. Absent or mismatching
/// files both report false; hashes compare case-insensitively.
pub async fn is_verified(path: &Path, expected: &str, algorithm: HashAlgorithm) -> bool {
    if !path.exists() {
        return false;
    }
    match file_hash(path, algorithm).await {
        Ok(actual) => actual.eq_ignore_ascii_case(expected),
        Err(_) => false,
    }
}

/// Streaming, hash-verified downloader.
#[derive(Debug)]
pub struct Downloader {
    client: Client,
    /// Bound on parallel fetches a caller should run against one remote.
    concurrency: usize,
}

impl Downloader {
    pub fn new() -> ResolverResult<Self> {
        Ok(Self {
            client: build_http_client()?,
            concurrency: 8,
        })
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Download `url` to `dest` without an expected hash. Used for primary
    /// artifacts whose integrity is established by their contents.
    pub async fn fetch(&self, url: &str, dest: &Path) -> ResolverResult<()> {
        self.fetch_inner(url, dest, None, HashAlgorithm::Sha1)
            .await
            .map(|_| ())
    }

    /// Download `url` to `dest` and fail unless the body hashes to
    /// `expected`. On mismatch both the partial file and any pre-existing
    /// `dest` are deleted before the error propagates, so a subsequent
    /// attempt starts clean. No retry is performed here.
    pub async fn fetch_verified(
        &self,
        url: &str,
        dest: &Path,
        expected: &str,
        algorithm: HashAlgorithm,
    ) -> ResolverResult<()> {
        self.fetch_inner(url, dest, Some(expected), algorithm)
            .await
            .map(|_| ())
    }

    async fn fetch_inner(
        &self,
        url: &str,
        dest: &Path,
        expected: Option<&str>,
        algorithm: HashAlgorithm,
    ) -> ResolverResult<String> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ResolverError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Stream into a per-fetch temp file while hashing, so a reader never
        // observes a half-written file at the final path and a cancelled or
        // failed fetch leaves nothing hash-trusted behind (the temp removes
        // itself on drop).
        let temp = stage_temp(dest)?;
        let mut hasher = Hasher::new(algorithm);

        {
            let mut file =
                tokio::fs::File::create(&temp)
                    .await
                    .map_err(|e| ResolverError::Io {
                        path: temp.to_path_buf(),
                        source: e,
                    })?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk).await.map_err(|e| ResolverError::Io {
                    path: temp.to_path_buf(),
                    source: e,
                })?;
            }
            file.flush().await.map_err(|e| ResolverError::Io {
                path: temp.to_path_buf(),
                source: e,
            })?;
            // handle dropped here, before the rename
        }

        let actual = hasher.finalize_hex();
        commit_download(temp, dest, url, expected, &actual).await?;

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(actual)
    }
}

/// Open a uniquely named `.part` temp file next to `dest`. Every fetch gets
/// its own staging file, so two downloads racing toward the same destination
/// cannot corrupt or steal each other's partial bytes.
fn stage_temp(dest: &Path) -> ResolverResult<TempPath> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| ResolverError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    Ok(temp.into_temp_path())
}

/// Promote a fully written temp file to its final path, or tear down on
/// hash mismatch. Split out from the network path so the delete-on-mismatch
/// invariant is testable on local files. Consumes the temp: on mismatch it
/// is dropped and removes itself.
pub(crate) async fn commit_download(
    temp: TempPath,
    dest: &Path,
    url: &str,
    expected: Option<&str>,
    actual: &str,
) -> ResolverResult<()> {
    if let Some(expected) = expected {
        if !actual.eq_ignore_ascii_case(expected) {
            if dest.exists() {
                let _ = tokio::fs::remove_file(dest).await;
            }
            return Err(ResolverError::HashMismatch {
                url: url.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    temp.persist(dest).map_err(|e| ResolverError::Io {
        path: dest.to_path_buf(),
        source: e.error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-1 / MD5 of the ASCII string "abc".
    const ABC_SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
    const ABC_MD5: &str = "900150983cd24fb0d6963f7d28e17f72";

    #[tokio::test]
    async fn file_hash_known_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.bin");
        tokio::fs::write(&path, b"abc").await.unwrap();

        assert_eq!(file_hash(&path, HashAlgorithm::Sha1).await.unwrap(), ABC_SHA1);
        assert_eq!(file_hash(&path, HashAlgorithm::Md5).await.unwrap(), ABC_MD5);
    }

    #[tokio::test]
    async fn is_verified_ignores_hex_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.bin");
        tokio::fs::write(&path, b"abc").await.unwrap();

        assert!(is_verified(&path, &ABC_SHA1.to_uppercase(), HashAlgorithm::Sha1).await);
        assert!(!is_verified(&path, "deadbeef", HashAlgorithm::Sha1).await);
    }

    #[tokio::test]
    async fn is_verified_false_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_verified(&dir.path().join("nope.jar"), ABC_SHA1, HashAlgorithm::Sha1).await);
    }

    async fn stage_with(dest: &Path, bytes: &[u8]) -> TempPath {
        let temp = stage_temp(dest).unwrap();
        tokio::fs::write(&temp, bytes).await.unwrap();
        temp
    }

    #[tokio::test]
    async fn commit_renames_on_match() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");
        let temp = stage_with(&dest, b"abc").await;
        let staged_at = temp.to_path_buf();

        commit_download(temp, &dest, "http://x/lib.jar", Some(ABC_SHA1), ABC_SHA1)
            .await
            .unwrap();

        assert!(dest.exists());
        assert!(!staged_at.exists());
    }

    #[tokio::test]
    async fn mismatch_deletes_partial_and_stale_dest() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");
        tokio::fs::write(&dest, b"stale").await.unwrap();
        let temp = stage_with(&dest, b"tampered").await;
        let staged_at = temp.to_path_buf();

        let err = commit_download(temp, &dest, "http://x/lib.jar", Some(ABC_SHA1), "beef")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolverError::HashMismatch { .. }));
        assert!(!dest.exists());
        assert!(!staged_at.exists());
    }

    #[tokio::test]
    async fn commit_without_expected_hash_always_promotes() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("primary.jar");
        let temp = stage_with(&dest, b"whatever").await;

        commit_download(temp, &dest, "http://x/p.jar", None, "ignored")
            .await
            .unwrap();
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn racing_fetches_stage_distinct_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");

        // Two in-flight downloads of the same artifact must never share a
        // staging file; each commits its own fully verified copy.
        let first = stage_with(&dest, b"abc").await;
        let second = stage_with(&dest, b"abc").await;
        assert_ne!(first.to_path_buf(), second.to_path_buf());

        commit_download(first, &dest, "http://x/lib.jar", Some(ABC_SHA1), ABC_SHA1)
            .await
            .unwrap();
        commit_download(second, &dest, "http://x/lib.jar", Some(ABC_SHA1), ABC_SHA1)
            .await
            .unwrap();

        assert_eq!(
            file_hash(&dest, HashAlgorithm::Sha1).await.unwrap(),
            ABC_SHA1
        );
    }
}
