use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the resolver core.
/// Every module returns `Result<T, ResolverError>`.
#[derive(Debug, Error)]
pub enum ResolverError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("Hash mismatch for {url}: expected {expected}, got {actual}")]
    HashMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Dispatch ────────────────────────────────────────
    #[error("No registered implementation matches Minecraft {minecraft} / loader {loader}")]
    NoMatchingImplementation { minecraft: String, loader: String },

    // ── Descriptor ──────────────────────────────────────
    #[error("Malformed loader descriptor: {0}")]
    MalformedDescriptor(String),

    // ── Version / Maven ─────────────────────────────────
    #[error("Invalid Minecraft version: {0}")]
    InvalidVersion(String),

    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias used throughout the crate.
pub type ResolverResult<T> = Result<T, ResolverError>;

impl From<std::io::Error> for ResolverError {
    fn from(source: std::io::Error) -> Self {
        ResolverError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
