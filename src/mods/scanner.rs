// ─── Mod Directory Scanner ───
// Enumerates installed mod archives and emits one module per package.
// Metadata degrades gracefully per archive; only a failed directory
// enumeration aborts the scan.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use super::metadata::{resolve_package_metadata, MetadataHints};
use crate::archive::ZipSource;
use crate::download::{file_hash, HashAlgorithm};
use crate::error::{ResolverError, ResolverResult};
use crate::model::{LoaderFamily, Module, ModuleArtifact, ModuleType};
use crate::resolver::distribution_url;
use crate::version::MinecraftVersion;

/// Parameters for one scan pass.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub minecraft: MinecraftVersion,
    pub loader_version: String,
    /// Base URL the emitted modules point their artifact URLs at.
    pub base_url: String,
    /// External static-analysis results keyed by archive path.
    pub hints: MetadataHints,
}

impl ScanRequest {
    pub fn new(
        minecraft: MinecraftVersion,
        loader_version: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            minecraft,
            loader_version: loader_version.into(),
            base_url: base_url.into(),
            hints: MetadataHints::new(),
        }
    }

    pub fn with_hints(mut self, hints: MetadataHints) -> Self {
        self.hints = hints;
        self
    }
}

/// Scanner for a directory of candidate mod packages, parameterized by the
/// loader family selected through the registry.
#[derive(Debug)]
pub struct ModScanner {
    family: LoaderFamily,
    request: ScanRequest,
}

impl ModScanner {
    pub fn forge(request: ScanRequest) -> Self {
        Self {
            family: LoaderFamily::Forge,
            request,
        }
    }

    pub fn neoforge(request: ScanRequest) -> Self {
        Self {
            family: LoaderFamily::NeoForge,
            request,
        }
    }

    pub fn family(&self) -> LoaderFamily {
        self.family
    }

    /// Scan `directory` and emit one module per readable archive, in
    /// filename order.
    pub async fn scan(&self, directory: &Path) -> ResolverResult<Vec<Module>> {
        let mut entries = tokio::fs::read_dir(directory)
            .await
            .map_err(|e| ResolverError::Io {
                path: directory.to_path_buf(),
                source: e,
            })?;

        let mut archives: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| ResolverError::Io {
            path: directory.to_path_buf(),
            source: e,
        })? {
            let path = entry.path();
            if is_mod_archive(&path) {
                archives.push(path);
            }
        }
        archives.sort();

        let mut modules = Vec::with_capacity(archives.len());
        for path in archives {
            match self.scan_archive(&path).await {
                Ok(module) => modules.push(module),
                Err(e) => error!("Skipping unreadable mod archive {:?}: {}", path, e),
            }
        }

        Ok(modules)
    }

    async fn scan_archive(&self, path: &Path) -> ResolverResult<Module> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut archive = ZipSource::open(path).await?;
        let hint = self.request.hints.get(path);
        let metadata = resolve_package_metadata(&mut archive, &file_name, hint, self.family);

        debug!(
            "{}: {} {} ({} {})",
            file_name,
            metadata.package_id,
            metadata.version,
            metadata.loader_kind,
            metadata.loader_version_requirement
        );

        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| ResolverError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();
        let md5 = file_hash(path, HashAlgorithm::Md5).await?;
        let relative = format!("mods/{}", file_name);

        Ok(Module {
            id: metadata.package_id,
            name: metadata.display_name,
            module_type: ModuleType::ForgeMod,
            artifact: ModuleArtifact {
                size,
                md5,
                url: distribution_url(&self.request.base_url, &relative),
                path: relative,
            },
            sub_modules: Vec::new(),
        })
    }
}

/// Candidate archives are jars, including ones a user has parked with a
/// `.disabled` suffix — those still describe installed packages.
fn is_mod_archive(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_ascii_lowercase(),
        None => return false,
    };
    name.ends_with(".jar") || name.ends_with(".jar.disabled")
}
