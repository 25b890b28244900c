// ─── Loader Resolvers ───
// Polymorphic resolution of a loader distribution into a verified module
// graph. Variants share the orchestration below and differ only in their
// coordinates, remote repository and version-string scheme.

mod forge;
mod neoforge;

pub use forge::ForgeResolver;
pub use neoforge::NeoForgeResolver;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::archive::{ArchiveSource, ZipSource};
use crate::download::{file_hash, is_verified, Downloader, HashAlgorithm};
use crate::error::{ResolverError, ResolverResult};
use crate::manifest::{ManifestLibrary, VersionManifest};
use crate::maven::MavenArtifact;
use crate::model::{LoaderFamily, Module, ModuleArtifact, ModuleType};
use crate::repo::RepoStructure;
use crate::version::MinecraftVersion;

/// Everything one resolution call needs. Each call owns its own request,
/// so concurrent resolutions share no mutable state.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub minecraft: MinecraftVersion,
    pub loader_version: String,
    pub repo: RepoStructure,
    /// Base URL the emitted module graph points its artifact URLs at.
    pub base_url: String,
    /// Re-download the primary artifact even when a cached copy exists.
    pub invalidate_cache: bool,
}

impl ResolveRequest {
    pub fn new(
        minecraft: MinecraftVersion,
        loader_version: impl Into<String>,
        repo: RepoStructure,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            minecraft,
            loader_version: loader_version.into(),
            repo,
            base_url: base_url.into(),
            invalidate_cache: false,
        }
    }
}

/// Join a distribution base URL with a repository-relative path.
pub(crate) fn distribution_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Warn when a loader version looks like a pre-release. Observational only,
/// never blocks resolution.
pub(crate) fn warn_if_prerelease(family: LoaderFamily, loader_version: &str) {
    let v = loader_version.to_lowercase();
    if v.contains("beta") || v.contains("alpha") {
        warn!(
            "{} {} is a pre-release build; not recommended for production distributions",
            family, loader_version
        );
    }
}

/// The shared resolution contract. Implementors supply the pure,
/// variant-specific pieces; orchestration is provided.
#[async_trait]
pub trait LoaderResolver: Send + Sync {
    fn family(&self) -> LoaderFamily;

    /// The loader's own composition of game version and loader version.
    /// Pure; no I/O.
    fn artifact_version(&self) -> String;

    /// Maven coordinate of the primary distribution artifact.
    fn primary_artifact(&self) -> MavenArtifact;

    /// Remote repository base the primary artifact is published under.
    fn remote_repository(&self) -> &'static str;

    /// Human-readable label for the synthesized primary module.
    fn display_name(&self) -> String;

    fn request(&self) -> &ResolveRequest;

    fn downloader(&self) -> &Downloader;

    /// Deterministic URL of the primary distribution artifact. Pure.
    fn primary_url(&self) -> String {
        self.primary_artifact().url(self.remote_repository())
    }

    /// Guarantee the primary artifact is present locally.
    ///
    /// A cached copy is trusted as-is: its integrity is re-established
    /// per-use through the descriptor it yields, whose libraries all carry
    /// explicit hashes. No hash for the wrapper itself is known in advance.
    async fn ensure_primary_cached(&self) -> ResolverResult<PathBuf> {
        let local = self.request().repo.library_path(&self.primary_artifact());
        debug!("Checking for {} at {:?}", self.family(), local);

        if self.request().invalidate_cache || !local.exists() {
            let url = self.primary_url();
            debug!("{} not cached, downloading from {}", self.family(), url);
            self.downloader().fetch(&url, &local).await?;
        } else {
            debug!("Using locally discovered {}", self.family());
        }

        Ok(local)
    }

    /// Read and parse the embedded `version.json` descriptor.
    async fn extract_manifest(&self, jar: &Path) -> ResolverResult<VersionManifest> {
        let mut archive = ZipSource::open(jar).await?;
        let bytes = archive.read_entry("version.json")?.ok_or_else(|| {
            ResolverError::MalformedDescriptor(format!(
                "{} contains no version.json entry",
                jar.display()
            ))
        })?;
        VersionManifest::from_slice(&bytes)
    }

    /// Materialize one descriptor library as a verified module.
    ///
    /// Cache-hit fast path: an existing file whose SHA-1 matches is reused;
    /// a mismatching one triggers exactly one re-download (self-healing
    /// against local corruption).
    async fn resolve_library(&self, lib: &ManifestLibrary) -> ResolverResult<Module> {
        let declared = &lib.downloads.artifact;
        let local = self.request().repo.library_path_for(&declared.path);

        if !local.exists() {
            debug!("{} not found locally, downloading..", lib.name);
            self.downloader()
                .fetch_verified(&declared.url, &local, &declared.sha1, HashAlgorithm::Sha1)
                .await?;
        } else if !is_verified(&local, &declared.sha1, HashAlgorithm::Sha1).await {
            debug!("Hashes do not match for {}, redownloading..", lib.name);
            self.downloader()
                .fetch_verified(&declared.url, &local, &declared.sha1, HashAlgorithm::Sha1)
                .await?;
        } else {
            debug!("Using local copy of {}", lib.name);
        }

        let md5 = file_hash(&local, HashAlgorithm::Md5).await?;

        Ok(Module {
            id: lib.name.clone(),
            name: lib.name.clone(),
            module_type: ModuleType::Library,
            artifact: ModuleArtifact {
                size: declared.size,
                md5,
                path: declared.path.clone(),
                url: distribution_url(&self.request().base_url, &declared.path),
            },
            sub_modules: Vec::new(),
        })
    }

    /// Expand the descriptor into the full module graph.
    ///
    /// Library fetches are mutually independent and run with bounded
    /// concurrency; the first failure aborts the whole call, so a partial
    /// graph is never returned.
    async fn expand(
        &self,
        manifest: &VersionManifest,
        primary_path: &Path,
    ) -> ResolverResult<Module> {
        let fetches: Vec<_> = manifest
            .applicable_libraries()
            .map(|lib| self.resolve_library(lib))
            .collect();
        let sub_modules: Vec<Module> = stream::iter(fetches)
            .buffered(self.downloader().concurrency())
            .try_collect()
            .await?;

        let primary = self.primary_artifact();
        let size = tokio::fs::metadata(primary_path)
            .await
            .map_err(|e| ResolverError::Io {
                path: primary_path.to_path_buf(),
                source: e,
            })?
            .len();
        let md5 = file_hash(primary_path, HashAlgorithm::Md5).await?;
        let path = primary.relative_path();

        Ok(Module {
            id: primary.to_string(),
            name: self.display_name(),
            module_type: ModuleType::ForgeHosted,
            artifact: ModuleArtifact {
                size,
                md5,
                url: distribution_url(&self.request().base_url, &path),
                path,
            },
            sub_modules,
        })
    }

    /// Full resolution: primary artifact → descriptor → module graph.
    /// The persisted descriptor is exactly the parsed form, pretty-printed.
    async fn resolve(&self) -> ResolverResult<Module> {
        let request = self.request();
        info!(
            "Resolving {} {} for Minecraft {}",
            self.family(),
            request.loader_version,
            request.minecraft
        );

        let primary_path = self.ensure_primary_cached().await?;
        let manifest = self.extract_manifest(&primary_path).await?;

        let manifest_path = request
            .repo
            .version_manifest_path(&request.minecraft, &request.loader_version);
        manifest.save_to(&manifest_path).await?;

        self.expand(&manifest, &primary_path).await
    }
}

/// Closed dispatch over the supported loader variants.
#[derive(Debug)]
pub enum Resolver {
    Forge(ForgeResolver),
    NeoForge(NeoForgeResolver),
}

impl Resolver {
    pub fn family(&self) -> LoaderFamily {
        match self {
            Resolver::Forge(r) => r.family(),
            Resolver::NeoForge(r) => r.family(),
        }
    }

    pub fn artifact_version(&self) -> String {
        match self {
            Resolver::Forge(r) => r.artifact_version(),
            Resolver::NeoForge(r) => r.artifact_version(),
        }
    }

    pub fn primary_url(&self) -> String {
        match self {
            Resolver::Forge(r) => r.primary_url(),
            Resolver::NeoForge(r) => r.primary_url(),
        }
    }

    pub async fn resolve(&self) -> ResolverResult<Module> {
        match self {
            Resolver::Forge(r) => r.resolve().await,
            Resolver::NeoForge(r) => r.resolve().await,
        }
    }
}
