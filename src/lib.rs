// ─── modstack ───
// Resolves and materializes Forge-family mod-loader distributions for a
// target game version: version-segmented dispatch picks the loader
// implementation, artifacts are fetched into a hash-verified local
// repository, and the loader's embedded descriptor is expanded into a
// module graph a launcher can reference.
//
// Architecture:
//   error      — central error enum (one Result alias crate-wide)
//   version    — dotted game-version parsing + total order
//   maven      — coordinate parsing, Maven layout paths, repo constants
//   repo       — local repository layout
//   archive    — read-one-entry access to jar containers
//   download   — streaming fetch with hash verification
//   model      — Module graph handed to the launcher
//   manifest   — embedded loader descriptor + OS rule filter
//   resolver   — Forge / NeoForge resolution engines
//   mods       — installed-package scanner + metadata fallback chain
//   registry   — first-match (predicate, factory) dispatch tables

pub mod archive;
pub mod download;
pub mod error;
pub mod http;
pub mod manifest;
pub mod maven;
pub mod model;
pub mod mods;
pub mod registry;
pub mod repo;
pub mod resolver;
pub mod version;

use std::path::Path;

pub use error::{ResolverError, ResolverResult};
pub use model::{LoaderFamily, Module, ModuleArtifact, ModuleType};
pub use mods::{MetadataHint, MetadataHints, ScanRequest};
pub use registry::Registry;
pub use repo::RepoStructure;
pub use resolver::ResolveRequest;
pub use version::MinecraftVersion;

/// Resolve a loader distribution into its verified module graph, using the
/// standard rule set. The returned module is the loader's primary artifact
/// with its flattened libraries as children.
pub async fn resolve_loader(request: ResolveRequest) -> ResolverResult<Module> {
    Registry::with_defaults()
        .select_resolver(request)?
        .resolve()
        .await
}

/// Enumerate installed mod packages in `directory`, one module per archive.
pub async fn scan_installed_packages(
    request: ScanRequest,
    directory: &Path,
) -> ResolverResult<Vec<Module>> {
    Registry::with_defaults()
        .select_scanner(request)?
        .scan(directory)
        .await
}
