// ─── Repository Layout ───
// Pure functions from identifiers to on-disk locations. The repository is
// append-mostly: resolutions targeting distinct artifact paths never
// conflict, and writers go through the downloader's temp-then-rename path.

use std::path::{Path, PathBuf};

use crate::maven::MavenArtifact;
use crate::version::MinecraftVersion;

/// The local package repository a resolution materializes into.
#[derive(Debug, Clone)]
pub struct RepoStructure {
    root: PathBuf,
}

impl RepoStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root of the Maven-layout library tree.
    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// Local path for a library identified by Maven coordinate.
    pub fn library_path(&self, artifact: &MavenArtifact) -> PathBuf {
        self.libraries_dir().join(artifact.local_path())
    }

    /// Local path for a library identified by its declared relative path.
    pub fn library_path_for(&self, relative: &str) -> PathBuf {
        self.libraries_dir().join(relative)
    }

    /// Where the extracted loader descriptor is persisted for inspection.
    pub fn version_manifest_path(
        &self,
        minecraft: &MinecraftVersion,
        loader_version: &str,
    ) -> PathBuf {
        let id = format!("{}-{}", minecraft, loader_version);
        self.root
            .join("versions")
            .join(&id)
            .join(format!("{}.json", id))
    }

    /// Directory scanned for installed mod packages.
    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_path_follows_maven_layout() {
        let repo = RepoStructure::new("/repo");
        let a = MavenArtifact::parse("org.ow2.asm:asm:9.5").unwrap();
        assert_eq!(
            repo.library_path(&a),
            PathBuf::from("/repo/libraries/org/ow2/asm/asm/9.5/asm-9.5.jar")
        );
    }

    #[test]
    fn manifest_path_combines_both_versions() {
        let repo = RepoStructure::new("/repo");
        let mc = MinecraftVersion::new("1.20.1").unwrap();
        assert_eq!(
            repo.version_manifest_path(&mc, "20.1.7"),
            PathBuf::from("/repo/versions/1.20.1-20.1.7/1.20.1-20.1.7.json")
        );
    }
}
