use async_trait::async_trait;

use super::{warn_if_prerelease, LoaderResolver, ResolveRequest};
use crate::download::Downloader;
use crate::error::ResolverResult;
use crate::maven::{MavenArtifact, FORGE_MAVEN};
use crate::model::LoaderFamily;
use crate::version::MinecraftVersion;

/// Resolver for classic Minecraft Forge distributions.
#[derive(Debug)]
pub struct ForgeResolver {
    request: ResolveRequest,
    downloader: Downloader,
}

impl ForgeResolver {
    /// Forge is the catch-all for versions no newer family claims first.
    pub fn is_for_version(_minecraft: &MinecraftVersion, _loader_version: &str) -> bool {
        true
    }

    pub fn new(request: ResolveRequest) -> ResolverResult<Self> {
        warn_if_prerelease(LoaderFamily::Forge, &request.loader_version);
        Ok(Self {
            request,
            downloader: Downloader::new()?,
        })
    }
}

#[async_trait]
impl LoaderResolver for ForgeResolver {
    fn family(&self) -> LoaderFamily {
        LoaderFamily::Forge
    }

    /// Forge artifact versions are `{minecraft}-{forge}`, except the
    /// 1.7–1.8 era which published under `{minecraft}-{forge}-{minecraft}`.
    fn artifact_version(&self) -> String {
        let mc = &self.request.minecraft;
        if mc.is_at_least(1, 9, 0) {
            format!("{}-{}", mc, self.request.loader_version)
        } else {
            format!("{}-{}-{}", mc, self.request.loader_version, mc)
        }
    }

    fn primary_artifact(&self) -> MavenArtifact {
        MavenArtifact::new(
            "net.minecraftforge",
            "forge",
            &self.artifact_version(),
            Some("universal"),
        )
    }

    fn remote_repository(&self) -> &'static str {
        FORGE_MAVEN
    }

    fn display_name(&self) -> String {
        format!("Forge ({})", self.artifact_version())
    }

    fn request(&self) -> &ResolveRequest {
        &self.request
    }

    fn downloader(&self) -> &Downloader {
        &self.downloader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::RepoStructure;

    fn resolver(mc: &str, loader: &str) -> ForgeResolver {
        let request = ResolveRequest::new(
            MinecraftVersion::new(mc).unwrap(),
            loader,
            RepoStructure::new("/repo"),
            "https://dist.example",
        );
        ForgeResolver::new(request).unwrap()
    }

    #[test]
    fn modern_versions_join_with_hyphen() {
        assert_eq!(
            resolver("1.19.4", "45.1.0").artifact_version(),
            "1.19.4-45.1.0"
        );
    }

    #[test]
    fn legacy_versions_repeat_the_game_version() {
        assert_eq!(
            resolver("1.7.10", "10.13.4.1614").artifact_version(),
            "1.7.10-10.13.4.1614-1.7.10"
        );
    }

    #[test]
    fn primary_url_points_at_forge_maven() {
        assert_eq!(
            resolver("1.19.4", "45.1.0").primary_url(),
            "https://maven.minecraftforge.net/net/minecraftforge/forge/1.19.4-45.1.0/forge-1.19.4-45.1.0-universal.jar"
        );
    }
}
