use async_trait::async_trait;

use super::{warn_if_prerelease, LoaderResolver, ResolveRequest};
use crate::download::Downloader;
use crate::error::ResolverResult;
use crate::maven::{MavenArtifact, NEOFORGE_MAVEN};
use crate::model::LoaderFamily;
use crate::version::MinecraftVersion;

/// Resolver for NeoForge distributions.
#[derive(Debug)]
pub struct NeoForgeResolver {
    request: ResolveRequest,
    downloader: Downloader,
}

impl NeoForgeResolver {
    /// NeoForge exists from Minecraft 1.20.1 onwards.
    pub fn is_for_version(minecraft: &MinecraftVersion, _loader_version: &str) -> bool {
        minecraft.is_at_least(1, 20, 1)
    }

    pub fn new(request: ResolveRequest) -> ResolverResult<Self> {
        warn_if_prerelease(LoaderFamily::NeoForge, &request.loader_version);
        Ok(Self {
            request,
            downloader: Downloader::new()?,
        })
    }
}

#[async_trait]
impl LoaderResolver for NeoForgeResolver {
    fn family(&self) -> LoaderFamily {
        LoaderFamily::NeoForge
    }

    /// NeoForge artifact versions are `{minecraft}-{neoforge}`.
    fn artifact_version(&self) -> String {
        format!(
            "{}-{}",
            self.request.minecraft, self.request.loader_version
        )
    }

    fn primary_artifact(&self) -> MavenArtifact {
        MavenArtifact::new(
            "net.neoforged",
            "neoforge",
            &self.artifact_version(),
            Some("universal"),
        )
    }

    fn remote_repository(&self) -> &'static str {
        NEOFORGE_MAVEN
    }

    fn display_name(&self) -> String {
        format!("NeoForge ({})", self.artifact_version())
    }

    fn request(&self) -> &ResolveRequest {
        &self.request
    }

    fn downloader(&self) -> &Downloader {
        &self.downloader
    }
}
