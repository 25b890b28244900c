// ─── Version-Segmented Registry ───
// Ordered first-match dispatch over (predicate, factory) pairs, one axis
// for resolvers and one for mod-structure scanners. Loader ecosystems
// evolve through hard version cutoffs, so the first matching predicate in
// registration order wins.

use crate::error::{ResolverError, ResolverResult};
use crate::mods::{ModScanner, ScanRequest};
use crate::resolver::{ForgeResolver, NeoForgeResolver, ResolveRequest, Resolver};
use crate::version::MinecraftVersion;

/// Applicability rule over a (game version, loader version) pair.
pub type VersionPredicate = fn(&MinecraftVersion, &str) -> bool;

pub type ResolverFactory = fn(ResolveRequest) -> ResolverResult<Resolver>;
pub type ScannerFactory = fn(ScanRequest) -> ModScanner;

/// The rule table. Built once at startup and never mutated afterwards;
/// tests construct isolated registries with custom rule sets.
pub struct Registry {
    resolvers: Vec<(VersionPredicate, ResolverFactory)>,
    scanners: Vec<(VersionPredicate, ScannerFactory)>,
}

impl Registry {
    /// An empty registry with no rules. Selection always fails until
    /// entries are registered.
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
            scanners: Vec::new(),
        }
    }

    /// The standard rule set. NeoForge claims 1.20.1 onwards; classic
    /// Forge is the registered fallback for everything older.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        registry.register_resolver(NeoForgeResolver::is_for_version, |req| {
            NeoForgeResolver::new(req).map(Resolver::NeoForge)
        });
        registry.register_resolver(ForgeResolver::is_for_version, |req| {
            ForgeResolver::new(req).map(Resolver::Forge)
        });

        registry.register_scanner(NeoForgeResolver::is_for_version, ModScanner::neoforge);
        registry.register_scanner(ForgeResolver::is_for_version, ModScanner::forge);

        registry
    }

    pub fn register_resolver(&mut self, predicate: VersionPredicate, factory: ResolverFactory) {
        self.resolvers.push((predicate, factory));
    }

    pub fn register_scanner(&mut self, predicate: VersionPredicate, factory: ScannerFactory) {
        self.scanners.push((predicate, factory));
    }

    /// Select and construct the resolver for a version pair. Pure selection;
    /// an unmatched pair is an unsupported combination, not a defect.
    pub fn select_resolver(&self, request: ResolveRequest) -> ResolverResult<Resolver> {
        for (predicate, factory) in &self.resolvers {
            if predicate(&request.minecraft, &request.loader_version) {
                return factory(request);
            }
        }
        Err(ResolverError::NoMatchingImplementation {
            minecraft: request.minecraft.to_string(),
            loader: request.loader_version,
        })
    }

    /// Select and construct the mod-structure scanner for a version pair.
    pub fn select_scanner(&self, request: ScanRequest) -> ResolverResult<ModScanner> {
        for (predicate, factory) in &self.scanners {
            if predicate(&request.minecraft, &request.loader_version) {
                return Ok(factory(request));
            }
        }
        Err(ResolverError::NoMatchingImplementation {
            minecraft: request.minecraft.to_string(),
            loader: request.loader_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoaderFamily;
    use crate::repo::RepoStructure;

    fn resolve_request(mc: &str, loader: &str) -> ResolveRequest {
        ResolveRequest::new(
            MinecraftVersion::new(mc).unwrap(),
            loader,
            RepoStructure::new("/repo"),
            "https://dist.example",
        )
    }

    fn scan_request(mc: &str, loader: &str) -> ScanRequest {
        ScanRequest::new(MinecraftVersion::new(mc).unwrap(), loader, "https://dist.example")
    }

    #[test]
    fn pre_1_20_1_selects_classic_forge() {
        let registry = Registry::with_defaults();
        let resolver = registry
            .select_resolver(resolve_request("1.19.4", "45.1.0"))
            .unwrap();
        assert_eq!(resolver.family(), LoaderFamily::Forge);
    }

    #[test]
    fn from_1_20_1_selects_neoforge() {
        let registry = Registry::with_defaults();
        let resolver = registry
            .select_resolver(resolve_request("1.20.1", "20.1.7"))
            .unwrap();
        assert_eq!(resolver.family(), LoaderFamily::NeoForge);
        assert_eq!(resolver.artifact_version(), "1.20.1-20.1.7");
        assert_eq!(
            resolver.primary_url(),
            "https://maven.neoforged.net/releases/net/neoforged/neoforge/1.20.1-20.1.7/neoforge-1.20.1-20.1.7-universal.jar"
        );
    }

    #[test]
    fn scanner_axis_segments_identically() {
        let registry = Registry::with_defaults();
        let legacy = registry.select_scanner(scan_request("1.16.5", "36.2.39")).unwrap();
        let modern = registry.select_scanner(scan_request("1.21", "21.0.3")).unwrap();
        assert_eq!(legacy.family(), LoaderFamily::Forge);
        assert_eq!(modern.family(), LoaderFamily::NeoForge);
    }

    #[test]
    fn empty_registry_reports_no_match() {
        let registry = Registry::empty();
        let err = registry
            .select_resolver(resolve_request("1.20.1", "20.1.7"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolverError::NoMatchingImplementation { .. }
        ));
    }

    #[test]
    fn registration_order_decides_overlaps() {
        // A broad rule registered first shadows a narrower one behind it.
        let mut registry = Registry::empty();
        registry.register_resolver(ForgeResolver::is_for_version, |req| {
            ForgeResolver::new(req).map(Resolver::Forge)
        });
        registry.register_resolver(NeoForgeResolver::is_for_version, |req| {
            NeoForgeResolver::new(req).map(Resolver::NeoForge)
        });

        let resolver = registry
            .select_resolver(resolve_request("1.20.1", "20.1.7"))
            .unwrap();
        assert_eq!(resolver.family(), LoaderFamily::Forge);
    }
}
