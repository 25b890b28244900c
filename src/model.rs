// ─── Distribution Model ───
// The resolved module graph handed back to the launcher. Field names match
// the distribution index format consumed downstream, hence the camelCase
// and uppercase `MD5` on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of supported loader variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderFamily {
    Forge,
    NeoForge,
}

impl LoaderFamily {
    /// Lowercase identifier used in package ids and metadata.
    pub fn id(&self) -> &'static str {
        match self {
            LoaderFamily::Forge => "forge",
            LoaderFamily::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for LoaderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderFamily::Forge => f.write_str("Forge"),
            LoaderFamily::NeoForge => f.write_str("NeoForge"),
        }
    }
}

/// What a resolved module is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleType {
    /// The loader's primary artifact; carries the library graph as children.
    ForgeHosted,
    /// An ordinary library declared by the loader descriptor.
    Library,
    /// An installed mod package discovered by the directory scanner.
    ForgeMod,
}

/// Physical facts about one resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleArtifact {
    pub size: u64,
    #[serde(rename = "MD5")]
    pub md5: String,
    /// Maven-layout path relative to the repository root. Derivable from
    /// the module id alone, with no network access.
    pub path: String,
    pub url: String,
}

/// One node in the resolved dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Stable identifier: `group:artifact:version[:classifier]`.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub artifact: ModuleArtifact,
    /// Flattened libraries of a primary artifact. Empty for leaf modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_modules: Vec<Module>,
}
