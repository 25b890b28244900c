// ─── Package Metadata Resolution ───
// Identity and display metadata for one scanned mod archive, derived from
// multiple untrusted sources in priority order. Merging is field-by-field:
// for each field the first producer with a non-empty value wins.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, warn};

use crate::archive::ArchiveSource;
use crate::model::LoaderFamily;

/// External static-analysis results, keyed by archive path. Consumed as an
/// opaque, pre-computed lookup table.
pub type MetadataHints = HashMap<PathBuf, MetadataHint>;

/// One static-analysis hit. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct MetadataHint {
    pub group: Option<String>,
    pub id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
}

/// Bundled declarative config: `META-INF/mods.toml`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModsToml {
    pub mod_loader: String,
    #[serde(default)]
    pub loader_version: String,
    #[serde(default)]
    pub mods: Vec<ModsTomlEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModsTomlEntry {
    pub mod_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fully resolved metadata for one scanned package. Built per archive and
/// discarded once the scan pass completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// `group:modId:version`.
    pub package_id: String,
    pub version: String,
    pub display_name: String,
    pub description: String,
    pub loader_kind: LoaderFamily,
    pub loader_version_requirement: String,
}

/// A partial record from one metadata producer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PartialMetadata {
    id: Option<String>,
    version: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
}

impl PartialMetadata {
    /// Keep own fields, fill gaps from `fallback`.
    fn or(self, fallback: PartialMetadata) -> PartialMetadata {
        PartialMetadata {
            id: self.id.or(fallback.id),
            version: self.version.or(fallback.version),
            display_name: self.display_name.or(fallback.display_name),
            description: self.description.or(fallback.description),
        }
    }
}

/// Drop empty strings and unexpanded `${...}` build placeholders, which
/// mods.toml files ship verbatim surprisingly often.
fn usable(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.contains("${"))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ─── Producers, in priority order ───

/// Special-cased legacy archive: OptiFine carries no declarative config,
/// but its changelog's first line is `OptiFine <version>`.
fn optifine_metadata(
    archive: &mut dyn ArchiveSource,
    file_name: &str,
) -> Option<PartialMetadata> {
    if !file_name.to_lowercase().contains("optifine") {
        return None;
    }

    let changelog = match archive.read_entry("changelog.txt") {
        Ok(Some(bytes)) => bytes,
        Ok(None) | Err(_) => {
            warn!("{} looks like OptiFine but has no readable changelog.txt", file_name);
            return None;
        }
    };

    let text = String::from_utf8_lossy(&changelog);
    let first_line = text.lines().next().unwrap_or("").trim();
    // Version is the second whitespace-delimited token of the first line.
    let version = first_line.split_whitespace().nth(1)?;

    Some(PartialMetadata {
        id: Some("optifine".to_string()),
        version: Some(version.to_string()),
        display_name: Some("OptiFine".to_string()),
        description: Some("OptiFine is a Minecraft optimization mod.".to_string()),
    })
}

/// Bundled config. Returns the partial record plus the declared loader
/// version requirement. Parse failures are logged and fall through.
fn mods_toml_metadata(
    archive: &mut dyn ArchiveSource,
    file_name: &str,
) -> (Option<PartialMetadata>, Option<String>) {
    let raw = match archive.read_entry("META-INF/mods.toml") {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return (None, None),
        Err(e) => {
            error!("Failed to read mods.toml from {}: {}", file_name, e);
            return (None, None);
        }
    };

    let text = String::from_utf8_lossy(&raw);
    let parsed: ModsToml = match toml::from_str(&text) {
        Ok(p) => p,
        Err(e) => {
            error!("{} contains an invalid mods.toml file: {}", file_name, e);
            return (None, None);
        }
    };

    let requirement = usable(Some(parsed.loader_version.clone()));
    let Some(entry) = parsed.mods.into_iter().next() else {
        error!("{} declares a mods.toml with no [[mods]] entry", file_name);
        return (None, requirement);
    };

    let partial = PartialMetadata {
        id: usable(Some(entry.mod_id)),
        version: usable(entry.version),
        display_name: usable(entry.display_name),
        description: usable(entry.description),
    };
    (Some(partial), requirement)
}

fn hint_metadata(hint: Option<&MetadataHint>) -> Option<PartialMetadata> {
    let hint = hint?;
    Some(PartialMetadata {
        id: usable(hint.id.clone()),
        version: usable(hint.version.clone()),
        display_name: usable(hint.name.clone()),
        description: None,
    })
}

/// Last resort: a best-effort name from the filename alone.
fn crude_inference(file_name: &str, family: LoaderFamily) -> PartialMetadata {
    let stem = file_name
        .trim_end_matches(".disabled")
        .trim_end_matches(".jar")
        .trim_end_matches(".zip");

    PartialMetadata {
        id: Some(stem.to_string()),
        version: Some("1.0.0".to_string()),
        display_name: Some(stem.to_string()),
        description: Some(format!("A {} mod", family)),
    }
}

/// Resolve one archive's metadata through the full fallback chain.
///
/// Never fails: an archive with no bundled config and no analysis hit still
/// yields a complete synthesized record, with a logged warning.
pub fn resolve_package_metadata(
    archive: &mut dyn ArchiveSource,
    file_name: &str,
    hint: Option<&MetadataHint>,
    family: LoaderFamily,
) -> PackageMetadata {
    let special = optifine_metadata(archive, file_name);
    let (bundled, requirement) = mods_toml_metadata(archive, file_name);
    let hinted = hint_metadata(hint);

    if special.is_none() && bundled.is_none() && hinted.is_none() {
        warn!(
            "No bundled config or analysis result for {}; inferring metadata from filename",
            file_name
        );
    }

    let merged = [special, bundled, hinted]
        .into_iter()
        .flatten()
        .fold(PartialMetadata::default(), PartialMetadata::or)
        .or(crude_inference(file_name, family));

    // The crude producer fills every field, so these cannot be empty.
    let id = merged.id.unwrap_or_default();
    let version = merged.version.unwrap_or_default();
    let group = hint
        .and_then(|h| usable(h.group.clone()))
        .unwrap_or_else(|| format!("generated.{}", family.id()));

    PackageMetadata {
        package_id: format!("{}:{}:{}", group, id, version),
        version,
        display_name: capitalize(&merged.display_name.unwrap_or_default()),
        description: merged.description.unwrap_or_default(),
        loader_kind: family,
        loader_version_requirement: requirement.unwrap_or_default(),
    }
}
