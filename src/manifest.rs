// ─── Loader Version Manifest ───
// The descriptor embedded in a loader's primary artifact (`version.json`),
// plus the OS rule filter applied to its library list before expansion.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ResolverError, ResolverResult};

/// The embedded loader descriptor, persisted verbatim after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    pub id: String,
    pub main_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(default)]
    pub libraries: Vec<ManifestLibrary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<serde_json::Value>,
    #[serde(default)]
    pub jvm: Vec<serde_json::Value>,
}

/// One library declaration from the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestLibrary {
    pub name: String,
    pub downloads: LibraryDownloads,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<LibraryRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDownloads {
    pub artifact: LibraryArtifact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    pub url: String,
    pub sha1: String,
    pub size: u64,
}

// ─── OS Rule Evaluation ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl ManifestLibrary {
    /// Evaluate whether this library applies to the current OS.
    ///
    /// Mojang rule semantics: no rules means allowed; rules are processed
    /// top to bottom starting from disallowed, and a rule with no OS
    /// constraint applies universally.
    pub fn is_allowed_for_current_os(&self) -> bool {
        let rules = match &self.rules {
            Some(r) => r,
            None => return true,
        };

        let current_os = current_os_name();
        let mut allowed = false;

        for rule in rules {
            let os_matches = match &rule.os {
                None => true,
                Some(os) => match &os.name {
                    None => true,
                    Some(name) => name == current_os,
                },
            };

            if os_matches {
                allowed = rule.action == RuleAction::Allow;
            }
        }

        allowed
    }
}

/// The Mojang OS name for the current platform.
fn current_os_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "osx"
    } else {
        "linux"
    }
}

impl VersionManifest {
    /// Parse descriptor bytes read out of the primary artifact.
    pub fn from_slice(bytes: &[u8]) -> ResolverResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| ResolverError::MalformedDescriptor(e.to_string()))
    }

    /// Libraries that survive the platform rule filter.
    pub fn applicable_libraries(&self) -> impl Iterator<Item = &ManifestLibrary> {
        self.libraries
            .iter()
            .filter(|lib| lib.is_allowed_for_current_os())
    }

    /// Persist the descriptor for later inspection, pretty-printed with
    /// 2-space indentation.
    pub async fn save_to(&self, path: &Path) -> ResolverResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ResolverError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| ResolverError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!("Written version manifest to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "neoforge-20.1.7",
        "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
        "inheritsFrom": "1.20.1",
        "libraries": [
            {
                "name": "org.ow2.asm:asm:9.5",
                "downloads": {
                    "artifact": {
                        "path": "org/ow2/asm/asm/9.5/asm-9.5.jar",
                        "url": "https://maven.neoforged.net/releases/org/ow2/asm/asm/9.5/asm-9.5.jar",
                        "sha1": "dc6ea1875f4d64fbc85e1691c95b96a3d8569c90",
                        "size": 121983
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn parses_descriptor() {
        let manifest = VersionManifest::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(manifest.id, "neoforge-20.1.7");
        assert_eq!(manifest.inherits_from.as_deref(), Some("1.20.1"));
        assert_eq!(manifest.libraries.len(), 1);
        assert_eq!(
            manifest.libraries[0].downloads.artifact.sha1,
            "dc6ea1875f4d64fbc85e1691c95b96a3d8569c90"
        );
    }

    #[test]
    fn malformed_descriptor_is_typed() {
        let err = VersionManifest::from_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, ResolverError::MalformedDescriptor(_)));
    }

    #[test]
    fn serialize_parse_round_trip() {
        let manifest = VersionManifest::from_slice(SAMPLE.as_bytes()).unwrap();
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let back = VersionManifest::from_slice(json.as_bytes()).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn no_rules_means_allowed() {
        let manifest = VersionManifest::from_slice(SAMPLE.as_bytes()).unwrap();
        assert!(manifest.libraries[0].is_allowed_for_current_os());
        assert_eq!(manifest.applicable_libraries().count(), 1);
    }

    #[test]
    fn disallow_rule_for_current_os_excludes() {
        let lib = ManifestLibrary {
            name: "org.lwjgl:lwjgl:3.3.1".to_string(),
            downloads: LibraryDownloads {
                artifact: LibraryArtifact {
                    path: "p".to_string(),
                    url: "u".to_string(),
                    sha1: "s".to_string(),
                    size: 1,
                },
            },
            rules: Some(vec![
                LibraryRule {
                    action: RuleAction::Allow,
                    os: None,
                },
                LibraryRule {
                    action: RuleAction::Disallow,
                    os: Some(OsRule {
                        name: Some(current_os_name().to_string()),
                        arch: None,
                    }),
                },
            ]),
        };
        assert!(!lib.is_allowed_for_current_os());
    }

    #[test]
    fn allow_rule_for_other_os_excludes_here() {
        let lib = ManifestLibrary {
            name: "x:y:1".to_string(),
            downloads: LibraryDownloads {
                artifact: LibraryArtifact {
                    path: "p".to_string(),
                    url: "u".to_string(),
                    sha1: "s".to_string(),
                    size: 1,
                },
            },
            rules: Some(vec![LibraryRule {
                action: RuleAction::Allow,
                os: Some(OsRule {
                    name: Some("beos".to_string()),
                    arch: None,
                }),
            }]),
        };
        assert!(!lib.is_allowed_for_current_os());
    }
}
