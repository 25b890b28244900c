use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{ResolverError, ResolverResult};

/// A fully parsed Maven coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl MavenArtifact {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, classifier: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: classifier.map(str::to_string),
        }
    }

    /// Parse a Maven coordinate string.
    pub fn parse(coord: &str) -> ResolverResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        match parts.len() {
            3 => Ok(Self::new(parts[0], parts[1], parts[2], None)),
            4 => Ok(Self::new(parts[0], parts[1], parts[2], Some(parts[3]))),
            _ => Err(ResolverError::InvalidMavenCoordinate(coord.to_string())),
        }
    }

    /// The group path portion (`net.neoforged` → `net/neoforged`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// The artifact filename: `artifactId-version[-classifier].jar`.
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.jar", self.artifact_id, self.version, c),
            None => format!("{}-{}.jar", self.artifact_id, self.version),
        }
    }

    /// Relative Maven-layout path: `<group_path>/<artifact_id>/<version>/<filename>`.
    ///
    /// This is a pure function of the coordinate; module paths derived from
    /// it are reproducible without network access.
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_path(),
            self.artifact_id,
            self.version,
            self.filename()
        )
    }

    /// `relative_path` as a platform `PathBuf`, for joining onto a local root.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.group_path())
            .join(&self.artifact_id)
            .join(&self.version)
            .join(self.filename())
    }

    /// Full URL for this artifact under the given repository base.
    pub fn url(&self, repo_base: &str) -> String {
        format!("{}/{}", repo_base.trim_end_matches('/'), self.relative_path())
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.version, c
            ),
            None => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_coordinate() {
        let a = MavenArtifact::parse("net.sf.jopt-simple:jopt-simple:5.0.4").unwrap();
        assert_eq!(a.group_id, "net.sf.jopt-simple");
        assert_eq!(a.artifact_id, "jopt-simple");
        assert_eq!(a.version, "5.0.4");
        assert_eq!(a.classifier, None);
    }

    #[test]
    fn parse_with_classifier() {
        let a = MavenArtifact::parse("net.neoforged:neoforge:1.20.1-20.1.7:universal").unwrap();
        assert_eq!(a.classifier, Some("universal".to_string()));
    }

    #[test]
    fn rejects_short_coordinate() {
        assert!(MavenArtifact::parse("net.neoforged:neoforge").is_err());
    }

    #[test]
    fn url_construction() {
        let a = MavenArtifact::parse("net.neoforged:neoforge:1.20.1-20.1.7:universal").unwrap();
        assert_eq!(
            a.url("https://maven.neoforged.net/releases/"),
            "https://maven.neoforged.net/releases/net/neoforged/neoforge/1.20.1-20.1.7/neoforge-1.20.1-20.1.7-universal.jar"
        );
    }

    #[test]
    fn relative_path_is_maven_layout() {
        let a = MavenArtifact::parse("org.ow2.asm:asm:9.5").unwrap();
        assert_eq!(a.relative_path(), "org/ow2/asm/asm/9.5/asm-9.5.jar");
    }

    #[test]
    fn display_round_trips() {
        let coord = "generated.neoforge:jei:15.2.0.27";
        let a = MavenArtifact::parse(coord).unwrap();
        assert_eq!(a.to_string(), coord);
    }
}
