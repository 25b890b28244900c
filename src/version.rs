// ─── Minecraft Version ───
// Dotted numeric game versions ("1.20.1", "1.21") with a total order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ResolverError, ResolverResult};

/// A parsed `major.minor[.patch]` game version.
///
/// Comparison is numeric per component, so `1.9 < 1.10` and
/// `1.20 == 1.20.0`. `Display` reproduces the original input string.
#[derive(Debug, Clone)]
pub struct MinecraftVersion {
    raw: String,
    major: u32,
    minor: u32,
    patch: u32,
}

impl MinecraftVersion {
    pub fn new(raw: &str) -> ResolverResult<Self> {
        let mut parts = raw.split('.');

        let mut component = |required: bool| -> ResolverResult<u32> {
            match parts.next() {
                Some(p) => p
                    .parse::<u32>()
                    .map_err(|_| ResolverError::InvalidVersion(raw.to_string())),
                None if required => Err(ResolverError::InvalidVersion(raw.to_string())),
                None => Ok(0),
            }
        };

        let major = component(true)?;
        let minor = component(true)?;
        let patch = component(false)?;

        if parts.next().is_some() {
            return Err(ResolverError::InvalidVersion(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            major,
            minor,
            patch,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Predicate form of the total order, for cutoff rules.
    pub fn is_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        self.key() >= (major, minor, patch)
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl PartialEq for MinecraftVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for MinecraftVersion {}

impl PartialOrd for MinecraftVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinecraftVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for MinecraftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MinecraftVersion {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for MinecraftVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for MinecraftVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
