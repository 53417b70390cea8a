use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ScanError;

/// A declared package and the literal version string next to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Manifest formats we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Line-oriented `name==version` list (`requirements.txt`).
    Requirements,
    /// npm `package.json`.
    PackageManifest,
}

impl ManifestFormat {
    /// Ecosystem whose advisories apply to packages of this format.
    pub fn ecosystem(self) -> Ecosystem {
        match self {
            ManifestFormat::Requirements => Ecosystem::PyPI,
            ManifestFormat::PackageManifest => Ecosystem::Npm,
        }
    }
}

impl FromStr for ManifestFormat {
    type Err = ScanError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "-r" => Ok(ManifestFormat::Requirements),
            "-p" => Ok(ManifestFormat::PackageManifest),
            other => Err(ScanError::UnsupportedInput(other.to_string())),
        }
    }
}

impl std::fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestFormat::Requirements => write!(f, "requirements"),
            ManifestFormat::PackageManifest => write!(f, "package manifest"),
        }
    }
}

/// Where a manifest lives and how to read it. Fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestHandle {
    pub path: PathBuf,
    pub format: ManifestFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    PyPI,
    Npm,
}

impl Ecosystem {
    /// Ecosystem name as the OSV API spells it.
    pub fn osv_name(self) -> &'static str {
        match self {
            Ecosystem::PyPI => "PyPI",
            Ecosystem::Npm => "npm",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::PyPI => write!(f, "Python"),
            Ecosystem::Npm => write!(f, "Node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!("-r".parse::<ManifestFormat>().unwrap(), ManifestFormat::Requirements);
        assert_eq!("-p".parse::<ManifestFormat>().unwrap(), ManifestFormat::PackageManifest);
    }

    #[test]
    fn test_unknown_token_is_unsupported() {
        let err = "-x".parse::<ManifestFormat>().unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedInput(ref t) if t == "-x"));
    }
}
