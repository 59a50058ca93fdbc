//! Project root detection
//!
//! A [`ProjectDetector`] answers one question: is this directory the top of a
//! managed project? The stock implementation, [`PackageJsonDetector`], looks
//! for a `package.json` that depends on a configured package.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::trace;

use crate::config::DEFAULT_PROJECT_DEPENDENCY;
use crate::error::{ErrorCode, InternalError, Result, ResultExt};

/// Manifest file inspected in every candidate directory
pub const MANIFEST_FILE: &str = "package.json";

/// Decides whether a directory is a project root
#[trait_variant::make(ProjectDetector: Send)]
pub trait LocalProjectDetector {
    /// `Ok(false)` for ordinary directories; `Err` only when the directory
    /// could not be inspected.
    async fn is_project_root(&self, dir: &Path) -> Result<bool>;
}

/// Minimal view of a `package.json`
#[derive(Debug, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    pub fn depends_on(&self, package: &str) -> bool {
        self.dependencies.contains_key(package) || self.dev_dependencies.contains_key(package)
    }
}

/// Treats a directory as a project root when its `package.json` depends on
/// a given package (`react-native` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageJsonDetector {
    dependency: String,
}

impl PackageJsonDetector {
    pub fn new(dependency: impl Into<String>) -> Self {
        Self {
            dependency: dependency.into(),
        }
    }

    pub fn dependency(&self) -> &str {
        &self.dependency
    }
}

impl Default for PackageJsonDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_DEPENDENCY)
    }
}

impl LocalProjectDetector for PackageJsonDetector {
    async fn is_project_root(&self, dir: &Path) -> Result<bool> {
        let manifest_path = dir.join(MANIFEST_FILE);

        let content = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("No {} in {:?}", MANIFEST_FILE, dir);
                return Ok(false);
            }
            Err(e) => {
                return Err(InternalError::wrap(
                    e,
                    ErrorCode::ProjectDetectionFailed,
                    format!("Failed to read {}", manifest_path.display()),
                ));
            }
        };

        let manifest: PackageManifest = serde_json::from_str(&content)
            .with_wrap_err(ErrorCode::ProjectDetectionFailed, || {
                format!("Malformed {}", manifest_path.display())
            })?;

        let found = manifest.depends_on(&self.dependency);
        trace!(
            "{:?} depends on {}: {}",
            manifest_path,
            self.dependency,
            found
        );
        Ok(found)
    }
}
