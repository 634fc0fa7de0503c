//! Locally-exported recipe declarations and the registration handle.
//!
//! A LocalRecipe points at an out-of-registry recipe file next to the
//! manifest. Registration publishes it into the engine's local resolution
//! environment under a private coordinate. The `Registration` handle returned
//! by that step is what entitles a later requirement-listing step to consume
//! requirements pinned to those coordinates: register first, resolve second,
//! as an explicit two-phase contract rather than an ordering convention.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::core::coordinate::Coordinate;
use crate::core::requirement::Requirement;

/// An out-of-registry recipe to export under a private coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRecipe {
    /// Package the recipe defines
    package: String,

    /// Version the recipe defines
    version: Version,

    /// Recipe file path, relative to the manifest's own directory
    path: PathBuf,

    /// Coordinate to export under
    coordinate: Coordinate,
}

impl LocalRecipe {
    /// Declare a local recipe.
    pub fn new(
        package: impl Into<String>,
        version: Version,
        path: impl Into<PathBuf>,
        coordinate: Coordinate,
    ) -> Self {
        LocalRecipe {
            package: package.into(),
            version,
            path: path.into(),
            coordinate,
        }
    }

    /// Get the package name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Get the recipe version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the declared (manifest-relative) recipe path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the export coordinate.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Resolve the recipe path against the manifest directory.
    pub fn resolved_path(&self, manifest_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            manifest_dir.join(&self.path)
        }
    }

    /// The reference the export produces, e.g. `libp11/0.4.11@user/stable`.
    pub fn reference(&self) -> String {
        format!("{}/{}@{}", self.package, self.version, self.coordinate)
    }
}

/// Local recipe as it appears in the TOML declaration file.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalRecipeSpec {
    /// Package the recipe defines
    pub package: String,

    /// Version the recipe defines
    pub version: String,

    /// Recipe file path relative to the manifest
    pub path: PathBuf,

    /// Coordinate to export under
    pub coordinate: Coordinate,
}

/// Proof that this pass's local recipes were exported.
///
/// Produced by `Manifest::register_local_recipes` and consumed by
/// `Manifest::requirements`; holds the coordinates the export facility
/// accepted during this pass. Carries no state across passes.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    coordinates: Vec<Coordinate>,
}

impl Registration {
    /// An empty registration, valid for manifests with no local recipes.
    pub fn empty() -> Self {
        Registration::default()
    }

    /// Record a successfully-exported coordinate.
    pub(crate) fn record(&mut self, coordinate: Coordinate) {
        if !self.coordinates.contains(&coordinate) {
            self.coordinates.push(coordinate);
        }
    }

    /// Coordinates exported during this pass.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Check whether a requirement's coordinate (if any) was exported.
    ///
    /// Registry requirements carry no coordinate and are always covered.
    pub fn covers(&self, requirement: &Requirement) -> bool {
        match requirement.coordinate() {
            Some(coordinate) => self.coordinates.contains(coordinate),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> LocalRecipe {
        LocalRecipe::new(
            "libp11",
            Version::new(0, 4, 11),
            "libp11-recipe.py",
            "user/stable".parse().unwrap(),
        )
    }

    #[test]
    fn test_resolved_path_is_manifest_relative() {
        let resolved = recipe().resolved_path(Path::new("/work/component"));
        assert_eq!(resolved, Path::new("/work/component/libp11-recipe.py"));
    }

    #[test]
    fn test_reference_form() {
        assert_eq!(recipe().reference(), "libp11/0.4.11@user/stable");
    }

    #[test]
    fn test_registration_covers() {
        let mut registration = Registration::empty();
        registration.record("user/stable".parse().unwrap());

        let local: Requirement = "libp11/0.4.11@user/stable".parse().unwrap();
        let registry: Requirement = "openssl/3.2.1".parse().unwrap();
        let other: Requirement = "libp11/0.4.11@user/testing".parse().unwrap();

        assert!(registration.covers(&local));
        assert!(registration.covers(&registry));
        assert!(!registration.covers(&other));
    }
}
