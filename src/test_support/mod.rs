//! Test fixtures and a mock export facility for ballast unit tests.
//!
//! The mock exporter records every export it is asked to perform, so tests
//! can assert the registration-before-listing ordering and the at-most-once
//! guarantee without spawning an engine process.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use semver::Version;

use crate::core::coordinate::Coordinate;
use crate::core::manifest::Manifest;
use crate::core::options::OptionOverride;
use crate::core::recipe::LocalRecipe;
use crate::core::requirement::Requirement;
use crate::export::{ExportError, RecipeExporter};

/// One recorded export invocation.
#[derive(Debug, Clone)]
pub struct ExportCall {
    pub recipe_path: PathBuf,
    pub coordinate: Coordinate,
    pub cwd: PathBuf,
}

/// Mock exporter recording calls, optionally rejecting after a threshold.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    calls: Mutex<Vec<ExportCall>>,
    accept_limit: Option<usize>,
}

impl RecordingExporter {
    /// Exporter that accepts every export.
    pub fn new() -> Self {
        RecordingExporter::default()
    }

    /// Exporter that rejects every export.
    pub fn rejecting() -> Self {
        RecordingExporter {
            calls: Mutex::new(Vec::new()),
            accept_limit: Some(0),
        }
    }

    /// Exporter that accepts the first `n` exports and rejects the rest.
    ///
    /// Models an engine whose policy errors on re-registering an
    /// already-registered coordinate.
    pub fn rejecting_after(n: usize) -> Self {
        RecordingExporter {
            calls: Mutex::new(Vec::new()),
            accept_limit: Some(n),
        }
    }

    /// The exports performed so far, in invocation order.
    pub fn calls(&self) -> Vec<ExportCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecipeExporter for RecordingExporter {
    fn export(
        &self,
        recipe_path: &Path,
        coordinate: &Coordinate,
        cwd: &Path,
    ) -> Result<(), ExportError> {
        let mut calls = self.calls.lock().unwrap();
        let accepted_so_far = calls.len();
        calls.push(ExportCall {
            recipe_path: recipe_path.to_path_buf(),
            coordinate: coordinate.clone(),
            cwd: cwd.to_path_buf(),
        });

        if let Some(limit) = self.accept_limit {
            if accepted_so_far >= limit {
                return Err(ExportError::Rejected {
                    command: format!("mock export {}", recipe_path.display()),
                    code: Some(1),
                    stderr: format!("coordinate `{coordinate}` already registered"),
                });
            }
        }

        Ok(())
    }
}

/// The fixed declaration set: six runtime requirements (one local), three
/// build tools, one local recipe, two overrides on the TLS library.
pub fn services_manifest_toml() -> String {
    r#"
settings   = ["os", "compiler", "build_type", "arch"]
generators = ["CMakeToolchain", "CMakeDeps"]

requires = [
    "gtest/1.14.0",
    "libcurl/8.8.0",
    "poco/1.13.2",
    "grpc/1.54.3",
    "openssl/3.2.1",
    "libp11/0.4.11@user/stable",
]

build-requires = ["protobuf/3.21.12", "grpc/1.54.3", "gtest/1.14.0"]

[[local-recipes]]
package    = "libp11"
version    = "0.4.11"
path       = "libp11-recipe.py"
coordinate = "user/stable"

[options.openssl]
no_dso = false
shared = true
"#
    .to_string()
}

/// Write the local recipe file the fixture manifest points at.
pub fn write_recipe_file(dir: &Path) {
    std::fs::write(dir.join("libp11-recipe.py"), "# out-of-registry recipe\n").unwrap();
}

/// Build the fixture manifest programmatically, recipe file included.
pub fn services_manifest(dir: &Path) -> Manifest {
    write_recipe_file(dir);

    let coordinate: Coordinate = "user/stable".parse().unwrap();

    Manifest::builder(dir)
        .require(Requirement::new("gtest", Version::new(1, 14, 0)))
        .require(Requirement::new("libcurl", Version::new(8, 8, 0)))
        .require(Requirement::new("poco", Version::new(1, 13, 2)))
        .require(Requirement::new("grpc", Version::new(1, 54, 3)))
        .require(Requirement::new("openssl", Version::new(3, 2, 1)))
        .require(
            Requirement::new("libp11", Version::new(0, 4, 11)).with_coordinate(coordinate.clone()),
        )
        .build_require(Requirement::new("protobuf", Version::new(3, 21, 12)))
        .build_require(Requirement::new("grpc", Version::new(1, 54, 3)))
        .build_require(Requirement::new("gtest", Version::new(1, 14, 0)))
        .local_recipe(LocalRecipe::new(
            "libp11",
            Version::new(0, 4, 11),
            "libp11-recipe.py",
            coordinate,
        ))
        .override_option(OptionOverride::toggle("openssl", "no_dso", false))
        .override_option(OptionOverride::toggle("openssl", "shared", true))
        .finish()
        .unwrap()
}
