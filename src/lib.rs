//! Ballast - a declarative build/dependency manifest for C/C++ components.
//!
//! This crate models the contract between a component's manifest and an
//! external package-resolution engine: platform settings axes and generators,
//! ordered runtime and build-tool requirement lists, option overrides, and
//! the one side-effecting step — registering locally-defined recipes under a
//! private coordinate before the requirements referencing them resolve.

pub mod core;
pub mod engine;
pub mod export;
pub mod util;

/// Test fixtures and a mock export facility for ballast unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    coordinate::Coordinate, manifest::Manifest, manifest::ManifestError,
    options::OptionOverride, options::OptionValue, platform::Generator,
    platform::SettingsAxis, recipe::LocalRecipe, recipe::Registration,
    requirement::Requirement,
};

pub use crate::engine::{run_pass, PassError, ResolvedConfig};
pub use crate::export::{CliExporter, ExportError, RecipeExporter};
