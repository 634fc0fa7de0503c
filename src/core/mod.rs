//! Core data model for the manifest contract.
//!
//! The foundational types the external engine consumes:
//! - Coordinates and requirement declarations
//! - Platform axes and generators
//! - Option overrides
//! - Local recipes and the registration handle
//! - The manifest itself

pub mod coordinate;
pub mod manifest;
pub mod options;
pub mod platform;
pub mod recipe;
pub mod requirement;

pub use coordinate::Coordinate;
pub use manifest::{Manifest, ManifestError};
pub use options::{OptionOverride, OptionValue};
pub use platform::{Generator, SettingsAxis};
pub use recipe::{LocalRecipe, Registration};
pub use requirement::Requirement;
