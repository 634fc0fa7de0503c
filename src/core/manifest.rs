//! The manifest: a stateless descriptor of everything a component asks of
//! the external package-resolution engine.
//!
//! A manifest owns four fixed collections — settings axes, generators,
//! runtime requirements, build-time requirements — plus the declarations of
//! any locally-exported recipes and the option overrides applied after graph
//! resolution. It carries no state across resolution passes: every query is
//! recomputed from the same declarations, and the one side effect (recipe
//! registration) re-runs on every pass.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::options::{OptionOverride, OptionValue};
use crate::core::platform::{Generator, SettingsAxis};
use crate::core::recipe::{LocalRecipe, LocalRecipeSpec, Registration};
use crate::core::requirement::{Requirement, RequirementSpec};
use crate::export::{ExportError, RecipeExporter};

/// Error from a manifest operation or from validating its declarations.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("local recipe `{reference}` not found at {path}")]
    RecipeNotFound { reference: String, path: PathBuf },

    #[error("failed to export local recipe `{reference}`")]
    ExportFailed {
        reference: String,
        #[source]
        source: ExportError,
    },

    #[error("requirement `{reference}` references a coordinate that was not registered this pass")]
    UnregisteredCoordinate { reference: String },

    #[error("requirement `{reference}` has no matching local recipe declaration")]
    MissingLocalRecipe { reference: String },

    #[error("package `{name}` is declared twice in `{list}`")]
    DuplicateRequirement { name: String, list: &'static str },

    #[error("settings axis `{0}` is declared twice")]
    DuplicateSetting(SettingsAxis),

    #[error("generator `{0}` is declared twice")]
    DuplicateGenerator(Generator),
}

/// The declarative build/dependency manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Settings axes the final configuration varies over
    settings: Vec<SettingsAxis>,

    /// Descriptors the engine must generate
    generators: Vec<Generator>,

    /// Runtime requirements, in declaration order
    requires: Vec<Requirement>,

    /// Build-tool requirements, in declaration order
    build_requires: Vec<Requirement>,

    /// Recipes to export locally before the runtime list resolves
    local_recipes: Vec<LocalRecipe>,

    /// Forced build-time options on declared dependencies
    option_overrides: Vec<OptionOverride>,

    /// The directory containing this manifest
    manifest_dir: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    settings: Option<Vec<SettingsAxis>>,

    #[serde(default)]
    generators: Option<Vec<Generator>>,

    #[serde(default)]
    requires: Vec<RequirementSpec>,

    #[serde(default, rename = "build-requires")]
    build_requires: Vec<RequirementSpec>,

    #[serde(default, rename = "local-recipes")]
    local_recipes: Vec<LocalRecipeSpec>,

    #[serde(default)]
    options: BTreeMap<String, BTreeMap<String, OptionValue>>,
}

impl Manifest {
    /// Start building a manifest rooted at `manifest_dir`.
    ///
    /// The builder starts from the canonical axes and generators; both can be
    /// replaced before finishing.
    pub fn builder(manifest_dir: impl Into<PathBuf>) -> ManifestBuilder {
        ManifestBuilder {
            settings: SettingsAxis::ALL.to_vec(),
            generators: vec![Generator::CmakeToolchain, Generator::CmakeDeps],
            requires: Vec::new(),
            build_requires: Vec::new(),
            local_recipes: Vec::new(),
            option_overrides: Vec::new(),
            manifest_dir: manifest_dir.into(),
        }
    }

    /// Load a manifest from a TOML declaration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content. `path` is only used to locate the manifest
    /// directory, against which local recipe paths resolve.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let requires = raw
            .requires
            .iter()
            .map(RequirementSpec::to_requirement)
            .collect::<Result<Vec<_>, _>>()?;

        let build_requires = raw
            .build_requires
            .iter()
            .map(RequirementSpec::to_requirement)
            .collect::<Result<Vec<_>, _>>()?;

        let local_recipes = raw
            .local_recipes
            .into_iter()
            .map(|spec| {
                let version: semver::Version = spec.version.parse().with_context(|| {
                    format!("invalid version for local recipe `{}`", spec.package)
                })?;
                Ok(LocalRecipe::new(
                    spec.package,
                    version,
                    spec.path,
                    spec.coordinate,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        // Table iteration is alphabetical, so the override order is
        // deterministic across passes.
        let option_overrides = raw
            .options
            .into_iter()
            .flat_map(|(package, options)| {
                options.into_iter().map(move |(option, value)| {
                    OptionOverride::new(package.clone(), option, value)
                })
            })
            .collect();

        let manifest = Manifest {
            settings: raw.settings.unwrap_or_else(|| SettingsAxis::ALL.to_vec()),
            generators: raw
                .generators
                .unwrap_or_else(|| vec![Generator::CmakeToolchain, Generator::CmakeDeps]),
            requires,
            build_requires,
            local_recipes,
            option_overrides,
            manifest_dir,
        };

        manifest.validate()?;
        Ok(manifest)
    }

    /// The settings axes, in declaration order. Pure; always succeeds.
    pub fn settings(&self) -> &[SettingsAxis] {
        &self.settings
    }

    /// The generators the engine must produce. Pure; always succeeds.
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Export every declared local recipe into the engine's resolution
    /// environment and return the registration handle.
    ///
    /// Fatal on the first failure: a missing recipe file or a rejected export
    /// aborts the pass with no partial registration. Idempotence across
    /// passes is not guaranteed; a repeated export of the same coordinate is
    /// engine policy, and any rejection surfaces unchanged.
    pub fn register_local_recipes(
        &self,
        exporter: &dyn RecipeExporter,
    ) -> Result<Registration, ManifestError> {
        let mut registration = Registration::empty();

        for recipe in &self.local_recipes {
            let path = recipe.resolved_path(&self.manifest_dir);
            if !path.is_file() {
                return Err(ManifestError::RecipeNotFound {
                    reference: recipe.reference(),
                    path,
                });
            }

            tracing::info!("exporting local recipe `{}`", recipe.reference());
            exporter
                .export(&path, recipe.coordinate(), &self.manifest_dir)
                .map_err(|source| ManifestError::ExportFailed {
                    reference: recipe.reference(),
                    source,
                })?;

            registration.record(recipe.coordinate().clone());
        }

        Ok(registration)
    }

    /// The runtime requirement list, in declaration order.
    ///
    /// Requires the registration handle from this pass: any requirement
    /// pinned to a coordinate the handle does not cover fails the whole
    /// operation. No partial list is ever returned.
    pub fn requirements(
        &self,
        registration: &Registration,
    ) -> Result<Vec<Requirement>, ManifestError> {
        for req in &self.requires {
            if !registration.covers(req) {
                return Err(ManifestError::UnregisteredCoordinate {
                    reference: req.reference(),
                });
            }
        }
        Ok(self.requires.clone())
    }

    /// Register local recipes (when any runtime requirement needs them),
    /// then return the runtime requirement list.
    pub fn list_requirements(
        &self,
        exporter: &dyn RecipeExporter,
    ) -> Result<Vec<Requirement>, ManifestError> {
        let registration = if self.requires.iter().any(Requirement::is_local) {
            self.register_local_recipes(exporter)?
        } else {
            Registration::empty()
        };
        self.requirements(&registration)
    }

    /// The build-tool requirement list, in declaration order. Pure; no
    /// dependency on registration or runtime resolution.
    pub fn build_requirements(&self) -> &[Requirement] {
        &self.build_requires
    }

    /// The option overrides, applied by the engine after graph resolution.
    pub fn option_overrides(&self) -> &[OptionOverride] {
        &self.option_overrides
    }

    /// The declared local recipes.
    pub fn local_recipes(&self) -> &[LocalRecipe] {
        &self.local_recipes
    }

    /// The directory containing this manifest.
    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }

    /// Validate the declarations against each other.
    fn validate(&self) -> Result<(), ManifestError> {
        let mut seen_axes = HashSet::new();
        for axis in &self.settings {
            if !seen_axes.insert(axis) {
                return Err(ManifestError::DuplicateSetting(*axis));
            }
        }

        let mut seen_generators = HashSet::new();
        for generator in &self.generators {
            if !seen_generators.insert(generator) {
                return Err(ManifestError::DuplicateGenerator(*generator));
            }
        }

        Self::check_duplicates(&self.requires, "requires")?;
        Self::check_duplicates(&self.build_requires, "build-requires")?;

        // Every coordinate-pinned requirement needs a recipe to export.
        for req in self.requires.iter().chain(&self.build_requires) {
            if let Some(coordinate) = req.coordinate() {
                let declared = self.local_recipes.iter().any(|recipe| {
                    recipe.package() == req.name()
                        && recipe.version() == req.version()
                        && recipe.coordinate() == coordinate
                });
                if !declared {
                    return Err(ManifestError::MissingLocalRecipe {
                        reference: req.reference(),
                    });
                }
            }
        }

        for recipe in &self.local_recipes {
            let referenced = self
                .requires
                .iter()
                .chain(&self.build_requires)
                .any(|req| req.coordinate() == Some(recipe.coordinate()));
            if !referenced {
                tracing::warn!(
                    "local recipe `{}` is declared but no requirement references it",
                    recipe.reference()
                );
            }
        }

        Ok(())
    }

    fn check_duplicates(list: &[Requirement], name: &'static str) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for req in list {
            if !seen.insert(req.name()) {
                return Err(ManifestError::DuplicateRequirement {
                    name: req.name().to_string(),
                    list: name,
                });
            }
        }
        Ok(())
    }
}

/// Builder for programmatic manifest construction.
#[derive(Debug)]
pub struct ManifestBuilder {
    settings: Vec<SettingsAxis>,
    generators: Vec<Generator>,
    requires: Vec<Requirement>,
    build_requires: Vec<Requirement>,
    local_recipes: Vec<LocalRecipe>,
    option_overrides: Vec<OptionOverride>,
    manifest_dir: PathBuf,
}

impl ManifestBuilder {
    /// Replace the settings axes.
    pub fn settings(mut self, settings: impl Into<Vec<SettingsAxis>>) -> Self {
        self.settings = settings.into();
        self
    }

    /// Replace the generator set.
    pub fn generators(mut self, generators: impl Into<Vec<Generator>>) -> Self {
        self.generators = generators.into();
        self
    }

    /// Declare a runtime requirement.
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    /// Declare a build-tool requirement.
    pub fn build_require(mut self, requirement: Requirement) -> Self {
        self.build_requires.push(requirement);
        self
    }

    /// Declare a local recipe to export before resolution.
    pub fn local_recipe(mut self, recipe: LocalRecipe) -> Self {
        self.local_recipes.push(recipe);
        self
    }

    /// Force a build-time option on a declared dependency.
    pub fn override_option(mut self, override_: OptionOverride) -> Self {
        self.option_overrides.push(override_);
        self
    }

    /// Validate and finish the manifest.
    pub fn finish(self) -> Result<Manifest, ManifestError> {
        let manifest = Manifest {
            settings: self.settings,
            generators: self.generators,
            requires: self.requires,
            build_requires: self.build_requires,
            local_recipes: self.local_recipes,
            option_overrides: self.option_overrides,
            manifest_dir: self.manifest_dir,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}
