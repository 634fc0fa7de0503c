//! Resolution pass driver.
//!
//! Plays the external engine's side of the manifest contract: query platform
//! metadata, register local recipes, list both requirement sets, then apply
//! option overrides. The steps run in that fixed order, single-threaded, with
//! no retries; the first failure aborts the pass. Each call to `run_pass` is
//! a fresh pass — the manifest keeps no state between them, so concurrent or
//! repeated passes re-register local recipes on their own.

pub mod errors;

pub use errors::PassError;

use crate::core::manifest::Manifest;
use crate::core::options::OptionOverride;
use crate::core::platform::{Generator, SettingsAxis};
use crate::core::requirement::Requirement;
use crate::export::RecipeExporter;

/// The final, unambiguous build configuration a pass produces.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Settings axes the engine must bind before building
    pub settings: Vec<SettingsAxis>,

    /// Descriptors the engine must generate
    pub generators: Vec<Generator>,

    /// Runtime requirements, in declaration order
    pub requirements: Vec<Requirement>,

    /// Build-tool requirements, in declaration order
    pub build_requirements: Vec<Requirement>,

    /// Validated option overrides, to apply before the targets build
    pub overrides: Vec<OptionOverride>,
}

impl ResolvedConfig {
    /// The overrides targeting one dependency.
    pub fn overrides_for(&self, package: &str) -> Vec<&OptionOverride> {
        self.overrides
            .iter()
            .filter(|ov| ov.package() == package)
            .collect()
    }
}

/// Run one resolution pass over a manifest.
///
/// Ordering contract: local recipes are registered before the runtime list is
/// produced, and overrides are validated only after both lists are known.
/// Every override must target a package in the runtime requirement list; an
/// override on an absent package is an error, never silently dropped.
pub fn run_pass(
    manifest: &Manifest,
    exporter: &dyn RecipeExporter,
) -> Result<ResolvedConfig, PassError> {
    tracing::debug!("starting resolution pass");

    let settings = manifest.settings().to_vec();
    let generators = manifest.generators().to_vec();

    let registration = manifest.register_local_recipes(exporter)?;
    let requirements = manifest.requirements(&registration)?;
    let build_requirements = manifest.build_requirements().to_vec();

    for override_ in manifest.option_overrides() {
        let declared = requirements
            .iter()
            .any(|req| req.name() == override_.package());
        if !declared {
            return Err(PassError::UndeclaredOverride {
                package: override_.package().to_string(),
                option: override_.option().to_string(),
            });
        }
    }

    tracing::info!(
        "pass resolved: {} requirements, {} build requirements, {} overrides",
        requirements.len(),
        build_requirements.len(),
        manifest.option_overrides().len()
    );

    Ok(ResolvedConfig {
        settings,
        generators,
        requirements,
        build_requirements,
        overrides: manifest.option_overrides().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{OptionOverride, OptionValue};
    use crate::core::requirement::Requirement;
    use crate::test_support::{services_manifest, RecordingExporter};
    use semver::Version;
    use tempfile::TempDir;

    #[test]
    fn test_full_pass_over_fixed_declarations() {
        let tmp = TempDir::new().unwrap();
        let manifest = services_manifest(tmp.path());
        let exporter = RecordingExporter::new();

        let config = run_pass(&manifest, &exporter).unwrap();

        assert_eq!(config.settings.len(), 4);
        assert_eq!(config.generators.len(), 2);
        assert_eq!(config.requirements.len(), 6);
        assert_eq!(config.build_requirements.len(), 3);
        assert_eq!(config.overrides.len(), 2);

        // The local recipe was registered exactly once, before listing.
        assert_eq!(exporter.calls().len(), 1);

        // Both overrides land on the TLS library.
        let openssl = config.overrides_for("openssl");
        assert_eq!(openssl.len(), 2);
        assert!(openssl
            .iter()
            .any(|ov| ov.option() == "no_dso" && ov.value() == &OptionValue::Bool(false)));
        assert!(openssl
            .iter()
            .any(|ov| ov.option() == "shared" && ov.value() == &OptionValue::Bool(true)));
    }

    #[test]
    fn test_lists_never_leak_into_each_other() {
        let tmp = TempDir::new().unwrap();
        let manifest = services_manifest(tmp.path());
        let exporter = RecordingExporter::new();

        let config = run_pass(&manifest, &exporter).unwrap();

        // The build-only tool never shows up in the runtime list, and
        // runtime-only libraries never show up in the build list. Names like
        // grpc and gtest recur across contexts as distinct declarations.
        assert!(!config.requirements.iter().any(|r| r.name() == "protobuf"));
        for runtime_only in ["libcurl", "poco", "openssl", "libp11"] {
            assert!(!config
                .build_requirements
                .iter()
                .any(|r| r.name() == runtime_only));
        }

        // Each list is duplicate-free within itself.
        for list in [&config.requirements, &config.build_requirements] {
            let names: std::collections::HashSet<_> = list.iter().map(|r| r.name()).collect();
            assert_eq!(names.len(), list.len());
        }
    }

    #[test]
    fn test_undeclared_override_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let manifest = Manifest::builder(tmp.path())
            .require(Requirement::new("libcurl", Version::new(8, 8, 0)))
            .override_option(OptionOverride::toggle("openssl", "shared", true))
            .finish()
            .unwrap();
        let exporter = RecordingExporter::new();

        let err = run_pass(&manifest, &exporter).unwrap_err();
        assert!(
            matches!(err, PassError::UndeclaredOverride { ref package, .. } if package == "openssl")
        );
    }

    #[test]
    fn test_second_pass_rejection_surfaces() {
        let tmp = TempDir::new().unwrap();
        let manifest = services_manifest(tmp.path());
        // Engine accepts the first export, rejects the re-export.
        let exporter = RecordingExporter::rejecting_after(1);

        run_pass(&manifest, &exporter).unwrap();
        let err = run_pass(&manifest, &exporter).unwrap_err();

        assert!(matches!(
            err,
            PassError::Manifest(crate::core::manifest::ManifestError::ExportFailed { .. })
        ));
    }

    #[test]
    fn test_failed_pass_diagnostic_names_the_step() {
        let tmp = TempDir::new().unwrap();
        let manifest = services_manifest(tmp.path());
        let exporter = RecordingExporter::rejecting();

        let err = run_pass(&manifest, &exporter).unwrap_err();
        let diag = err.to_diagnostic();
        let rendered = diag.format(false);

        assert!(rendered.contains("error:"));
        assert!(rendered.contains("registration step failed"));
    }
}
