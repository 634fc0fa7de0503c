//! Pass error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::manifest::ManifestError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error aborting a resolution pass.
///
/// A pass has no local recovery: the first failure surfaces unchanged and the
/// pass produces nothing.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum PassError {
    /// A manifest operation failed (registration, listing, validation).
    #[error(transparent)]
    #[diagnostic(code(ballast::pass::manifest))]
    Manifest(#[from] ManifestError),

    /// An option override targets a package absent from the runtime list.
    #[error("option override `{package}:{option}` targets an undeclared dependency")]
    #[diagnostic(
        code(ballast::pass::undeclared_override),
        help("declare `{package}` in `requires` or remove the override")
    )]
    UndeclaredOverride { package: String, option: String },
}

impl PassError {
    /// Convert to a user-facing fatal diagnostic naming the failed step.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PassError::Manifest(err) => {
                let mut diag = Diagnostic::error(err.to_string());
                match err {
                    ManifestError::RecipeNotFound { path, .. } => {
                        diag = diag
                            .with_context("registration step failed before any export ran")
                            .with_location(path.clone())
                            .with_suggestion(suggestions::RECIPE_NOT_FOUND.to_string());
                    }
                    ManifestError::ExportFailed { source, .. } => {
                        diag = diag
                            .with_context("registration step failed; no requirements were listed")
                            .with_context(source.to_string())
                            .with_suggestion(suggestions::EXPORT_REJECTED.to_string());
                    }
                    ManifestError::UnregisteredCoordinate { .. } => {
                        diag = diag.with_context(
                            "requirement listing ran without a covering registration",
                        );
                    }
                    _ => {
                        diag = diag.with_context("manifest declarations failed validation");
                    }
                }
                diag
            }

            PassError::UndeclaredOverride { package, option } => {
                Diagnostic::error(format!(
                    "option override `{package}:{option}` targets an undeclared dependency"
                ))
                .with_context("overrides apply only to packages in the runtime requirement list")
                .with_suggestion(format!("Declare `{package}` in `requires`"))
                .with_suggestion(format!("Remove the `{package}:{option}` override"))
            }
        }
    }
}
