//! Recipe export facility.
//!
//! Exporting publishes an out-of-registry recipe file into the engine's local
//! resolution environment under a private owner/channel coordinate. The trait
//! is the seam between the manifest and the engine: production code shells
//! out to the engine CLI, tests substitute a recording mock.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::coordinate::Coordinate;
use crate::util::process::{find_executable, ProcessBuilder};

/// Environment variable naming the engine executable, checked before PATH.
pub const ENGINE_ENV: &str = "BALLAST_ENGINE";

/// Default engine executable name looked up in PATH.
pub const DEFAULT_ENGINE: &str = "conan";

/// Error raised by a failed export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The engine executable could not be spawned at all.
    #[error("failed to invoke `{command}`: {reason}")]
    Invoke { command: String, reason: String },

    /// The engine ran and rejected the export.
    #[error("`{command}` exited with code {code:?}:\n{stderr}")]
    Rejected {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Publishes local recipes into the engine's resolution environment.
///
/// The invocation is synchronous; implementations must not return until the
/// export has either succeeded or failed. No retry or cancellation semantics
/// are defined at this layer.
pub trait RecipeExporter {
    /// Export the recipe at `recipe_path` under `coordinate`, running with
    /// `cwd` as the working directory.
    fn export(
        &self,
        recipe_path: &Path,
        coordinate: &Coordinate,
        cwd: &Path,
    ) -> Result<(), ExportError>;
}

/// Exporter that shells out to the engine CLI.
#[derive(Debug, Clone)]
pub struct CliExporter {
    program: PathBuf,
}

impl CliExporter {
    /// Use an explicit engine executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CliExporter {
            program: program.into(),
        }
    }

    /// Locate the engine executable via `BALLAST_ENGINE`, then PATH.
    pub fn discover() -> Option<Self> {
        if let Ok(program) = std::env::var(ENGINE_ENV) {
            if let Some(path) = find_executable(&program) {
                return Some(CliExporter::new(path));
            }
        }
        find_executable(DEFAULT_ENGINE).map(CliExporter::new)
    }

    /// The engine executable this exporter invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RecipeExporter for CliExporter {
    fn export(
        &self,
        recipe_path: &Path,
        coordinate: &Coordinate,
        cwd: &Path,
    ) -> Result<(), ExportError> {
        let builder = ProcessBuilder::new(&self.program)
            .arg("export")
            .arg(recipe_path)
            .args(["--user", coordinate.owner()])
            .args(["--channel", coordinate.channel()])
            .cwd(cwd);

        tracing::debug!("running `{}`", builder.display_command());

        let output = builder.exec().map_err(|err| ExportError::Invoke {
            command: builder.display_command(),
            reason: err.to_string(),
        })?;

        if !output.status.success() {
            return Err(ExportError::Rejected {
                command: builder.display_command(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
