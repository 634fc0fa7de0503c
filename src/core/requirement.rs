//! Requirement declarations.
//!
//! A Requirement names one package the component needs, at an exact version,
//! optionally pinned to a private owner/channel coordinate for packages that
//! are exported locally rather than published to a registry. The same type
//! serves both the runtime list and the build-tool list; which list an entry
//! belongs to is decided by the manifest, never by the entry itself.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::coordinate::{Coordinate, CoordinateError};

/// A single dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Package name
    name: String,

    /// Exact version
    version: Version,

    /// Private coordinate for locally-exported packages
    coordinate: Option<Coordinate>,
}

/// Error parsing a requirement from its `name/version[@owner/channel]` form.
#[derive(Debug, Error)]
pub enum RequirementError {
    #[error("malformed requirement `{0}`, expected `name/version` or `name/version@owner/channel`")]
    Malformed(String),

    #[error("requirement `{reference}` has an invalid version: {source}")]
    InvalidVersion {
        reference: String,
        #[source]
        source: semver::Error,
    },

    #[error("requirement `{reference}` has an invalid coordinate")]
    InvalidCoordinate {
        reference: String,
        #[source]
        source: CoordinateError,
    },
}

impl Requirement {
    /// Create a registry requirement.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Requirement {
            name: name.into(),
            version,
            coordinate: None,
        }
    }

    /// Pin this requirement to a private coordinate.
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the exact version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the private coordinate, if any.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    /// Check whether this requirement references a locally-exported package.
    pub fn is_local(&self) -> bool {
        self.coordinate.is_some()
    }

    /// The full textual reference, e.g. `libp11/0.4.11@user/stable`.
    pub fn reference(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let Some(ref coord) = self.coordinate {
            write!(f, "@{coord}")?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, coord) = match s.split_once('@') {
            Some((body, coord)) => (body, Some(coord)),
            None => (s, None),
        };

        let (name, version) = body
            .split_once('/')
            .ok_or_else(|| RequirementError::Malformed(s.to_string()))?;
        if name.is_empty() || version.contains('/') {
            return Err(RequirementError::Malformed(s.to_string()));
        }

        let version: Version = version
            .parse()
            .map_err(|source| RequirementError::InvalidVersion {
                reference: s.to_string(),
                source,
            })?;

        let coordinate = coord
            .map(|c| c.parse())
            .transpose()
            .map_err(|source| RequirementError::InvalidCoordinate {
                reference: s.to_string(),
                source,
            })?;

        Ok(Requirement {
            name: name.to_string(),
            version,
            coordinate,
        })
    }
}

/// Requirement as it appears in the TOML declaration file.
///
/// Either a bare reference string (`"gtest/1.14.0"`) or a detailed table
/// (`{ name = "libp11", version = "0.4.11", coordinate = "user/stable" }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementSpec {
    /// Bare reference string
    Reference(String),

    /// Detailed specification
    Detailed(DetailedRequirementSpec),
}

/// Detailed requirement specification.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailedRequirementSpec {
    /// Package name
    pub name: String,

    /// Exact version
    pub version: String,

    /// Private coordinate
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

impl RequirementSpec {
    /// Convert to a Requirement.
    pub fn to_requirement(&self) -> Result<Requirement, RequirementError> {
        match self {
            RequirementSpec::Reference(reference) => reference.parse(),
            RequirementSpec::Detailed(spec) => {
                let version: Version =
                    spec.version
                        .parse()
                        .map_err(|source| RequirementError::InvalidVersion {
                            reference: format!("{}/{}", spec.name, spec.version),
                            source,
                        })?;
                let mut req = Requirement::new(spec.name.clone(), version);
                if let Some(ref coordinate) = spec.coordinate {
                    req = req.with_coordinate(coordinate.clone());
                }
                Ok(req)
            }
        }
    }
}
