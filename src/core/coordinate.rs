//! Owner/channel coordinates for locally-registered recipes.
//!
//! A coordinate disambiguates a recipe exported into the local resolution
//! environment from registry-published packages of the same name. It is
//! rendered and parsed as `owner/channel`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A private `(owner, channel)` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    owner: String,
    channel: String,
}

/// Error parsing a coordinate from its textual form.
#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("malformed coordinate `{0}`, expected `owner/channel`")]
    Malformed(String),

    #[error("coordinate `{0}` has an empty owner or channel")]
    EmptySegment(String),
}

impl Coordinate {
    /// Create a coordinate from owner and channel segments.
    pub fn new(owner: impl Into<String>, channel: impl Into<String>) -> Result<Self, CoordinateError> {
        let owner = owner.into();
        let channel = channel.into();
        if owner.is_empty() || channel.is_empty() {
            return Err(CoordinateError::EmptySegment(format!("{owner}/{channel}")));
        }
        Ok(Coordinate { owner, channel })
    }

    /// Get the owner segment.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the channel segment.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.channel)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, channel) = s
            .split_once('/')
            .ok_or_else(|| CoordinateError::Malformed(s.to_string()))?;
        if channel.contains('/') {
            return Err(CoordinateError::Malformed(s.to_string()));
        }
        Coordinate::new(owner, channel)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = CoordinateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coordinate> for String {
    fn from(c: Coordinate) -> String {
        c.to_string()
    }
}
