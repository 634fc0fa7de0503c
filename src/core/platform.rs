//! Platform settings axes and generator selection.
//!
//! The manifest only names the axes the final configuration varies over;
//! binding them to concrete values (which OS, which compiler) is entirely the
//! external engine's job. Generators name the descriptor files the engine must
//! produce alongside the resolved graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A settings axis the resolved configuration varies over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsAxis {
    /// Target operating system
    Os,
    /// Compiler family and version
    Compiler,
    /// Debug/Release build type
    BuildType,
    /// CPU architecture
    Arch,
}

impl SettingsAxis {
    /// All four axes in canonical declaration order.
    pub const ALL: [SettingsAxis; 4] = [
        SettingsAxis::Os,
        SettingsAxis::Compiler,
        SettingsAxis::BuildType,
        SettingsAxis::Arch,
    ];

    /// The axis name as the engine spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsAxis::Os => "os",
            SettingsAxis::Compiler => "compiler",
            SettingsAxis::BuildType => "build_type",
            SettingsAxis::Arch => "arch",
        }
    }
}

impl fmt::Display for SettingsAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A descriptor the engine must generate alongside the resolved graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generator {
    /// Toolchain descriptor consumed by the build system
    #[serde(rename = "CMakeToolchain")]
    CmakeToolchain,
    /// Per-dependency descriptor files
    #[serde(rename = "CMakeDeps")]
    CmakeDeps,
}

impl Generator {
    /// The generator name as the engine spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Generator::CmakeToolchain => "CMakeToolchain",
            Generator::CmakeDeps => "CMakeDeps",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
