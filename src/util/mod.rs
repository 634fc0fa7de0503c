//! Shared utilities

pub mod diagnostic;
pub mod process;

pub use diagnostic::Diagnostic;
