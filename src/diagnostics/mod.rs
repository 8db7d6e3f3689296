//! Diagnostics: findings pinned to source lines.
//!
//! A [`ValidationError`] only knows the path it was raised at. The
//! [`resolver`] turns it into a [`Diagnostic`] by looking that path up in the
//! document it came from:
//!
//! ```text
//! type_mismatch [columns.id.type]: Type mismatch for column 'id': ... at line 12
//! missing_field [columns]: missing required field `columns` at or near line 1
//! source_not_found [source.schema.x]: Source `schema.x` not found: ... (line unknown)
//! ```

pub mod resolver;

use std::fmt;

use crate::check::{ErrorCategory, ErrorKind, ValidationError};

pub use resolver::LocationResolver;

// ============================================================================
// LOCATION
// ============================================================================

/// Where in the source a finding was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The addressed key or item itself.
    Exact(u32),
    /// The nearest ancestor that exists, or the entity line.
    Approximate(u32),
    Unknown,
}

impl Location {
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Exact(line) | Self::Approximate(line) => Some(*line),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(line) => write!(f, "at line {line}"),
            Self::Approximate(line) => write!(f, "at or near line {line}"),
            Self::Unknown => f.write_str("(line unknown)"),
        }
    }
}

// ============================================================================
// DIAGNOSTIC
// ============================================================================

/// A finding with its resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: ValidationError,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(error: ValidationError, location: Location) -> Self {
        Self { error, location }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    /// Stable code of the finding (e.g. `E0301`).
    pub fn code(&self) -> &'static str {
        self.error.kind.code()
    }

    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }

    pub fn line(&self) -> Option<u32> {
        self.location.line()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.error, self.location)
    }
}
