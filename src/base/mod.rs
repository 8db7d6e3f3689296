//! Foundation types for the metacheck toolchain.
//!
//! This module provides fundamental types used throughout the validator:
//! - [`LineIndex`] - Byte offset to 1-based line conversion
//! - [`layout`] - Registry directory conventions (`schema/`, `ddl/`, `semantics/`)
//! - Domain constants (file extensions, the selector wildcard)
//!
//! This module has NO dependencies on other metacheck modules.

pub mod constants;
pub mod layout;
mod position;

pub use position::LineIndex;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
