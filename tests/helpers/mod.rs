//! Shared fixtures and registry builders for integration tests.

pub mod fixtures;
pub mod registry_helpers;
