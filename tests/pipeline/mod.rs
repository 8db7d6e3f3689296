//! End-to-end pipeline tests
//!
//! Files on disk go through loading, structural checks, cross checks and
//! line resolution exactly as the CLI runs them.

pub mod tests_properties;
pub mod tests_registry;
pub mod tests_schema_pipeline;
pub mod tests_semantic_pipeline;
