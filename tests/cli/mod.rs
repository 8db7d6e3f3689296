//! Binary tests: exit codes and output formats.

pub mod tests_cli;
