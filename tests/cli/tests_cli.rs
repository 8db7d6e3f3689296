#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};

use crate::helpers::fixtures::MOVIES_SCHEMA;
use crate::helpers::registry_helpers::{movies_registry, write_file};

fn metacheck(args: &[&str], root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_metacheck"))
        .args(args)
        .current_dir(root)
        .env_remove("RUST_LOG")
        .env_remove("METACHECK_ROOT")
        .output()
        .expect("run metacheck")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_clean_registry_exits_zero() {
    let temp = movies_registry();
    let output = metacheck(&["registry", "."], temp.path());
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).contains("2 of 2 entries passed"));
}

#[test]
fn test_schema_findings_exit_one() {
    let temp = movies_registry();
    write_file(
        temp.path(),
        "schema/movies.yaml",
        &MOVIES_SCHEMA.replace("movies.id = ratings.movie_id", "movies.id == ratings.movie_id"),
    );
    let output = metacheck(&["schema", "schema/movies.yaml"], temp.path());
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("invalid_join_condition [table_info[0].joins[0]]"));
    assert!(text.trim_end().ends_with("at line 6"));
}

#[test]
fn test_semantics_root_from_environment() {
    let temp = movies_registry();
    let output = Command::new(env!("CARGO_BIN_EXE_metacheck"))
        .args(["semantics", "semantics/movie_metrics.yaml"])
        .current_dir(temp.path())
        .env("METACHECK_ROOT", temp.path())
        .output()
        .expect("run metacheck");
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn test_json_records() {
    let temp = movies_registry();
    write_file(temp.path(), "registry.yaml", "- movies\n- ghost\n");
    let output = metacheck(&["registry", ".", "--json"], temp.path());
    assert_eq!(output.status.code(), Some(1));
    let records: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["entity_name"], "ghost");
}

#[test]
fn test_missing_manifest_exits_two() {
    let temp = tempfile::TempDir::new().unwrap();
    let output = metacheck(&["registry", "."], temp.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no manifest found"));
}
