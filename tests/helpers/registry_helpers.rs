//! On-disk registry builders.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::fixtures::{MOVIE_METRICS, MOVIES_DDL, MOVIES_SCHEMA};

/// Write `text` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, text: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("relative path has a parent")).expect("create dirs");
    fs::write(&path, text).expect("write fixture");
    path
}

/// A registry holding the movies schema, its DDL and the movie metrics,
/// registered through `registry.yaml`.
pub fn movies_registry() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    write_file(temp.path(), "schema/movies.yaml", MOVIES_SCHEMA);
    write_file(temp.path(), "ddl/movies.sql", MOVIES_DDL);
    write_file(temp.path(), "semantics/movie_metrics.yaml", MOVIE_METRICS);
    write_file(
        temp.path(),
        "registry.yaml",
        "registered_yml:\n  - movies.yaml\n  - movie_metrics\n",
    );
    temp
}
