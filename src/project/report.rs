//! Results of a registry run.

use std::path::PathBuf;

use serde::Serialize;
use smol_str::SmolStr;

use crate::diagnostics::Diagnostic;

/// Findings for one validated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: path.into(),
            diagnostics,
        }
    }

    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Rendered diagnostics, in order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Findings for one registered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub name: SmolStr,
    /// Schema and semantic files that were checked, in that order.
    pub files: Vec<FileReport>,
    /// Findings about the entry itself rather than one of its files.
    pub diagnostics: Vec<Diagnostic>,
}

impl EntryReport {
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty() && self.files.iter().all(FileReport::passed)
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len() + self.files.iter().map(|f| f.diagnostics.len()).sum::<usize>()
    }

    pub fn records(&self) -> Vec<EntryRecord> {
        let entry = self
            .diagnostics
            .iter()
            .map(|diagnostic| EntryRecord::new(&self.name, None, diagnostic));
        let files = self.files.iter().flat_map(|file| {
            file.diagnostics
                .iter()
                .map(|diagnostic| EntryRecord::new(&self.name, Some(file), diagnostic))
        });
        entry.chain(files).collect()
    }
}

/// All entries of a run, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<EntryReport>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.entries.iter().all(EntryReport::passed)
    }

    pub fn failed_entries(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|entry| !entry.passed())
    }

    pub fn records(&self) -> Vec<EntryRecord> {
        self.entries.iter().flat_map(EntryReport::records).collect()
    }
}

/// One finding flattened for machine consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
}

impl EntryRecord {
    fn new(name: &str, file: Option<&FileReport>, diagnostic: &Diagnostic) -> Self {
        Self {
            entity_name: name.to_string(),
            file: file.map(|file| file.path.display().to_string()),
            code: diagnostic.code(),
            line: diagnostic.line(),
            message: diagnostic.to_string(),
        }
    }
}
