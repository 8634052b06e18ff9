// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Resolves a dataset to a local directory and reads every file
// in it as a CSV source of (text, label) rows.
//
// CSV layout (header row is always skipped):
//   headline,is_sarcastic
//   "thirtysomething scientists unveil doomsday clock",1
//   "dem rep. totally nails why congress is falling short",0
//
// Only column positions matter: column 0 is the text, column 1
// is the label. Extra columns are ignored.
//
// Files are read in file-name order so the concatenated dataset
// (and therefore the prefix split) is the same on every machine.
// A single malformed file aborts the whole load.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::{Label, LabeledText};
use crate::domain::traits::{DatasetRef, DatasetStore};

/// Dataset store backed by a directory tree:
///   {root}/{project}/{name}/*.csv
pub struct LocalDatasetStore {
    root: PathBuf,
}

impl LocalDatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetStore for LocalDatasetStore {
    fn get_local_copy(&self, dataset: &DatasetRef) -> Result<PathBuf> {
        let dir = self.root.join(&dataset.project).join(&dataset.name);

        if !dir.is_dir() {
            return Err(TrainerError::DataUnavailable(format!(
                "no local copy of '{}/{}' at '{}'",
                dataset.project,
                dataset.name,
                dir.display()
            )));
        }

        tracing::info!(
            "Resolved dataset '{}/{}' (alias '{}') to '{}'",
            dataset.project,
            dataset.name,
            dataset.alias,
            dir.display()
        );
        Ok(dir)
    }
}

/// Read every file in `dir` and concatenate their rows in file-name order.
pub fn load_dataset(dir: &Path) -> Result<Vec<LabeledText>> {
    let files = list_source_files(dir)?;
    if files.is_empty() {
        return Err(TrainerError::DataUnavailable(format!(
            "dataset directory '{}' contains no files",
            dir.display()
        )));
    }

    let mut rows = Vec::new();
    for path in &files {
        let file_rows = read_labeled_csv(path)?;
        tracing::debug!("Loaded {} rows from '{}'", file_rows.len(), path.display());
        rows.extend(file_rows);
    }

    tracing::info!("Loaded {} rows from {} source files", rows.len(), files.len());
    Ok(rows)
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| TrainerError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| TrainerError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse one CSV file into labelled rows.
pub fn read_labeled_csv(path: &Path) -> Result<Vec<LabeledText>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TrainerError::data_format(path, e.to_string()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;
        let record = record.map_err(|e| TrainerError::data_format(path, e.to_string()))?;

        if record.len() < 2 {
            return Err(TrainerError::data_format(
                path,
                format!("line {line}: expected (text, label) columns, found {}", record.len()),
            ));
        }

        let raw_label = &record[1];
        let label = Label::parse(raw_label).ok_or_else(|| {
            TrainerError::data_format(path, format!("line {line}: unknown label '{raw_label}'"))
        })?;

        rows.push(LabeledText::new(&record[0], label));
    }

    Ok(rows)
}
