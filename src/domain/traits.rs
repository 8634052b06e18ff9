// ============================================================
// Layer 3 — Collaborator Traits
// ============================================================
// The training workflow talks to three outside systems:
//
//   ExperimentTracker → records params, metrics and artifacts
//   DatasetStore      → hands out a local copy of a dataset
//   ConfusionPlotter  → draws the confusion matrix image
//
// The runner only ever sees these traits. The binary wires in
// the JSON-file tracker, the local dataset store and the
// plotters-based plotter; tests wire in in-memory fakes so a
// runner can be built without any live session.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::Result;
use crate::domain::sample::Label;

// ─── ExperimentTracker ────────────────────────────────────────────────────────
/// A live tracking run. Acquired before the runner is built and
/// released by whoever acquired it, never by the runner.
pub trait ExperimentTracker {
    /// Register one named parameter
    fn set_parameter(&mut self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Register a nested configuration bundle under a section name
    fn connect(&mut self, section: &str, bundle: serde_json::Value) -> Result<()>;

    /// Report a summary scalar (one value per run)
    fn report_single_value(&mut self, name: &str, value: f64) -> Result<()>;

    /// Report a point on a titled time series
    fn report_scalar(&mut self, title: &str, series: &str, value: f64, iteration: u64) -> Result<()>;

    /// Attach a file produced by the run
    fn register_artifact(&mut self, name: &str, path: &Path) -> Result<()>;
}

// ─── DatasetStore ─────────────────────────────────────────────────────────────
/// Identifies a versioned dataset in a dataset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub project: String,
    pub name:    String,
    pub alias:   String,
}

impl Default for DatasetRef {
    fn default() -> Self {
        Self {
            project: "sarcasm_detector".to_string(),
            name:    "sarcasm_dataset".to_string(),
            alias:   "sarcasm_dataset".to_string(),
        }
    }
}

/// Anything that can materialise a dataset on the local filesystem.
pub trait DatasetStore {
    /// Return a directory holding the dataset's tabular files.
    /// Fails with DataUnavailable if no local copy can be produced.
    fn get_local_copy(&self, dataset: &DatasetRef) -> Result<PathBuf>;
}

// ─── ConfusionPlotter ─────────────────────────────────────────────────────────
/// Everything the plotter needs to draw one confusion matrix.
#[derive(Debug, Clone)]
pub struct ConfusionPlot<'a> {
    pub y_true:      &'a [Label],
    pub y_pred:      &'a [Label],
    pub class_names: Vec<String>,
    /// Figure size in inches (width, height)
    pub figsize:     (u32, u32),
    pub title:       String,
    pub output_path: &'a Path,
}

/// Renders a confusion matrix image to disk.
pub trait ConfusionPlotter {
    fn plot_confusion_matrix(&self, plot: &ConfusionPlot<'_>) -> Result<()>;
}
