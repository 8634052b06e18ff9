// ============================================================
// Layer 6 — Experiment Tracking Session
// ============================================================
// A JSON-file implementation of the ExperimentTracker trait.
//
// One session = one run. The full run record lives in memory
// while training and is flushed to disk on release:
//
//   {tracking_dir}/
//     {project}/
//       {run_id}/
//         run.json          ← params, metrics, artifacts, status
//         artifacts/        ← copies of registered files (upload on)
//
// Lifecycle:
//   TrackingSession::init(..)   → acquire (status = running)
//   session.close(status)       → release, writes run.json
//   drop without close()        → writes run.json as "aborted"
//
// Example run.json:
//   {
//     "project": "sarcasm_detector",
//     "task_name": "Sklearn Training",
//     "params": { "model": "LogisticRegression", "seed": 42, ... },
//     "single_values": { "train_runtime": 1.92, "Accuracy": 0.81 },
//     "scalars": { "Performance": { "Accuracy": [{ "iteration": 0, "value": 0.81 }] } },
//     ...
//   }
//
// Reference: serde_json crate documentation
//            Rust Book §15 (Drop trait)

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TrainerError};
use crate::domain::traits::ExperimentTracker;

/// What to open a tracking run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub project_name: String,
    pub task_name:    String,
    /// Copy registered artifacts into the run directory
    pub output_uri:   bool,
}

impl Default for TaskSpec {
    fn default() -> Self {
        Self {
            project_name: "sarcasm_detector".to_string(),
            task_name:    "Sklearn Training".to_string(),
            output_uri:   true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Aborted,
}

/// One point on a titled series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarPoint {
    pub iteration: u64,
    pub value:     f64,
}

/// An artifact registered with the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub name:        String,
    pub source_path: PathBuf,
    /// Copy inside the run directory, when uploads are enabled
    pub stored_path: Option<PathBuf>,
}

/// Everything recorded about one run; this is what run.json holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id:        String,
    pub project:       String,
    pub task_name:     String,
    pub status:        RunStatus,
    pub started_at:    DateTime<Utc>,
    pub finished_at:   Option<DateTime<Utc>>,
    pub params:        BTreeMap<String, serde_json::Value>,
    pub single_values: BTreeMap<String, f64>,
    pub scalars:       BTreeMap<String, BTreeMap<String, Vec<ScalarPoint>>>,
    pub artifacts:     Vec<ArtifactEntry>,
}

impl RunRecord {
    fn new(spec: &TaskSpec) -> Self {
        Self {
            run_id:        uuid::Uuid::new_v4().simple().to_string(),
            project:       spec.project_name.clone(),
            task_name:     spec.task_name.clone(),
            status:        RunStatus::Running,
            started_at:    Utc::now(),
            finished_at:   None,
            params:        BTreeMap::new(),
            single_values: BTreeMap::new(),
            scalars:       BTreeMap::new(),
            artifacts:     Vec::new(),
        }
    }
}

/// A live tracking run backed by a JSON file.
pub struct TrackingSession {
    run_dir:    PathBuf,
    output_uri: bool,
    record:     RunRecord,
    closed:     bool,
}

impl TrackingSession {
    /// Open a new run under `tracking_dir`.
    pub fn init(tracking_dir: impl AsRef<Path>, spec: &TaskSpec) -> Result<Self> {
        let record  = RunRecord::new(spec);
        let run_dir = tracking_dir
            .as_ref()
            .join(&spec.project_name)
            .join(&record.run_id);

        fs::create_dir_all(&run_dir).map_err(|e| TrainerError::io(&run_dir, e))?;

        tracing::info!(
            "Tracking run '{}' started for {}/{} at '{}'",
            record.run_id,
            spec.project_name,
            spec.task_name,
            run_dir.display()
        );

        Ok(Self { run_dir, output_uri: spec.output_uri, record, closed: false })
    }

    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }

    #[cfg(test)]
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    #[cfg(test)]
    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Finish the run and write run.json.
    pub fn close(mut self, status: RunStatus) -> Result<PathBuf> {
        self.closed = true;
        self.persist(status)
    }

    fn persist(&mut self, status: RunStatus) -> Result<PathBuf> {
        self.record.status      = status;
        self.record.finished_at = Some(Utc::now());

        let path = self.run_dir.join("run.json");
        let json = serde_json::to_string_pretty(&self.record)?;
        fs::write(&path, json).map_err(|e| TrainerError::io(&path, e))?;

        tracing::info!("Tracking run '{}' closed as {:?}", self.record.run_id, status);
        Ok(path)
    }

    /// Load a run.json written by a previous session
    #[cfg(test)]
    pub fn load_record(path: impl AsRef<Path>) -> Result<RunRecord> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| TrainerError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.persist(RunStatus::Aborted) {
            tracing::warn!("Could not persist aborted run '{}': {}", self.record.run_id, e);
        }
    }
}

impl ExperimentTracker for TrackingSession {
    fn set_parameter(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        tracing::debug!("param {} = {}", key, value);
        self.record.params.insert(key.to_string(), value);
        Ok(())
    }

    fn connect(&mut self, section: &str, bundle: serde_json::Value) -> Result<()> {
        let serde_json::Value::Object(fields) = bundle else {
            return Err(TrainerError::Tracking(format!(
                "configuration bundle for '{section}' must be a JSON object"
            )));
        };
        for (key, value) in fields {
            self.set_parameter(&format!("{section}/{key}"), value)?;
        }
        Ok(())
    }

    fn report_single_value(&mut self, name: &str, value: f64) -> Result<()> {
        tracing::info!("{} = {}", name, value);
        self.record.single_values.insert(name.to_string(), value);
        Ok(())
    }

    fn report_scalar(&mut self, title: &str, series: &str, value: f64, iteration: u64) -> Result<()> {
        self.record
            .scalars
            .entry(title.to_string())
            .or_default()
            .entry(series.to_string())
            .or_default()
            .push(ScalarPoint { iteration, value });
        Ok(())
    }

    fn register_artifact(&mut self, name: &str, path: &Path) -> Result<()> {
        let stored_path = if self.output_uri {
            let file_name = path.file_name().ok_or_else(|| {
                TrainerError::Tracking(format!("artifact path '{}' has no file name", path.display()))
            })?;
            let dir = self.run_dir.join("artifacts");
            fs::create_dir_all(&dir).map_err(|e| TrainerError::io(&dir, e))?;
            let target = dir.join(file_name);
            fs::copy(path, &target).map_err(|e| TrainerError::io(path, e))?;
            Some(target)
        } else {
            None
        };

        tracing::debug!("Registered artifact '{}' from '{}'", name, path.display());
        self.record.artifacts.push(ArtifactEntry {
            name:        name.to_string(),
            source_path: path.to_path_buf(),
            stored_path,
        });
        Ok(())
    }
}

// ─── In-Memory Tracker (tests) ────────────────────────────────────────────────
/// Records every call without touching disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    pub params:        BTreeMap<String, serde_json::Value>,
    pub single_values: BTreeMap<String, f64>,
    pub scalars:       Vec<(String, String, f64, u64)>,
    pub artifacts:     Vec<(String, PathBuf)>,
}

#[cfg(test)]
impl ExperimentTracker for InMemoryTracker {
    fn set_parameter(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        self.params.insert(key.to_string(), value);
        Ok(())
    }

    fn connect(&mut self, section: &str, bundle: serde_json::Value) -> Result<()> {
        self.params.insert(section.to_string(), bundle);
        Ok(())
    }

    fn report_single_value(&mut self, name: &str, value: f64) -> Result<()> {
        self.single_values.insert(name.to_string(), value);
        Ok(())
    }

    fn report_scalar(&mut self, title: &str, series: &str, value: f64, iteration: u64) -> Result<()> {
        self.scalars.push((title.to_string(), series.to_string(), value, iteration));
        Ok(())
    }

    fn register_artifact(&mut self, name: &str, path: &Path) -> Result<()> {
        self.artifacts.push((name.to_string(), path.to_path_buf()));
        Ok(())
    }
}
