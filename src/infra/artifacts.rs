// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// Saves and restores fitted pipelines.
//
// What gets saved per training run:
//   One gzip-compressed JSON document holding the whole
//   FittedPipeline: vocabulary, IDF weights, vectorizer
//   settings, classifier hyperparameters, and learned weights.
//
// File naming convention:
//   my_awesome_model/
//     sklearn_classifier_3f2a...-....json.gz   ← run 1
//     sklearn_classifier_9c01...-....json.gz   ← run 2
//
// A fresh v4 UUID per save means runs never overwrite each
// other's artifacts.
//
// Reference: Rust Book §9 (Error Handling)

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use uuid::Uuid;

use crate::domain::error::{Result, TrainerError};
use crate::ml::pipeline::FittedPipeline;

/// File name prefix for saved classifiers
pub const ARTIFACT_PREFIX: &str = "sklearn_classifier_";

/// Extension appended after the UUID
pub const ARTIFACT_EXT: &str = ".json.gz";

/// Writes fitted pipelines into one directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Serialise `pipeline` to a new uniquely named file and return its path.
    pub fn save(&self, pipeline: &FittedPipeline) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| TrainerError::io(&self.dir, e))?;

        let path = self
            .dir
            .join(format!("{ARTIFACT_PREFIX}{}{ARTIFACT_EXT}", Uuid::new_v4()));

        let file = File::create(&path).map_err(|e| TrainerError::io(&path, e))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, pipeline)?;

        let mut writer = encoder.finish().map_err(|e| TrainerError::io(&path, e))?;
        writer.flush().map_err(|e| TrainerError::io(&path, e))?;

        tracing::info!("Model saved to '{}'", path.display());
        Ok(path)
    }

    /// Read back an artifact written by `save`.
    pub fn load(path: &Path) -> Result<FittedPipeline> {
        let file = File::open(path).map_err(|e| {
            TrainerError::Artifact(format!("cannot open '{}': {e}", path.display()))
        })?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let pipeline = serde_json::from_reader(decoder).map_err(|e| {
            TrainerError::Artifact(format!("'{}' is not a valid model artifact: {e}", path.display()))
        })?;
        tracing::debug!("Loaded model from '{}'", path.display());
        Ok(pipeline)
    }
}
