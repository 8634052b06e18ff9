// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads a saved model artifact and labels new texts with it.
//
//   artifact (.json.gz) ──load──▶ FittedPipeline ──predict──▶ labels
//
// Nothing is tracked or written; this is a read-only use case.

use std::path::Path;

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::Label;
use crate::infra::artifacts::ArtifactStore;
use crate::ml::pipeline::FittedPipeline;

pub struct PredictUseCase {
    pipeline: FittedPipeline,
}

impl PredictUseCase {
    pub fn new(artifact: impl AsRef<Path>) -> Result<Self> {
        let artifact = artifact.as_ref();
        let pipeline = ArtifactStore::load(artifact)?;
        tracing::info!(
            "Loaded model '{}' ({} vocabulary terms)",
            artifact.display(),
            pipeline.vectorizer.vocabulary_size()
        );
        Ok(Self { pipeline })
    }

    /// One label per input text, in input order.
    pub fn predict(&self, texts: &[String]) -> Result<Vec<Label>> {
        if texts.is_empty() {
            return Err(TrainerError::Configuration("no texts given to classify".to_string()));
        }
        self.pipeline.predict(texts)
    }
}
