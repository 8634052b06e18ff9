// ============================================================
// Layer 5 — ML Layer
// ============================================================
// All feature extraction and model math lives here. This is
// the only layer that imports burn.
//
//   vectorizer.rs — TF-IDF over word unigrams + bigrams
//   model.rs      — softmax logistic regression as a burn Module
//   trainer.rs    — full-batch fit loop and prediction
//   pipeline.rs   — vectorizer + estimator recipe and its fitted form
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// TF-IDF feature extraction
pub mod vectorizer;

/// Logistic regression module
pub mod model;

/// Fit loop and fitted classifier
pub mod trainer;

/// Pipeline recipe and fitted pipeline
pub mod pipeline;
