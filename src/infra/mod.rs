// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concrete collaborators the application layer talks to
// through the domain traits, plus the file outputs of a run:
//
//   tracking.rs  — Experiment tracking session
//                  Records parameters, metrics and artifacts
//                  for one run and writes them as run.json.
//
//   metrics.rs   — Accuracy, confusion matrix, metrics file
//
//   plot.rs      — Confusion matrix heatmap as PNG
//
//   artifacts.rs — Fitted pipeline persistence
//                  One gzip JSON file per run, UUID-named.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling)

/// Experiment tracking session and run records
pub mod tracking;

/// Evaluation metrics and metrics file
pub mod metrics;

/// Confusion matrix plotting
pub mod plot;

/// Model artifact save/load
pub mod artifacts;
