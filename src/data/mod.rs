// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "which dataset?" and "train/test rows":
//
//   DatasetStore      → local directory for (project, name)
//       │
//       ▼
//   load_dataset      → every CSV file, concatenated by file name
//       │
//       ▼
//   split_train_test  → truncate to subset, 90/10 prefix cut
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Local dataset store and CSV reading
pub mod loader;

/// Truncation and order-preserving train/test split
pub mod splitter;
