// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what a training run is about:
// labels, rows, model kinds, errors and the traits the outside
// world has to implement.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O or network calls
//   - Only structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Error taxonomy shared by every layer
pub mod error;

/// Supported classifier families
pub mod model_kind;

/// Labels and labelled text rows
pub mod sample;

/// Tracker, dataset store and plotter abstractions
pub mod traits;
