// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs shared by every other layer.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO filesystem walks or network calls
//   - NO ML-specific code
//
// It defines what things ARE, not how they work: a labelled
// file path, the label <-> class-index bijection, the storage
// layout, and the error taxonomy.

// A file path tagged with its class label
pub mod labeled_path;

// Bijection between label strings and dense class indices
pub mod label_codec;

// Storage roots for every pipeline stage
pub mod layout;

// The pipeline error taxonomy
pub mod errors;
