// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence and reporting:
//
//   artifact.rs - model artifact store
//                 Weights via Burn's CompactRecorder, plus the
//                 training config and the label mapping as JSON.
//                 One writer (the trainer), many readers (every
//                 predict invocation); last writer wins.
//
//   history.rs  - per-epoch metrics record and CSV export
//
//   report.rs   - loss/accuracy chart rendering (plotters)

/// Model artifact persistence
pub mod artifact;

/// Training metrics record and CSV log
pub mod history;

/// Training history chart
pub mod report;
