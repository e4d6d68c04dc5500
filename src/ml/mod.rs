// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn-specific model code lives here. The architecture and
// the optimizer are library building blocks; this layer wires
// them together and never reimplements them.
//
//   model.rs     - the LeNet-style convolutional classifier
//                  (conv/pool stacks, linear head, CE loss)
//
//   trainer.rs   - the epoch loop
//                  augmented batch drawing, forward, backward,
//                  Adam step, validation metrics, artifact save
//
//   predictor.rs - single-image inference
//                  artifact load, canonical preprocess, softmax,
//                  argmax to (label, confidence)

/// Convolutional classifier architecture
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Single-image inference over a persisted artifact
pub mod predictor;
