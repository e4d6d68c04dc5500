// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// One use case per subcommand, each a thin director that tells
// the other layers what to do in what order.
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct serialisation formats here (Layer 6)
//   - Only workflow coordination

// The offline cleaning workflow
pub mod preprocess_use_case;

// The training workflow
pub mod train_use_case;

// The single-image classification workflow
pub mod predict_use_case;
