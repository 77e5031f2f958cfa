// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal per use case: training, serving, or a one-shot
// prediction.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file-format knowledge (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.

// The training workflow: CSV → split → fit → evaluate → save
pub mod train_use_case;

// The serving workflow: load artifacts once, run the HTTP API
pub mod serve_use_case;

// The one-shot inference workflow (CLI analog of POST /predict)
pub mod predict_use_case;
