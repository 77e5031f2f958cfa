// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence that doesn't belong to any single
// business layer:
//
//   artifact.rs — Saving and loading the model directory.
//                 Three files per training run:
//                   model.bin     — bincode of the ModelBundle
//                   metadata.json — human-readable feature schema
//                   metrics.json  — held-out evaluation report
//
// Why is this a separate layer?
//   Training writes artifacts, serving and the predict CLI read
//   them. Keeping the file formats and paths in one place means
//   the writers and readers cannot drift apart, and swapping
//   local files for object storage later touches one module.

/// Model artifact saving and loading
pub mod artifact;
