// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// This is the heart of the application — pure Rust structs
// and traits that define the core concepts of the system.
//
// Rules for this layer:
//   - NO warp / tokio / ndarray types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain structs, enums, and traits (serde derives allowed)
//
// Why keep this layer pure?
//   - Easy to unit test (no server, no dataset needed)
//   - Easy to understand (no framework noise)
//   - Easy to swap implementations (just implement the trait)
//
// Think of this layer as the "dictionary" of the system —
// it defines what things ARE, not how they work.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The feature schema: names, kinds, target, class labels
pub mod schema;

// One input observation (a row of clinical attributes)
pub mod record;

// The output of the classifier: label + probability vector
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
