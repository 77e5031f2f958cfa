// ============================================================
// Layer 1 — HTTP Server (Presentation)
// ============================================================
// The warp route tree for the prediction API. Like the CLI,
// this layer only translates between the outside world and the
// application: it parses bodies, calls the bundle's single
// inference path, and shapes the JSON responses. No ML code.
//
// Routes:
//   GET  /         → liveness text (doubles as a health check)
//   POST /predict  → classify one JSON record
//
// Everything else (bad JSON, wrong method, unknown path) is
// shaped by handle_rejection so clients always see the same
// {"error": ...} body.

pub mod routes;

pub use routes::{api_routes, handle_rejection};
