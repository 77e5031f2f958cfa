// ============================================================
// Layer 2 — ServeUseCase
// ============================================================
// Brings the prediction API up:
//
//   Step 1: Load the model bundle ONCE  (Layer 6 - infra)
//   Step 2: Build the warp route tree   (Layer 1 - server)
//   Step 3: Bind and run on a tokio     (ambient)
//           runtime until killed
//
// The rest of the binary is synchronous, so the runtime is
// created here rather than with #[tokio::main]: only serving
// needs async at all.

use anyhow::{anyhow, Context, Result};
use std::net::IpAddr;
use std::sync::Arc;
use warp::Filter;

use crate::infra::artifact::ArtifactStore;
use crate::server;

/// Where to listen and which model to load.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub model_dir: String,
    pub host:      String,
    pub port:      u16,
}

pub struct ServeUseCase {
    config: ServeConfig,
}

impl ServeUseCase {
    pub fn new(config: ServeConfig) -> Self {
        Self { config }
    }

    /// Load the artifacts and run the server. Blocks until the
    /// process is killed.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the model once, before binding ──────────────────────
        // A server that cannot load its model should fail at
        // startup, not on the first request.
        let store = ArtifactStore::new(&cfg.model_dir);
        let bundle = Arc::new(store.load_bundle()?);
        tracing::info!(
            "Model ready: {} features, {} classes, {} trees",
            bundle.schema.n_features(),
            bundle.schema.n_classes(),
            bundle.forest.n_trees()
        );

        // ── Step 2: Build the routes ─────────────────────────────────────────
        let routes = server::api_routes(bundle).recover(server::handle_rejection);

        let bind_addr: IpAddr = cfg
            .host
            .parse()
            .map_err(|e| anyhow!("Invalid bind address '{}': {}", cfg.host, e))?;

        // ── Step 3: Run until killed ─────────────────────────────────────────
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Cannot start the tokio runtime")?;

        tracing::info!("Server listening on {}:{}", cfg.host, cfg.port);
        runtime.block_on(async {
            warp::serve(routes).run((bind_addr, cfg.port)).await;
        });

        Ok(())
    }
}
