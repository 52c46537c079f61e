// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use hidra_node::config::NodeConfig;
use hidra_node::recovery::recover;
use hidra_node::server::{build_router, SharedEngine};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    hidra_node::telemetry::init_telemetry();

    let cfg = match NodeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };
    tracing::info!("Initializing Hidra node with config: {:?}", cfg);

    // Refuse to serve a state that does not match its journal.
    let engine = match recover(&cfg) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Recovery failed: {}", e);
            std::process::exit(1);
        }
    };

    let shared_state: SharedEngine = Arc::new(Mutex::new(engine));

    if let (Some(path), Some(secs)) = (cfg.snapshot_path.clone(), cfg.auto_snapshot_interval_secs) {
        let state_clone = shared_state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(secs));
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tracing::debug!("Auto-snapshotting...");
                let mut engine = state_clone.lock().await;
                if let Err(e) = engine.save_snapshot(Some(&path)) {
                    tracing::error!("Snapshot failed: {}", e);
                }
            }
        });
    }

    let app = build_router(shared_state, cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
