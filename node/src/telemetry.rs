// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "hidra_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => {
            tracing::error!("Failed to install Prometheus recorder: {}", e);
            return;
        }
    }

    metrics::describe_counter!("hidra_commands_applied_total", "Commands journaled and applied, by command");
    metrics::describe_counter!("hidra_commands_rejected_total", "Commands rejected by validation, by command");
    metrics::describe_counter!("hidra_events_solved_total", "Events finalized");
    metrics::describe_histogram!("hidra_command_duration_seconds", "Time to validate, journal and apply a command");
    metrics::describe_gauge!("hidra_snapshot_size_bytes", "Size of the last saved snapshot in bytes");
    metrics::describe_counter!("hidra_proofs_generated_total", "State proofs served");
    metrics::describe_histogram!("hidra_replay_duration_seconds", "Time taken to recover from snapshot and journal");

    metrics::gauge!("hidra_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
