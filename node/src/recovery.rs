// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Crash Recovery
//!
//! The journal is canonical truth. A snapshot, when present, only shortens the replay:
//! entries at or below its version are hashed but not re-applied.

use std::path::Path;
use std::time::Instant;

use hidra_controller::replay::replay_onto;
use hidra_controller::snapshot::decode::decode_state;
use hidra_controller::state::controller::ControllerState;
use hidra_controller::verify::JournalHasher;

use crate::config::NodeConfig;
use crate::engine::Engine;
use crate::errors::EngineError;
use crate::journal::JournalWriter;

/// Builds the engine the node will serve from whatever is on disk.
pub fn recover(cfg: &NodeConfig) -> Result<Engine, EngineError> {
    let start = Instant::now();

    let base = match cfg.snapshot_path.as_deref() {
        Some(path) if path.exists() => Some(load_snapshot(path)?),
        _ => None,
    };
    if let Some(state) = &base {
        if state.config() != &cfg.controller {
            tracing::warn!(
                "Snapshot was taken under a different controller config; keeping the snapshot's"
            );
        }
    }

    let Some(journal_path) = cfg.journal_path.as_deref() else {
        let state = base.unwrap_or_else(|| ControllerState::with_config(cfg.controller.clone()));
        if state.version() > 0 {
            tracing::warn!("Running without a journal; state v{} has no replayable history", state.version());
        }
        return Ok(Engine::from_parts(state, None, JournalHasher::new(), cfg.snapshot_path.clone()));
    };

    let (writer, contents) = JournalWriter::open(journal_path)?;
    tracing::info!("Journal {:?} holds {} entries", journal_path, contents.entries.len());

    let mut state = base.unwrap_or_else(|| ControllerState::with_config(cfg.controller.clone()));
    if state.version() > writer.last_sequence() {
        return Err(EngineError::InvalidInput(format!(
            "snapshot is at v{} but the journal ends at {}",
            state.version(),
            writer.last_sequence()
        )));
    }

    let mut hasher = JournalHasher::new();
    for entry in &contents.entries {
        hasher.update(entry)?;
    }
    let applied = replay_onto(&mut state, &contents.entries)?;
    state.check_invariants()?;

    metrics::histogram!("hidra_replay_duration_seconds", start.elapsed().as_secs_f64());
    tracing::info!("Recovered state v{} ({} entries replayed)", state.version(), applied);

    Ok(Engine::from_parts(state, Some(writer), hasher, cfg.snapshot_path.clone()))
}

fn load_snapshot(path: &Path) -> Result<ControllerState, EngineError> {
    tracing::info!("Found snapshot at {:?}. Loading...", path);
    let data = std::fs::read(path)?;
    let state = decode_state(&data)?;
    tracing::info!("Snapshot restored at v{}", state.version());
    Ok(state)
}
