// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Offline reconstruction of a node's state from its files.

use anyhow::{bail, Context};
use std::path::Path;

use hidra_controller::config::ControllerConfig;
use hidra_controller::journal::JournalEntry;
use hidra_controller::replay::replay_onto;
use hidra_controller::snapshot::decode::decode_state;
use hidra_controller::state::controller::ControllerState;
use hidra_node::journal::read_journal;

pub struct Loaded {
    pub state: ControllerState,
    pub entries: Vec<JournalEntry>,
    /// Journal entries applied on top of the base state.
    pub applied: usize,
    pub torn_tail: u64,
}

/// Replays `journal_path` (optionally on top of a snapshot) up to sequence `at`.
pub fn load(journal_path: &Path, snapshot_path: Option<&Path>, at: Option<u64>) -> anyhow::Result<Loaded> {
    let contents = read_journal(journal_path)
        .with_context(|| format!("reading journal {}", journal_path.display()))?;

    let mut state = match snapshot_path {
        Some(path) => {
            let bytes = std::fs::read(path).with_context(|| format!("reading snapshot {}", path.display()))?;
            decode_state(&bytes).with_context(|| format!("decoding snapshot {}", path.display()))?
        }
        None => ControllerState::with_config(ControllerConfig::default()),
    };

    let mut entries = contents.entries;
    if let Some(at) = at {
        if at < state.version() {
            bail!("cannot rewind to {}: snapshot is already at v{}", at, state.version());
        }
        entries.truncate(at as usize);
    }

    let applied = replay_onto(&mut state, &entries).context("replaying journal")?;
    Ok(Loaded {
        state,
        entries,
        applied,
        torn_tail: contents.torn_tail,
    })
}
