//! Deterministic Replay Logic.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

use crate::config::ControllerConfig;
use crate::error::{ControllerError, Result};
use crate::journal::JournalEntry;
use crate::state::controller::ControllerState;
use crate::verify::state_hash;

/// Re-applies `entries` on top of `state`.
///
/// Entries at or below the current version are skipped (already covered by a snapshot);
/// the rest must continue the sequence without gaps and must all apply cleanly. A journal
/// only ever holds accepted commands, so a rejection here means the journal and the base
/// state do not belong together.
///
/// Returns the number of entries applied.
pub fn replay_onto<'a, I>(state: &mut ControllerState, entries: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut applied = 0;
    for entry in entries {
        if entry.sequence <= state.version() {
            continue;
        }
        let expected = state.version() + 1;
        if entry.sequence != expected {
            return Err(ControllerError::Corrupted(format!(
                "journal jumps from {} to {}",
                state.version(),
                entry.sequence
            )));
        }
        state.apply(entry.caller, &entry.command).map_err(|e| {
            ControllerError::Corrupted(format!(
                "entry {} ({}) no longer applies: {}",
                entry.sequence,
                entry.command.name(),
                e
            ))
        })?;
        applied += 1;
    }
    Ok(applied)
}

/// Rebuilds a fresh controller from a full journal.
pub fn replay<'a, I>(config: ControllerConfig, entries: I) -> Result<ControllerState>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut state = ControllerState::with_config(config);
    replay_onto(&mut state, entries)?;
    Ok(state)
}

/// Replays a journal on top of an optional base snapshot and returns the final state hash.
pub fn replay_and_hash<'a, I>(
    config: ControllerConfig,
    snapshot_bytes: &[u8],
    entries: I,
) -> Result<[u8; 32]>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut state = if snapshot_bytes.is_empty() {
        ControllerState::with_config(config)
    } else {
        crate::snapshot::decode::decode_state(snapshot_bytes)?
    };
    replay_onto(&mut state, entries)?;
    state_hash(&state)
}
