//! Deterministic Hashing and Verification.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::{ControllerError, Result};
use crate::journal::JournalEntry;
use crate::state::controller::ControllerState;

/// BLAKE3 hash of the controller state.
///
/// Covers version, configuration, registries and every event with its replies, votes and
/// resolution. The state is made of ordered maps, so its canonical bincode encoding is
/// itself deterministic and is what gets hashed.
pub fn state_hash(state: &ControllerState) -> Result<[u8; 32]> {
    let bytes = bincode::serde::encode_to_vec(state, bincode::config::standard())
        .map_err(|e| ControllerError::Corrupted(e.to_string()))?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(&crate::config::PROTOCOL_VERSION.to_le_bytes());
    hasher.update(&bytes);
    Ok(*hasher.finalize().as_bytes())
}

/// Incremental form of [`journal_hash`], for writers that see entries one at a time.
#[derive(Clone, Debug, Default)]
pub struct JournalHasher {
    hasher: blake3::Hasher,
}

impl JournalHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, entry: &JournalEntry) -> Result<()> {
        let bytes = entry.encode()?;
        self.hasher.update(&entry.sequence.to_le_bytes());
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(&bytes);
        Ok(())
    }

    pub fn finalize(&self) -> [u8; 32] {
        *self.hasher.finalize().as_bytes()
    }
}

/// Chained hash over journal entries in order.
pub fn journal_hash<'a, I>(entries: I) -> Result<[u8; 32]>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut hasher = JournalHasher::new();
    for entry in entries {
        hasher.update(entry)?;
    }
    Ok(hasher.finalize())
}

pub fn snapshot_hash(snapshot_bytes: &[u8]) -> [u8; 32] {
    blake3::hash(snapshot_bytes).into()
}
