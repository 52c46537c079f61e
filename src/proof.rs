//! Deterministic Proof Structures.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::journal::JournalEntry;
use crate::state::controller::ControllerState;
use crate::verify::{journal_hash, state_hash};

/// A receipt that a specific journal produces a specific controller state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateProof {
    pub protocol_version: u32,
    /// Controller version (number of accepted commands).
    pub version: u64,
    /// BLAKE3 chain over the journal entries.
    pub journal_hash: [u8; 32],
    /// BLAKE3 hash of the resulting state.
    pub state_hash: [u8; 32],
}

impl StateProof {
    pub fn new(state: &ControllerState, entries: &[JournalEntry]) -> Result<Self> {
        Ok(Self {
            protocol_version: crate::config::PROTOCOL_VERSION,
            version: state.version(),
            journal_hash: journal_hash(entries)?,
            state_hash: state_hash(state)?,
        })
    }

    /// Replays `entries` from scratch and checks they reproduce this proof.
    pub fn verify(&self, config: ControllerConfig, entries: &[JournalEntry]) -> Result<bool> {
        let replayed = crate::replay::replay(config, entries)?;
        Ok(replayed.version() == self.version
            && state_hash(&replayed)? == self.state_hash
            && journal_hash(entries)? == self.journal_hash)
    }
}
