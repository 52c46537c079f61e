// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Command Journal as Primary Truth
//!
//! Every accepted command is recorded together with its caller and the controller version
//! it produced. Rejected commands are never journaled.
//!
//! # Invariants
//! - `sequence` starts at 1 and increases by exactly one per entry
//! - Same journal => same final state and hash
//! - Entries are immutable once appended

use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, Result};
use crate::state::command::{Command, Outcome};
use crate::state::controller::ControllerState;
use crate::types::Address;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Controller version after this entry was applied.
    pub sequence: u64,
    pub caller: Address,
    pub command: Command,
}

impl JournalEntry {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ControllerError::Corrupted(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (entry, read) = bincode::serde::decode_from_slice::<JournalEntry, _>(bytes, bincode::config::standard())
            .map_err(|e| ControllerError::Corrupted(e.to_string()))?;
        if read != bytes.len() {
            return Err(ControllerError::Corrupted(format!(
                "{} trailing bytes after journal entry",
                bytes.len() - read
            )));
        }
        Ok(entry)
    }
}

/// In-memory journal paired with the state it describes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `command` to `state` and journals it when accepted.
    pub fn submit(&mut self, state: &mut ControllerState, caller: Address, command: Command) -> Result<Outcome> {
        let outcome = state.apply(caller, &command)?;
        self.entries.push(JournalEntry {
            sequence: state.version(),
            caller,
            command,
        });
        Ok(outcome)
    }

    pub fn push(&mut self, entry: JournalEntry) -> Result<()> {
        let expected = self.last_sequence() + 1;
        if entry.sequence != expected {
            return Err(ControllerError::Corrupted(format!(
                "journal sequence {} does not follow {}",
                entry.sequence,
                expected - 1
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_sequence(&self) -> u64 {
        self.entries.last().map(|e| e.sequence).unwrap_or(0)
    }
}
