// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::{Path, PathBuf};
use std::time::Instant;

use hidra_controller::journal::JournalEntry;
use hidra_controller::proof::StateProof;
use hidra_controller::snapshot::encode::encode_state;
use hidra_controller::state::command::{Command, Outcome};
use hidra_controller::state::controller::ControllerState;
use hidra_controller::types::Address;
use hidra_controller::verify::{snapshot_hash, state_hash, JournalHasher};

use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::journal::JournalWriter;

/// Single-writer service core: the controller state plus its durable journal.
///
/// Commands are validated against the state, journaled, and only then applied, so the
/// in-memory state never holds a command the journal does not.
pub struct Engine {
    state: ControllerState,
    journal: Option<JournalWriter>,
    journal_hasher: JournalHasher,
    snapshot_path: Option<PathBuf>,
    current_snapshot_hash: Option<[u8; 32]>,
}

impl Engine {
    /// Empty, journal-less engine.
    pub fn new(cfg: &NodeConfig) -> Self {
        Self {
            state: ControllerState::with_config(cfg.controller.clone()),
            journal: None,
            journal_hasher: JournalHasher::new(),
            snapshot_path: cfg.snapshot_path.clone(),
            current_snapshot_hash: None,
        }
    }

    /// Engine over a recovered state. `journal_hasher` must already cover every entry
    /// that produced `state`.
    pub fn from_parts(
        state: ControllerState,
        journal: Option<JournalWriter>,
        journal_hasher: JournalHasher,
        snapshot_path: Option<PathBuf>,
    ) -> Self {
        Self {
            state,
            journal,
            journal_hasher,
            snapshot_path,
            current_snapshot_hash: None,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn journal_path(&self) -> Option<&Path> {
        self.journal.as_ref().map(|j| j.path())
    }

    /// Runs one command for `caller`.
    pub fn submit(&mut self, caller: Address, command: Command) -> Result<Outcome, EngineError> {
        let start = Instant::now();
        let name = command.name();

        if let Err(e) = self.state.check(caller, &command) {
            tracing::warn!("{} from {} rejected: {}", name, caller, e);
            metrics::increment_counter!("hidra_commands_rejected_total", "command" => name);
            return Err(e.into());
        }

        let entry = JournalEntry {
            sequence: self.state.version() + 1,
            caller,
            command,
        };
        if let Some(journal) = self.journal.as_mut() {
            journal.append(&entry)?;
        }

        // Checked above against the same state; a failure here means the journal now
        // holds an entry memory does not.
        let outcome = self.state.apply(caller, &entry.command).map_err(|e| {
            tracing::error!("journaled {} #{} failed to apply: {}", name, entry.sequence, e);
            EngineError::Internal
        })?;
        self.journal_hasher.update(&entry)?;

        metrics::increment_counter!("hidra_commands_applied_total", "command" => name);
        metrics::histogram!("hidra_command_duration_seconds", start.elapsed().as_secs_f64());
        self.log_outcome(caller, &entry.command, &outcome);

        Ok(outcome)
    }

    fn log_outcome(&self, caller: Address, command: &Command, outcome: &Outcome) {
        let event = command.event_id().map(|id| id.to_string()).unwrap_or_default();
        match outcome {
            Outcome::NodeRegistered { created } => {
                tracing::info!("node {} registered (new: {})", caller, created);
            }
            Outcome::ApplicationRegistered(id) => {
                tracing::info!("application #{} registered by {}", id, caller);
            }
            Outcome::EventSent(id) => tracing::info!("event #{} sent by {}", id, caller),
            Outcome::ReplyRecorded { credited } => {
                tracing::debug!(
                    "reply from {} on event #{} ({} scores credited)",
                    caller,
                    event,
                    credited
                );
            }
            Outcome::VoteRecorded { elected } => {
                if let Some(solver) = elected {
                    tracing::info!("solver {} elected for event #{}", solver, event);
                }
            }
            Outcome::EventSolved { solver } => {
                metrics::increment_counter!("hidra_events_solved_total");
                tracing::info!("event #{} solved by {} (solver {})", event, caller, solver);
            }
        }
    }

    /// Writes a snapshot to `path_override` or the configured path.
    ///
    /// Written to a sibling temp file first, then renamed into place.
    pub fn save_snapshot(&mut self, path_override: Option<&Path>) -> Result<PathBuf, EngineError> {
        let path = path_override
            .or(self.snapshot_path.as_deref())
            .ok_or_else(|| EngineError::InvalidInput("No snapshot path configured".to_string()))?
            .to_path_buf();

        let bytes = encode_state(&self.state)?;
        let tmp = path.with_extension("tmp");
        {
            use std::io::Write;
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &path)?;

        self.current_snapshot_hash = Some(snapshot_hash(&bytes));
        metrics::gauge!("hidra_snapshot_size_bytes", bytes.len() as f64);
        tracing::info!("snapshot v{} ({} bytes) saved to {:?}", self.state.version(), bytes.len(), path);

        Ok(path)
    }

    pub fn current_snapshot_hash(&self) -> Option<[u8; 32]> {
        self.current_snapshot_hash
    }

    pub fn proof(&self) -> Result<StateProof, EngineError> {
        let state_hash = state_hash(&self.state)?;
        metrics::increment_counter!("hidra_proofs_generated_total");
        Ok(StateProof {
            protocol_version: hidra_controller::config::PROTOCOL_VERSION,
            version: self.state.version(),
            journal_hash: self.journal_hasher.finalize(),
            state_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidra_controller::error::ControllerError;
    use hidra_controller::types::ApplicationId;
    use hidra_controller::verify::journal_hash;

    #[test]
    fn rejected_commands_leave_no_trace() {
        let mut engine = Engine::new(&NodeConfig::default());
        let caller = Address::from_low_u64(1);
        let before = engine.proof().unwrap();

        let err = engine
            .submit(caller, Command::SendEvent { payload: "EVENT".into(), application_id: ApplicationId(4) })
            .unwrap_err();
        assert!(matches!(err, EngineError::Controller(ControllerError::NotFound(_))));
        assert_eq!(engine.proof().unwrap(), before);
    }

    #[test]
    fn proof_tracks_submitted_commands() {
        let mut engine = Engine::new(&NodeConfig::default());
        let mut entries = Vec::new();
        for i in 1..=3 {
            let caller = Address::from_low_u64(i);
            let command = Command::RegisterNode { spec: "SPECS".into() };
            engine.submit(caller, command.clone()).unwrap();
            entries.push(JournalEntry { sequence: i, caller, command });
        }

        let proof = engine.proof().unwrap();
        assert_eq!(proof.version, 3);
        assert_eq!(proof.journal_hash, journal_hash(&entries).unwrap());
        assert!(proof.verify(NodeConfig::default().controller, &entries).unwrap());
    }

    #[test]
    fn snapshot_requires_a_path() {
        let mut engine = Engine::new(&NodeConfig::default());
        assert!(matches!(engine.save_snapshot(None), Err(EngineError::InvalidInput(_))));
    }
}
