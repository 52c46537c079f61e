// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod events;
pub mod inspect;
pub mod replay;
pub mod verify;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    use hidra_controller::journal::JournalEntry;
    use hidra_controller::state::command::Command;
    use hidra_controller::state::controller::ControllerState;
    use hidra_controller::types::{Address, ApplicationId, EventId};
    use hidra_node::journal::JournalWriter;

    /// Journals a solved event with three nodes and returns (journal path, final state).
    pub fn solved_journal(dir: &Path) -> (PathBuf, ControllerState) {
        let path = dir.join("hidra.journal");
        let (mut writer, _) = JournalWriter::open(&path).unwrap();
        let mut state = ControllerState::new();
        let nodes: Vec<Address> = (1..=3).map(Address::from_low_u64).collect();
        let candidate = Address::from_low_u64(99);

        let mut commands: Vec<(Address, Command)> = nodes
            .iter()
            .map(|n| (*n, Command::RegisterNode { spec: "SPECS".into() }))
            .collect();
        commands.push((nodes[0], Command::RegisterApplication {
            info: "APP_INFO".into(),
            required_specs: vec![],
            multi_reply_allowed: false,
        }));
        commands.push((nodes[0], Command::SendEvent { payload: "EVENT".into(), application_id: ApplicationId(1) }));
        commands.push((nodes[0], Command::VoteSolver { event_id: EventId(1), candidate }));
        commands.push((nodes[1], Command::VoteSolver { event_id: EventId(1), candidate }));
        commands.push((nodes[2], Command::SolveEvent { event_id: EventId(1) }));

        for (caller, command) in commands {
            state.apply(caller, &command).unwrap();
            writer
                .append(&JournalEntry { sequence: state.version(), caller, command })
                .unwrap();
        }
        (path, state)
    }
}
