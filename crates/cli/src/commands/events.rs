// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use hidra_controller::protocol::election::quorum;

use crate::load::load;

/// Lists every event of the replayed state with its resolution progress.
pub fn run(journal_path: &Path, snapshot_path: Option<&Path>, at: Option<u64>) -> anyhow::Result<()> {
    let loaded = load(journal_path, snapshot_path, at)?;
    let state = &loaded.state;
    let needed = quorum(state.node_count());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "App", "State", "Replies", "Votes", "Solver", "Leader"]);

    for event in state.events().iter() {
        let solver = event
            .elected_solver()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let leader = hidra_controller::protocol::reputation::leader(event)
            .map(|s| format!("{} ({})", s.address, s.total))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            event.id.to_string(),
            event.application_id.to_string(),
            event.state().to_string(),
            event.reply_count().to_string(),
            format!("{}/{}", event.vote_count(), needed),
            solver,
            leader,
        ]);
    }

    println!("\nEvents at v{}\n", state.version());
    println!("{table}\n");
    Ok(())
}
