// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::Serialize;
use std::path::Path;

use hidra_controller::verify::{journal_hash, state_hash};

use crate::load::load;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ReplayReport {
    pub version: u64,
    pub applied: usize,
    pub nodes: usize,
    pub applications: usize,
    pub events: usize,
    pub journal_hash: String,
    pub state_hash: String,
}

pub fn report(journal_path: &Path, snapshot_path: Option<&Path>, at: Option<u64>) -> anyhow::Result<ReplayReport> {
    let loaded = load(journal_path, snapshot_path, at)?;
    let state = &loaded.state;
    Ok(ReplayReport {
        version: state.version(),
        applied: loaded.applied,
        nodes: state.node_count(),
        applications: state.applications().len(),
        events: state.events().len(),
        journal_hash: hex::encode(journal_hash(&loaded.entries)?),
        state_hash: hex::encode(state_hash(state)?),
    })
}

/// Replays the journal and prints the resulting state hash.
pub fn run(journal_path: &Path, snapshot_path: Option<&Path>, at: Option<u64>, json: bool) -> anyhow::Result<()> {
    let report = report(journal_path, snapshot_path, at)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\nReplayed to v{} ({} entries applied)\n", report.version, report.applied);
    println!("Nodes:         {}", report.nodes);
    println!("Applications:  {}", report.applications);
    println!("Events:        {}", report.events);
    println!("Journal Hash:  {}", report.journal_hash);
    println!("State Hash:    {}\n", report.state_hash);
    Ok(())
}
