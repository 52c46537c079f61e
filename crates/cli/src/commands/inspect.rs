// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::collections::BTreeMap;
use std::path::Path;

use hidra_controller::snapshot::decode::read_header;
use hidra_node::journal::read_journal;

/// Summarizes a journal and, optionally, a snapshot without replaying anything.
pub fn run(journal_path: &Path, snapshot_path: Option<&Path>) -> anyhow::Result<()> {
    let contents = read_journal(journal_path)?;

    let mut per_command: BTreeMap<&'static str, usize> = BTreeMap::new();
    for entry in &contents.entries {
        *per_command.entry(entry.command.name()).or_insert(0) += 1;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Component", "Status", "Details"]);

    table.add_row(vec![
        "Journal".to_string(),
        if contents.torn_tail > 0 { "TORN TAIL" } else { "OK" }.to_string(),
        format!(
            "{} entries, {} bytes valid, {} bytes torn",
            contents.entries.len(),
            contents.valid_len,
            contents.torn_tail
        ),
    ]);
    for (name, count) in &per_command {
        table.add_row(vec![format!("  {}", name), String::new(), count.to_string()]);
    }

    if let Some(path) = snapshot_path {
        let bytes = std::fs::read(path)?;
        let row = match read_header(&bytes) {
            Ok(header) => {
                let status = if header.version <= contents.entries.len() as u64 { "OK" } else { "AHEAD OF JOURNAL" };
                vec![
                    "Snapshot".to_string(),
                    status.to_string(),
                    format!("format {}, v{}, {} byte body", header.format, header.version, header.body_len),
                ]
            }
            Err(e) => vec!["Snapshot".to_string(), "INVALID".to_string(), e.to_string()],
        };
        table.add_row(row);
    }

    println!("\nHidra Inspection\n");
    println!("{table}\n");
    Ok(())
}
