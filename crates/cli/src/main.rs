// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use hidra_cli::commands::{events, inspect, replay, verify};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hidra")]
#[command(about = "Hidra CLI - offline inspection of controller journals and snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a journal (and optionally a snapshot) without replaying it
    Inspect {
        journal_path: PathBuf,

        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Replay a journal and print the resulting state hash
    Replay {
        journal_path: PathBuf,

        /// Base snapshot; only later journal entries are applied
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Stop after this sequence number
        #[arg(long, short)]
        at: Option<u64>,

        #[arg(long)]
        json: bool,
    },
    /// List events of the replayed state
    Events {
        journal_path: PathBuf,

        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[arg(long, short)]
        at: Option<u64>,
    },
    /// Verify the integrity of a snapshot file
    Verify {
        snapshot_path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { journal_path, snapshot } => inspect::run(&journal_path, snapshot.as_deref()),
        Commands::Replay {
            journal_path,
            snapshot,
            at,
            json,
        } => replay::run(&journal_path, snapshot.as_deref(), at, json),
        Commands::Events {
            journal_path,
            snapshot,
            at,
        } => events::run(&journal_path, snapshot.as_deref(), at),
        Commands::Verify { snapshot_path } => verify::run(&snapshot_path),
    }
}
