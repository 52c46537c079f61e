// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use axum::http::StatusCode;
use common::{call, router, seed, CANDIDATE, NODES};
use hidra_controller::snapshot::decode::read_header;
use hidra_controller::state::command::Command;
use hidra_controller::types::{Address, EventId};
use hidra_node::config::NodeConfig;
use hidra_node::recovery::recover;
use serde_json::json;
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> NodeConfig {
    NodeConfig {
        journal_path: Some(dir.join("hidra.journal")),
        snapshot_path: Some(dir.join("hidra.snapshot")),
        ..NodeConfig::default()
    }
}

#[tokio::test]
async fn journal_replays_to_the_same_proof() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());

    let before = {
        let app = router(recover(&cfg).unwrap(), None);
        seed(&app).await;
        let (status, _) = call(&app, "POST", "/v1/events/1/votes", Some(NODES[0]), Some(json!({"candidate": CANDIDATE}))).await;
        assert_eq!(status, StatusCode::OK);
        // Rejected: never reaches the journal.
        let (status, _) = call(&app, "POST", "/v1/events/1/votes", Some(NODES[0]), Some(json!({"candidate": CANDIDATE}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (_, proof) = call(&app, "GET", "/v1/proof/state", None, None).await;
        proof
    };
    assert_eq!(before["version"], 6);

    let app = router(recover(&cfg).unwrap(), None);
    let (_, after) = call(&app, "GET", "/v1/proof/state", None, None).await;
    assert_eq!(after["state_hash"], before["state_hash"]);
    assert_eq!(after["journal_hash"], before["journal_hash"]);

    // Recovered state keeps accepting commands where it left off.
    let (_, body) = call(&app, "POST", "/v1/events/1/votes", Some(NODES[1]), Some(json!({"candidate": CANDIDATE}))).await;
    assert_eq!(body["elected_solver"], CANDIDATE);
}

#[test]
fn snapshot_plus_journal_tail() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    let nodes: Vec<Address> = NODES.iter().map(|n| n.parse().unwrap()).collect();

    let expected = {
        let mut engine = recover(&cfg).unwrap();
        for n in &nodes {
            engine.submit(*n, Command::RegisterNode { spec: "SPECS".into() }).unwrap();
        }
        let path = engine.save_snapshot(None).unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(read_header(&bytes).unwrap().version, 3);

        engine
            .submit(nodes[0], Command::RegisterApplication {
                info: "APP_INFO".into(),
                required_specs: vec![],
                multi_reply_allowed: true,
            })
            .unwrap();
        engine.proof().unwrap()
    };

    let engine = recover(&cfg).unwrap();
    assert_eq!(engine.state().version(), 4);
    assert_eq!(engine.proof().unwrap(), expected);
}

#[test]
fn snapshot_ahead_of_journal_fails_closed() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    {
        let mut engine = recover(&cfg).unwrap();
        engine.submit(Address::from_low_u64(1), Command::RegisterNode { spec: "SPECS".into() }).unwrap();
        engine.save_snapshot(None).unwrap();
    }
    std::fs::remove_file(dir.path().join("hidra.journal")).unwrap();
    assert!(recover(&cfg).is_err());
}

#[test]
fn corrupted_journal_fails_closed() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    {
        let mut engine = recover(&cfg).unwrap();
        let caller = Address::from_low_u64(1);
        engine.submit(caller, Command::RegisterNode { spec: "SPECS".into() }).unwrap();
        engine.submit(caller, Command::RegisterNode { spec: "OTHER".into() }).unwrap();
        assert!(engine
            .submit(caller, Command::SolveEvent { event_id: EventId(1) })
            .is_err());
    }

    let path = dir.path().join("hidra.journal");
    let mut bytes = std::fs::read(&path).unwrap();
    // First payload byte of the first frame.
    bytes[16 + 16] ^= 0xff;
    std::fs::write(&path, bytes).unwrap();

    assert!(recover(&cfg).is_err());
}
