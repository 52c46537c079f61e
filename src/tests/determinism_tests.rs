// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{outside_candidate, registered, score};
use crate::journal::Journal;
use crate::proof::StateProof;
use crate::state::command::Command;
use crate::state::controller::ControllerState;
use crate::types::{Address, ApplicationId, EventId};
use crate::verify::state_hash;

#[test]
fn independent_instances_hash_identically() {
    let build = || {
        let (mut state, nodes) = registered(4);
        let ev = state.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();
        // Submit in different author orders; maps keep the state canonical.
        state.send_reply(nodes[3], ev, vec![score(nodes[0], 1)]).unwrap();
        state.send_reply(nodes[1], ev, vec![score(nodes[0], 1)]).unwrap();
        state
    };
    assert_eq!(state_hash(&build()).unwrap(), state_hash(&build()).unwrap());
    assert_ne!(state_hash(&build()).unwrap(), state_hash(&ControllerState::new()).unwrap());
}

#[test]
fn submission_order_is_visible_in_hash() {
    let (mut a, nodes) = registered(3);
    let mut b = a.clone();
    let ev = a.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();
    b.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();

    a.send_reply(nodes[0], ev, vec![]).unwrap();
    a.send_reply(nodes[1], ev, vec![]).unwrap();
    b.send_reply(nodes[1], ev, vec![]).unwrap();
    b.send_reply(nodes[0], ev, vec![]).unwrap();

    // Same replies, different logical timestamps.
    assert_ne!(state_hash(&a).unwrap(), state_hash(&b).unwrap());
}

#[test]
fn proof_verifies_against_replay() {
    let mut state = ControllerState::new();
    let mut journal = Journal::new();
    let nodes: Vec<Address> = (1..=3).map(Address::from_low_u64).collect();
    for n in &nodes {
        journal.submit(&mut state, *n, Command::RegisterNode { spec: "SPECS".into() }).unwrap();
    }
    journal
        .submit(&mut state, nodes[0], Command::RegisterApplication {
            info: "APP".into(),
            required_specs: vec!["CTR".into()],
            multi_reply_allowed: false,
        })
        .unwrap();
    journal
        .submit(&mut state, nodes[1], Command::SendEvent { payload: "EVENT".into(), application_id: ApplicationId(1) })
        .unwrap();
    journal
        .submit(&mut state, nodes[1], Command::VoteSolver { event_id: EventId(1), candidate: outside_candidate() })
        .unwrap();

    let proof = StateProof::new(&state, journal.entries()).unwrap();
    assert_eq!(proof.version, 6);
    assert!(proof.verify(state.config().clone(), journal.entries()).unwrap());
    assert!(!proof.verify(state.config().clone(), &journal.entries()[..5]).unwrap());
}
