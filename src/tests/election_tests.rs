// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::registered;
use crate::protocol::election::quorum;
use crate::types::{Address, ApplicationId, EventState};

#[test]
fn quorum_votes_elect_and_solve_exactly_once() {
    for n in 1..=7u64 {
        let (mut state, nodes) = registered(n);
        let ev = state.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();
        let cand = Address::from_low_u64(1000);
        let needed = quorum(n as usize);

        for (i, voter) in nodes.iter().take(needed).enumerate() {
            assert_eq!(state.elected_solver(ev).unwrap(), None, "n={} before vote {}", n, i);
            state.vote_solver(*voter, ev, cand).unwrap();
        }
        assert_eq!(state.elected_solver(ev).unwrap(), Some(cand), "n={}", n);

        state.solve_event(nodes[0], ev).unwrap();
        assert_eq!(state.event_state(ev).unwrap(), EventState::Solved);
        assert!(state.solve_event(nodes[0], ev).is_err());
    }
}

#[test]
fn late_registrations_raise_the_bar() {
    let (mut state, nodes) = registered(3);
    let ev = state.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();
    let cand = Address::from_low_u64(1000);
    state.vote_solver(nodes[0], ev, cand).unwrap();

    // Two more nodes: 5 registered, quorum is now 3.
    for i in 10..12 {
        state.register_node(Address::from_low_u64(i), "SPECS").unwrap();
    }
    state.vote_solver(nodes[1], ev, cand).unwrap();
    assert_eq!(state.elected_solver(ev).unwrap(), None);
    state.vote_solver(nodes[2], ev, cand).unwrap();
    assert_eq!(state.elected_solver(ev).unwrap(), Some(cand));
}

#[test]
fn tally_reports_every_candidate() {
    let (mut state, nodes) = registered(5);
    let ev = state.send_event(nodes[0], "EVENT", ApplicationId(1)).unwrap();
    let (x, y) = (Address::from_low_u64(500), Address::from_low_u64(600));
    state.vote_solver(nodes[0], ev, y).unwrap();
    state.vote_solver(nodes[1], ev, x).unwrap();
    state.vote_solver(nodes[2], ev, y).unwrap();

    assert_eq!(state.tally(ev).unwrap(), vec![(y, 2), (x, 1)]);
    assert_eq!(state.elected_solver(ev).unwrap(), None);
}
