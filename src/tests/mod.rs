pub mod election_tests;
pub mod determinism_tests;

use crate::state::controller::ControllerState;
use crate::types::{Address, Score};

/// The three accounts the reference scenario registers as nodes.
pub fn node_accounts() -> [Address; 3] {
    [
        "0x539022a255e26C16A3F9C252aa5e50503AF554cc".parse().unwrap(),
        "0xDb4BfC458422121bf3195BDAAf562f74aD44fd5F".parse().unwrap(),
        "0x1f4E2b1E2fB6d5bB4a1F6E3d51aA71b1b42dC0c9".parse().unwrap(),
    ]
}

/// Never registered; only ever scored and voted for.
pub fn outside_candidate() -> Address {
    "0xaCD0d6aBF6D2Bef65c55b8AdFD3f3e9942b7C257".parse().unwrap()
}

pub fn score(target: Address, value: i64) -> Score {
    Score::new(target, value)
}

/// Controller with `n` nodes registered under "SPECS" and one application.
pub fn registered(n: u64) -> (ControllerState, Vec<Address>) {
    let mut state = ControllerState::new();
    let nodes: Vec<Address> = (1..=n).map(Address::from_low_u64).collect();
    for node in &nodes {
        state.register_node(*node, "SPECS").unwrap();
    }
    state
        .register_application(nodes[0], "APP_INFO", vec!["CTR_INFO".into()], false)
        .unwrap();
    (state, nodes)
}
