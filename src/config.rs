// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and protocol policy.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Schema version of commands, journals and snapshots.
pub const PROTOCOL_VERSION: u32 = 1;

/// Maximum size in bytes of a capability tag or application info string.
pub const MAX_TAG_LEN: usize = 1024;

/// Maximum size in bytes of an event payload.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024;

/// Maximum number of required specs attached to one application.
pub const MAX_REQUIRED_SPECS: usize = 64;

/// Who may finalize an event once a solver is elected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolveAuthority {
    #[default]
    AnyAccount,
    RegisteredNode,
    ElectedSolver,
}

impl SolveAuthority {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveAuthority::AnyAccount => "any",
            SolveAuthority::RegisteredNode => "registered",
            SolveAuthority::ElectedSolver => "solver",
        }
    }
}

impl FromStr for SolveAuthority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_account" => Ok(SolveAuthority::AnyAccount),
            "registered" | "registered_node" => Ok(SolveAuthority::RegisteredNode),
            "solver" | "elected_solver" => Ok(SolveAuthority::ElectedSolver),
            other => Err(format!("unknown solve authority '{}'", other)),
        }
    }
}

/// Policy knobs of a controller instance. Part of the replicated state: two controllers
/// only converge on the same hash when they share the same configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub solve_authority: SolveAuthority,
    /// Replies an event needs before votes are accepted (0 disables the check).
    pub min_replies_before_vote: usize,
    pub max_tag_len: usize,
    pub max_payload_len: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            solve_authority: SolveAuthority::AnyAccount,
            min_replies_before_vote: 0,
            max_tag_len: MAX_TAG_LEN,
            max_payload_len: MAX_PAYLOAD_LEN,
        }
    }
}
