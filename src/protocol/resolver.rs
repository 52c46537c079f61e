// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event resolution.

use serde::{Deserialize, Serialize};

use super::election::{quorum, tally};
use super::event_store::Event;
use super::reputation::{ranking, Standing};
use crate::config::{ControllerConfig, SolveAuthority};
use crate::error::{ControllerError, Result};
use crate::registry::NodeRegistry;
use crate::types::{Address, Version};

/// Final record of a solved event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub solver: Address,
    pub solved_by: Address,
    pub solved_at: Version,
    /// Reputation ranking frozen at resolution time.
    pub standings: Vec<Standing>,
}

/// Validates a finalize request and returns the solver it would record.
pub fn check_solve(
    config: &ControllerConfig,
    nodes: &NodeRegistry,
    event: &Event,
    caller: &Address,
) -> Result<Address> {
    if event.is_solved() {
        return Err(ControllerError::InvalidState(format!(
            "event #{} is already solved",
            event.id
        )));
    }

    let solver = match event.elected_solver() {
        Some(solver) => solver,
        None => {
            let best = tally(event).first().map(|(_, n)| *n).unwrap_or(0);
            return Err(ControllerError::InvalidState(format!(
                "event #{} has no elected solver ({} of {} votes)",
                event.id,
                best,
                quorum(nodes.len())
            )));
        }
    };

    let allowed = match config.solve_authority {
        SolveAuthority::AnyAccount => true,
        SolveAuthority::RegisteredNode => nodes.contains(caller),
        SolveAuthority::ElectedSolver => *caller == solver,
    };
    if !allowed {
        return Err(ControllerError::InvalidState(format!(
            "{} may not solve event #{} (authority: {})",
            caller,
            event.id,
            config.solve_authority.as_str()
        )));
    }

    Ok(solver)
}

pub(crate) fn resolve(event: &mut Event, solver: Address, caller: Address, at: Version) -> &Resolution {
    let standings = ranking(event);
    event.resolution.get_or_insert(Resolution {
        solver,
        solved_by: caller,
        solved_at: at,
        standings,
    })
}
