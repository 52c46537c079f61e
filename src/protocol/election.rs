// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Solver election.
//!
//! Registered nodes vote once per event for a candidate address. The first candidate to
//! hold a strict majority of the registered node count is elected; the choice is final
//! even if later votes would change the tally.

use rustc_hash::FxHashMap;

use super::event_store::Event;
use crate::config::ControllerConfig;
use crate::error::{ControllerError, Result};
use crate::registry::NodeRegistry;
use crate::types::{Action, Address, Entity};

/// Votes a candidate needs when `registered` nodes may vote.
pub fn quorum(registered: usize) -> usize {
    registered / 2 + 1
}

pub fn check_vote(
    config: &ControllerConfig,
    nodes: &NodeRegistry,
    event: &Event,
    voter: &Address,
) -> Result<()> {
    if event.is_solved() {
        return Err(ControllerError::InvalidState(format!(
            "event #{} is already solved",
            event.id
        )));
    }
    if !nodes.contains(voter) {
        return Err(ControllerError::NotFound(Entity::Node(*voter)));
    }
    if event.has_voted(voter) {
        return Err(ControllerError::AlreadyDone(Action::Voted));
    }
    if event.reply_count() < config.min_replies_before_vote {
        return Err(ControllerError::InvalidState(format!(
            "event #{} has {} replies, {} required before voting",
            event.id,
            event.reply_count(),
            config.min_replies_before_vote
        )));
    }
    Ok(())
}

pub fn votes_for(event: &Event, candidate: &Address) -> usize {
    event.votes().filter(|(_, c)| *c == candidate).count()
}

/// (candidate, votes) sorted by votes descending, then address ascending.
pub fn tally(event: &Event) -> Vec<(Address, usize)> {
    let mut counts: FxHashMap<Address, usize> = FxHashMap::default();
    for (_, candidate) in event.votes() {
        *counts.entry(*candidate).or_insert(0) += 1;
    }
    let mut out: Vec<(Address, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}

/// Records a vote and returns the solver if this vote elected one.
pub(crate) fn record_vote(
    event: &mut Event,
    voter: Address,
    candidate: Address,
    registered: usize,
) -> Option<Address> {
    event.votes.insert(voter, candidate);
    if event.elected_solver.is_some() {
        return None;
    }
    if votes_for(event, &candidate) >= quorum(registered) {
        event.elected_solver = Some(candidate);
        return Some(candidate);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationId, EventId, Version};

    #[test]
    fn quorum_is_strict_majority() {
        assert_eq!(quorum(1), 1);
        assert_eq!(quorum(2), 2);
        assert_eq!(quorum(3), 2);
        assert_eq!(quorum(4), 3);
        assert_eq!(quorum(5), 3);
    }

    #[test]
    fn first_majority_is_final() {
        let mut event = Event::new(EventId(1), ApplicationId(1), "E".into(), Address::ZERO, Version(1));
        let (x, y) = (Address::from_low_u64(100), Address::from_low_u64(200));

        assert_eq!(record_vote(&mut event, Address::from_low_u64(1), x, 3), None);
        assert_eq!(record_vote(&mut event, Address::from_low_u64(2), x, 3), Some(x));
        assert_eq!(record_vote(&mut event, Address::from_low_u64(3), y, 3), None);

        assert_eq!(event.elected_solver(), Some(x));
        assert_eq!(tally(&event), vec![(x, 2), (y, 1)]);
    }

    #[test]
    fn split_vote_elects_nobody() {
        let mut event = Event::new(EventId(1), ApplicationId(1), "E".into(), Address::ZERO, Version(1));
        for i in 1..=4u64 {
            let candidate = Address::from_low_u64(100 + (i % 2));
            assert_eq!(record_vote(&mut event, Address::from_low_u64(i), candidate, 4), None);
        }
        assert_eq!(event.elected_solver(), None);
    }
}
