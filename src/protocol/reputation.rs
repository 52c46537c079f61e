// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reputation aggregation.
//!
//! Scores flow two ways: each accepted reply credits the registered nodes it scores, and
//! per event all replies fold into a ranking of every scored address. The ranking is
//! advisory; it never gates an election or a resolution.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::event_store::Event;
use super::replies::Reply;
use crate::registry::NodeRegistry;
use crate::types::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub address: Address,
    /// Sum of the scores every author gave this address.
    pub total: i64,
    /// Distinct authors that scored it.
    pub contributors: usize,
}

/// Consensus ranking for one event: highest total first, ties by ascending address.
pub fn ranking(event: &Event) -> Vec<Standing> {
    let mut acc: FxHashMap<Address, (i64, usize)> = FxHashMap::default();
    for reply in event.replies() {
        for score in &reply.scores {
            let entry = acc.entry(score.target).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(score.value);
            entry.1 += 1;
        }
    }

    let mut out: Vec<Standing> = acc
        .into_iter()
        .map(|(address, (total, contributors))| Standing {
            address,
            total,
            contributors,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then(a.address.cmp(&b.address)));
    out
}

pub fn leader(event: &Event) -> Option<Standing> {
    ranking(event).into_iter().next()
}

/// Credits the node registry with one reply. Returns how many scores landed on
/// registered nodes.
pub(crate) fn credit_reply(nodes: &mut NodeRegistry, reply: &Reply) -> usize {
    reply
        .scores
        .iter()
        .filter(|s| nodes.adjust_reputation(&s.target, s.value))
        .count()
}
