// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dispatched events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::replies::Reply;
use super::resolver::Resolution;
use crate::types::{Address, ApplicationId, EventId, EventState, Version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub application_id: ApplicationId,
    /// Opaque, caller-encoded event description.
    pub payload: String,
    pub sender: Address,
    pub created_at: Version,
    pub(crate) replies: BTreeMap<Address, Reply>,
    /// voter -> candidate
    pub(crate) votes: BTreeMap<Address, Address>,
    pub(crate) elected_solver: Option<Address>,
    pub(crate) resolution: Option<Resolution>,
}

impl Event {
    pub fn new(
        id: EventId,
        application_id: ApplicationId,
        payload: String,
        sender: Address,
        created_at: Version,
    ) -> Self {
        Self {
            id,
            application_id,
            payload,
            sender,
            created_at,
            replies: BTreeMap::new(),
            votes: BTreeMap::new(),
            elected_solver: None,
            resolution: None,
        }
    }

    /// Derived from what has been recorded; never stored.
    pub fn state(&self) -> EventState {
        if self.resolution.is_some() {
            EventState::Solved
        } else if !self.votes.is_empty() {
            EventState::Voting
        } else if !self.replies.is_empty() {
            EventState::Replying
        } else {
            EventState::Open
        }
    }

    pub fn is_solved(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn reply(&self, author: &Address) -> Option<&Reply> {
        self.replies.get(author)
    }

    /// Replies in author address order.
    pub fn replies(&self) -> impl Iterator<Item = &Reply> {
        self.replies.values()
    }

    /// Replies in the order they were accepted.
    pub fn replies_in_order(&self) -> Vec<&Reply> {
        let mut out: Vec<&Reply> = self.replies.values().collect();
        out.sort_by_key(|r| r.submitted_at);
        out
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    pub fn has_replied(&self, author: &Address) -> bool {
        self.replies.contains_key(author)
    }

    pub fn vote_of(&self, voter: &Address) -> Option<&Address> {
        self.votes.get(voter)
    }

    /// (voter, candidate) pairs in voter address order.
    pub fn votes(&self) -> impl Iterator<Item = (&Address, &Address)> {
        self.votes.iter()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.votes.contains_key(voter)
    }

    pub fn elected_solver(&self) -> Option<Address> {
        self.elected_solver
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStore {
    events: BTreeMap<EventId, Event>,
    last_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next event will receive. Ids are dense and start at 1.
    pub fn next_id(&self) -> EventId {
        EventId(self.last_id + 1)
    }

    pub fn create(
        &mut self,
        application_id: ApplicationId,
        payload: String,
        sender: Address,
        at: Version,
    ) -> EventId {
        let id = self.next_id();
        self.last_id = id.0;
        self.events
            .insert(id, Event::new(id, application_id, payload, sender, at));
        id
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Events bound to one application, in id order.
    pub fn for_application(&self, application_id: ApplicationId) -> impl Iterator<Item = &Event> {
        self.events
            .values()
            .filter(move |e| e.application_id == application_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_is_open() {
        let mut store = EventStore::new();
        let id = store.create(ApplicationId(1), "EVENT".into(), Address::from_low_u64(1), Version(3));
        assert_eq!(id, EventId(1));
        let event = store.get(id).unwrap();
        assert_eq!(event.state(), EventState::Open);
        assert_eq!(event.reply_count(), 0);
        assert_eq!(event.elected_solver(), None);
        assert_eq!(store.next_id(), EventId(2));
    }
}
