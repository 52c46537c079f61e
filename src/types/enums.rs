// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol enums.

use core::fmt;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::id::{ApplicationId, EventId};

/// Lifecycle of an event. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventState {
    Open = 0,
    Replying = 1,
    Voting = 2,
    Solved = 3,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Open => "open",
            EventState::Replying => "replying",
            EventState::Voting => "voting",
            EventState::Solved => "solved",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EventState::Solved)
    }
}

impl Default for EventState {
    fn default() -> Self {
        EventState::Open
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `NotFound` rejection refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Node(Address),
    Application(ApplicationId),
    Event(EventId),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Node(addr) => write!(f, "node {}", addr),
            Entity::Application(id) => write!(f, "application #{}", id),
            Entity::Event(id) => write!(f, "event #{}", id),
        }
    }
}

/// Per-event actions a node may perform only once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Replied,
    Voted,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Replied => f.write_str("replied"),
            Action::Voted => f.write_str("voted"),
        }
    }
}
