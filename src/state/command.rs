// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Controller Command enum definitions.

use serde::{Deserialize, Serialize};

use crate::types::{Address, ApplicationId, EventId, Score};

/// Every state transition of the controller. The caller is supplied alongside the
/// command by the host environment and is not part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    RegisterNode {
        spec: String,
    },
    RegisterApplication {
        info: String,
        required_specs: Vec<String>,
        multi_reply_allowed: bool,
    },
    SendEvent {
        payload: String,
        application_id: ApplicationId,
    },
    SendReply {
        event_id: EventId,
        scores: Vec<Score>,
    },
    VoteSolver {
        event_id: EventId,
        candidate: Address,
    },
    SolveEvent {
        event_id: EventId,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::RegisterNode { .. } => "registerNode",
            Command::RegisterApplication { .. } => "registerApplication",
            Command::SendEvent { .. } => "sendEvent",
            Command::SendReply { .. } => "sendReply",
            Command::VoteSolver { .. } => "voteSolver",
            Command::SolveEvent { .. } => "solveEvent",
        }
    }

    /// The event this command targets, if any.
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Command::SendReply { event_id, .. }
            | Command::VoteSolver { event_id, .. }
            | Command::SolveEvent { event_id } => Some(*event_id),
            _ => None,
        }
    }
}

/// What an accepted command produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    NodeRegistered { created: bool },
    ApplicationRegistered(ApplicationId),
    EventSent(EventId),
    /// `credited` is how many scores landed on registered nodes.
    ReplyRecorded { credited: usize },
    VoteRecorded { elected: Option<Address> },
    EventSolved { solver: Address },
}
