// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Controller State definition.

use serde::{Deserialize, Serialize};

use crate::config::{ControllerConfig, MAX_REQUIRED_SPECS};
use crate::error::{ControllerError, Result};
use crate::protocol::{election, replies, reputation, resolver};
use crate::protocol::{Event, EventStore, Reply, Standing};
use crate::registry::{Application, ApplicationRegistry, Node, NodeRegistry};
use crate::state::command::{Command, Outcome};
use crate::types::{Address, ApplicationId, Entity, EventId, EventState, Score, Version};

/// The whole protocol store. Each instance is independent; nothing is global.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub(crate) version: Version,
    pub(crate) config: ControllerConfig,
    pub(crate) nodes: NodeRegistry,
    pub(crate) applications: ApplicationRegistry,
    pub(crate) events: EventStore,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            version: Version(0),
            config,
            nodes: NodeRegistry::new(),
            applications: ApplicationRegistry::new(),
            events: EventStore::new(),
        }
    }

    // --- Read APIs ---

    pub fn version(&self) -> u64 {
        self.version.0
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn applications(&self) -> &ApplicationRegistry {
        &self.applications
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn node(&self, address: &Address) -> Option<&Node> {
        self.nodes.get(address)
    }

    pub fn is_node_registered(&self, address: &Address) -> bool {
        self.nodes.contains(address)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn application(&self, id: ApplicationId) -> Option<&Application> {
        self.applications.get(id)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id)
    }

    fn require_event(&self, id: EventId) -> Result<&Event> {
        self.events
            .get(id)
            .ok_or(ControllerError::NotFound(Entity::Event(id)))
    }

    pub fn event_state(&self, id: EventId) -> Result<EventState> {
        self.require_event(id).map(Event::state)
    }

    pub fn replies(&self, id: EventId) -> Result<Vec<&Reply>> {
        self.require_event(id).map(Event::replies_in_order)
    }

    pub fn has_replied(&self, id: EventId, address: &Address) -> Result<bool> {
        Ok(self.require_event(id)?.has_replied(address))
    }

    pub fn has_voted(&self, id: EventId, address: &Address) -> Result<bool> {
        Ok(self.require_event(id)?.has_voted(address))
    }

    pub fn is_event_solved(&self, id: EventId) -> Result<bool> {
        self.require_event(id).map(Event::is_solved)
    }

    pub fn elected_solver(&self, id: EventId) -> Result<Option<Address>> {
        self.require_event(id).map(Event::elected_solver)
    }

    pub fn tally(&self, id: EventId) -> Result<Vec<(Address, usize)>> {
        self.require_event(id).map(election::tally)
    }

    pub fn ranking(&self, id: EventId) -> Result<Vec<Standing>> {
        self.require_event(id).map(reputation::ranking)
    }

    /// Whether `caller` would currently succeed in solving the event.
    pub fn can_solve_event(&self, id: EventId, caller: &Address) -> bool {
        self.check(*caller, &Command::SolveEvent { event_id: id }).is_ok()
    }

    // --- Write APIs ---

    pub fn register_node(&mut self, caller: Address, spec: impl Into<String>) -> Result<()> {
        self.apply(caller, &Command::RegisterNode { spec: spec.into() })
            .map(|_| ())
    }

    pub fn register_application(
        &mut self,
        caller: Address,
        info: impl Into<String>,
        required_specs: Vec<String>,
        multi_reply_allowed: bool,
    ) -> Result<ApplicationId> {
        let cmd = Command::RegisterApplication {
            info: info.into(),
            required_specs,
            multi_reply_allowed,
        };
        match self.apply(caller, &cmd)? {
            Outcome::ApplicationRegistered(id) => Ok(id),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    pub fn send_event(
        &mut self,
        caller: Address,
        payload: impl Into<String>,
        application_id: ApplicationId,
    ) -> Result<EventId> {
        let cmd = Command::SendEvent {
            payload: payload.into(),
            application_id,
        };
        match self.apply(caller, &cmd)? {
            Outcome::EventSent(id) => Ok(id),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    pub fn send_reply(&mut self, caller: Address, event_id: EventId, scores: Vec<Score>) -> Result<()> {
        self.apply(caller, &Command::SendReply { event_id, scores })
            .map(|_| ())
    }

    pub fn vote_solver(&mut self, caller: Address, event_id: EventId, candidate: Address) -> Result<()> {
        self.apply(caller, &Command::VoteSolver { event_id, candidate })
            .map(|_| ())
    }

    pub fn solve_event(&mut self, caller: Address, event_id: EventId) -> Result<()> {
        self.apply(caller, &Command::SolveEvent { event_id })
            .map(|_| ())
    }

    // --- Write Logic ---

    /// Validates `cmd` against the current state without changing it.
    pub fn check(&self, caller: Address, cmd: &Command) -> Result<()> {
        match cmd {
            Command::RegisterNode { spec } => {
                if spec.is_empty() {
                    return Err(ControllerError::InvalidInput("spec must not be empty".into()));
                }
                self.check_len("spec", spec, self.config.max_tag_len)
            }
            Command::RegisterApplication { info, required_specs, .. } => {
                self.check_len("info", info, self.config.max_tag_len)?;
                if required_specs.len() > MAX_REQUIRED_SPECS {
                    return Err(ControllerError::InvalidInput(format!(
                        "at most {} required specs allowed, got {}",
                        MAX_REQUIRED_SPECS,
                        required_specs.len()
                    )));
                }
                for spec in required_specs {
                    self.check_len("required spec", spec, self.config.max_tag_len)?;
                }
                Ok(())
            }
            Command::SendEvent { payload, application_id } => {
                if !self.applications.contains(*application_id) {
                    return Err(ControllerError::NotFound(Entity::Application(*application_id)));
                }
                self.check_len("payload", payload, self.config.max_payload_len)
            }
            Command::SendReply { event_id, scores } => {
                let event = self.require_event(*event_id)?;
                let application = self
                    .applications
                    .get(event.application_id)
                    .ok_or(ControllerError::NotFound(Entity::Application(event.application_id)))?;
                replies::check_reply(&self.nodes, application, event, &caller, scores)
            }
            Command::VoteSolver { event_id, .. } => {
                let event = self.require_event(*event_id)?;
                election::check_vote(&self.config, &self.nodes, event, &caller)
            }
            Command::SolveEvent { event_id } => {
                let event = self.require_event(*event_id)?;
                resolver::check_solve(&self.config, &self.nodes, event, &caller).map(|_| ())
            }
        }
    }

    /// Applies `cmd` atomically: either every effect lands and the version advances, or
    /// the state is left exactly as it was.
    pub fn apply(&mut self, caller: Address, cmd: &Command) -> Result<Outcome> {
        self.check(caller, cmd)?;
        let at = self.version.next();

        let outcome = match cmd {
            Command::RegisterNode { spec } => {
                let created = self.nodes.register(caller, spec.clone(), at);
                Outcome::NodeRegistered { created }
            }
            Command::RegisterApplication { info, required_specs, multi_reply_allowed } => {
                let id = self.applications.register(
                    info.clone(),
                    required_specs.clone(),
                    *multi_reply_allowed,
                    caller,
                    at,
                );
                Outcome::ApplicationRegistered(id)
            }
            Command::SendEvent { payload, application_id } => {
                let id = self.events.create(*application_id, payload.clone(), caller, at);
                Outcome::EventSent(id)
            }
            Command::SendReply { event_id, scores } => {
                let event = self
                    .events
                    .get_mut(*event_id)
                    .ok_or(ControllerError::NotFound(Entity::Event(*event_id)))?;
                let reply = replies::record_reply(event, caller, scores.clone(), at);
                let credited = reputation::credit_reply(&mut self.nodes, reply);
                Outcome::ReplyRecorded { credited }
            }
            Command::VoteSolver { event_id, candidate } => {
                let registered = self.nodes.len();
                let event = self
                    .events
                    .get_mut(*event_id)
                    .ok_or(ControllerError::NotFound(Entity::Event(*event_id)))?;
                let elected = election::record_vote(event, caller, *candidate, registered);
                Outcome::VoteRecorded { elected }
            }
            Command::SolveEvent { event_id } => {
                let solver = {
                    let event = self.require_event(*event_id)?;
                    resolver::check_solve(&self.config, &self.nodes, event, &caller)?
                };
                let event = self
                    .events
                    .get_mut(*event_id)
                    .ok_or(ControllerError::NotFound(Entity::Event(*event_id)))?;
                resolver::resolve(event, solver, caller, at);
                Outcome::EventSolved { solver }
            }
        };

        self.version = at;
        Ok(outcome)
    }

    fn check_len(&self, field: &str, value: &str, max: usize) -> Result<()> {
        if value.len() > max {
            return Err(ControllerError::InvalidInput(format!(
                "{} is {} bytes, limit is {}",
                field,
                value.len(),
                max
            )));
        }
        Ok(())
    }

    // --- Invariant Checker ---

    /// Checks the internal consistency of the controller state.
    pub fn check_invariants(&self) -> Result<()> {
        for (i, app) in self.applications.iter().enumerate() {
            if app.id.0 != i as u64 + 1 {
                return Err(ControllerError::Corrupted(format!("application id {} out of sequence", app.id)));
            }
            if app.created_at > self.version {
                return Err(ControllerError::Corrupted(format!("application #{} from the future", app.id)));
            }
        }

        for (i, event) in self.events.iter().enumerate() {
            if event.id.0 != i as u64 + 1 {
                return Err(ControllerError::Corrupted(format!("event id {} out of sequence", event.id)));
            }
            if !self.applications.contains(event.application_id) {
                return Err(ControllerError::Corrupted(format!(
                    "event #{} references missing application #{}",
                    event.id, event.application_id
                )));
            }
            for reply in event.replies() {
                if reply.scores.iter().any(|s| s.target == reply.author) {
                    return Err(ControllerError::Corrupted(format!(
                        "event #{} has a self score from {}",
                        event.id, reply.author
                    )));
                }
            }
            if let Some(solver) = event.elected_solver() {
                if election::votes_for(event, &solver) == 0 {
                    return Err(ControllerError::Corrupted(format!(
                        "event #{} elected {} without votes",
                        event.id, solver
                    )));
                }
            }
            if let Some(resolution) = event.resolution() {
                if event.elected_solver() != Some(resolution.solver) {
                    return Err(ControllerError::Corrupted(format!(
                        "event #{} resolved to a solver that was not elected",
                        event.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn unexpected(cmd: &Command, outcome: &Outcome) -> ControllerError {
    ControllerError::InvalidState(format!("{} produced {:?}", cmd.name(), outcome))
}
