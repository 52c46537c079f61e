// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

use hidra_controller::protocol::event_store::Event;
use hidra_controller::protocol::replies::Reply;
use hidra_controller::protocol::reputation::Standing;
use hidra_controller::protocol::resolver::Resolution;
use hidra_controller::proof::StateProof;
use hidra_controller::types::{Address, ApplicationId, EventId, EventState, Score, Version};

use crate::errors::EngineError;

#[derive(Deserialize)]
pub struct RegisterNodeRequest {
    pub spec: String,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterNodeResponse {
    pub address: Address,
    /// False when an existing registration was overwritten.
    pub created: bool,
}

#[derive(Deserialize)]
pub struct RegisterApplicationRequest {
    pub info: String,
    #[serde(default)]
    pub required_specs: Vec<String>,
    #[serde(default)]
    pub multi_reply_allowed: bool,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterApplicationResponse {
    pub id: ApplicationId,
}

#[derive(Deserialize)]
pub struct SendEventRequest {
    pub payload: String,
    pub application_id: ApplicationId,
}

#[derive(Serialize, Deserialize)]
pub struct SendEventResponse {
    pub id: EventId,
}

/// A score as clients send it: a JSON number, or a decimal string for values beyond
/// what their number type holds exactly.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(i64),
    Text(String),
}

impl ScoreValue {
    pub fn to_i64(&self) -> Result<i64, EngineError> {
        match self {
            ScoreValue::Number(n) => Ok(*n),
            ScoreValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| EngineError::InvalidInput(format!("score '{}' is not a signed 64-bit integer", s))),
        }
    }
}

/// `{"scores": [["0x..", 3], ["0x..", "-2"]]}`
#[derive(Deserialize)]
pub struct SendReplyRequest {
    #[serde(default)]
    pub scores: Vec<(Address, ScoreValue)>,
}

impl SendReplyRequest {
    pub fn into_scores(self) -> Result<Vec<Score>, EngineError> {
        self.scores
            .into_iter()
            .map(|(target, value)| Ok(Score::new(target, value.to_i64()?)))
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
pub struct SendReplyResponse {
    pub event_id: EventId,
    /// Scores that landed on registered nodes' reputation.
    pub credited: usize,
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub candidate: Address,
}

#[derive(Serialize, Deserialize)]
pub struct VoteResponse {
    pub event_id: EventId,
    pub elected_solver: Option<Address>,
    pub votes: usize,
    pub quorum: usize,
}

#[derive(Serialize, Deserialize)]
pub struct SolveResponse {
    pub event_id: EventId,
    pub solver: Address,
}

#[derive(Serialize)]
pub struct VoteView {
    pub voter: Address,
    pub candidate: Address,
}

#[derive(Serialize)]
pub struct TallyView {
    pub candidate: Address,
    pub votes: usize,
}

#[derive(Serialize)]
pub struct EventView {
    pub id: EventId,
    pub application_id: ApplicationId,
    pub payload: String,
    pub sender: Address,
    pub created_at: Version,
    pub state: EventState,
    /// In submission order.
    pub replies: Vec<Reply>,
    pub votes: Vec<VoteView>,
    pub tally: Vec<TallyView>,
    pub elected_solver: Option<Address>,
    pub resolution: Option<Resolution>,
}

impl EventView {
    pub fn new(event: &Event) -> Self {
        Self {
            id: event.id,
            application_id: event.application_id,
            payload: event.payload.clone(),
            sender: event.sender,
            created_at: event.created_at,
            state: event.state(),
            replies: event.replies_in_order().into_iter().cloned().collect(),
            votes: event
                .votes()
                .map(|(voter, candidate)| VoteView { voter: *voter, candidate: *candidate })
                .collect(),
            tally: hidra_controller::protocol::election::tally(event)
                .into_iter()
                .map(|(candidate, votes)| TallyView { candidate, votes })
                .collect(),
            elected_solver: event.elected_solver(),
            resolution: event.resolution().cloned(),
        }
    }
}

#[derive(Serialize)]
pub struct ReputationResponse {
    pub event_id: EventId,
    pub standings: Vec<Standing>,
}

#[derive(Serialize, Deserialize)]
pub struct ProofResponse {
    pub protocol_version: u32,
    pub version: u64,
    pub journal_hash: String,
    pub state_hash: String,
    pub snapshot_hash: Option<String>,
}

impl ProofResponse {
    pub fn new(proof: &StateProof, snapshot_hash: Option<[u8; 32]>) -> Self {
        Self {
            protocol_version: proof.protocol_version,
            version: proof.version,
            journal_hash: hex::encode(proof.journal_hash),
            state_hash: hex::encode(proof.state_hash),
            snapshot_hash: snapshot_hash.map(hex::encode),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct SnapshotSaveRequest {
    pub path: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SnapshotSaveResponse {
    pub success: bool,
    pub path: String,
    pub version: u64,
}
