// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hidra_controller::error::ControllerError;
use hidra_controller::protocol::election::quorum;
use hidra_controller::registry::{Application, Node};
use hidra_controller::state::command::{Command, Outcome};
use hidra_controller::types::{Address, ApplicationId, Entity, EventId};

use crate::api::*;
use crate::engine::Engine;
use crate::errors::EngineError;

pub type SharedEngine = Arc<Mutex<Engine>>;

/// Header carrying the account identity of the caller.
pub const CALLER_HEADER: &str = "x-caller-address";

/// The authenticated account a request acts for.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Address);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = EngineError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| EngineError::InvalidInput(format!("missing {} header", CALLER_HEADER)))?
            .to_str()
            .map_err(|_| EngineError::InvalidInput(format!("{} is not ASCII", CALLER_HEADER)))?;
        let address = raw
            .parse::<Address>()
            .map_err(|e| EngineError::InvalidInput(format!("{}: {}", CALLER_HEADER, e)))?;
        Ok(Caller(address))
    }
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: SharedEngine, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        // Registries
        .route("/v1/nodes", post(register_node))
        .route("/v1/nodes/:address", get(get_node))
        .route("/v1/applications", post(register_application))
        .route("/v1/applications/:id", get(get_application))
        // Event lifecycle
        .route("/v1/events", post(send_event))
        .route("/v1/events/:id", get(get_event))
        .route("/v1/events/:id/replies", post(send_reply))
        .route("/v1/events/:id/votes", post(vote_solver))
        .route("/v1/events/:id/solve", post(solve_event))
        .route("/v1/events/:id/reputation", get(get_reputation))
        // Proofs and admin
        .route("/v1/proof/state", get(get_proof))
        .route("/v1/snapshot/save", post(snapshot_save))
        // Observability
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn register_node(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Json(req): Json<RegisterNodeRequest>,
) -> Result<Json<RegisterNodeResponse>, EngineError> {
    let mut engine = state.lock().await;
    match engine.submit(caller, Command::RegisterNode { spec: req.spec })? {
        Outcome::NodeRegistered { created } => Ok(Json(RegisterNodeResponse { address: caller, created })),
        _ => Err(EngineError::Internal),
    }
}

async fn get_node(
    State(state): State<SharedEngine>,
    Path(address): Path<String>,
) -> Result<Json<Node>, EngineError> {
    let address: Address = address
        .parse()
        .map_err(|e| EngineError::InvalidInput(format!("{}", e)))?;
    let engine = state.lock().await;
    engine
        .state()
        .node(&address)
        .cloned()
        .map(Json)
        .ok_or(ControllerError::NotFound(Entity::Node(address)).into())
}

async fn register_application(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Json(req): Json<RegisterApplicationRequest>,
) -> Result<Json<RegisterApplicationResponse>, EngineError> {
    let mut engine = state.lock().await;
    let command = Command::RegisterApplication {
        info: req.info,
        required_specs: req.required_specs,
        multi_reply_allowed: req.multi_reply_allowed,
    };
    match engine.submit(caller, command)? {
        Outcome::ApplicationRegistered(id) => Ok(Json(RegisterApplicationResponse { id })),
        _ => Err(EngineError::Internal),
    }
}

async fn get_application(
    State(state): State<SharedEngine>,
    Path(id): Path<u64>,
) -> Result<Json<Application>, EngineError> {
    let id = ApplicationId(id);
    let engine = state.lock().await;
    engine
        .state()
        .application(id)
        .cloned()
        .map(Json)
        .ok_or(ControllerError::NotFound(Entity::Application(id)).into())
}

async fn send_event(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Json(req): Json<SendEventRequest>,
) -> Result<Json<SendEventResponse>, EngineError> {
    let mut engine = state.lock().await;
    let command = Command::SendEvent {
        payload: req.payload,
        application_id: req.application_id,
    };
    match engine.submit(caller, command)? {
        Outcome::EventSent(id) => Ok(Json(SendEventResponse { id })),
        _ => Err(EngineError::Internal),
    }
}

async fn get_event(
    State(state): State<SharedEngine>,
    Path(id): Path<u64>,
) -> Result<Json<EventView>, EngineError> {
    let id = EventId(id);
    let engine = state.lock().await;
    tracing::debug!("reading event #{}", id);
    engine
        .state()
        .event(id)
        .map(|event| Json(EventView::new(event)))
        .ok_or(ControllerError::NotFound(Entity::Event(id)).into())
}

async fn send_reply(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    Json(req): Json<SendReplyRequest>,
) -> Result<Json<SendReplyResponse>, EngineError> {
    let event_id = EventId(id);
    let scores = req.into_scores()?;
    let mut engine = state.lock().await;
    match engine.submit(caller, Command::SendReply { event_id, scores })? {
        Outcome::ReplyRecorded { credited } => Ok(Json(SendReplyResponse { event_id, credited })),
        _ => Err(EngineError::Internal),
    }
}

async fn vote_solver(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, EngineError> {
    let event_id = EventId(id);
    let mut engine = state.lock().await;
    let command = Command::VoteSolver {
        event_id,
        candidate: req.candidate,
    };
    engine.submit(caller, command)?;

    let controller = engine.state();
    let event = controller
        .event(event_id)
        .ok_or(ControllerError::NotFound(Entity::Event(event_id)))?;
    Ok(Json(VoteResponse {
        event_id,
        elected_solver: event.elected_solver(),
        votes: event.vote_count(),
        quorum: quorum(controller.node_count()),
    }))
}

async fn solve_event(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> Result<Json<SolveResponse>, EngineError> {
    let event_id = EventId(id);
    let mut engine = state.lock().await;
    match engine.submit(caller, Command::SolveEvent { event_id })? {
        Outcome::EventSolved { solver } => Ok(Json(SolveResponse { event_id, solver })),
        _ => Err(EngineError::Internal),
    }
}

async fn get_reputation(
    State(state): State<SharedEngine>,
    Path(id): Path<u64>,
) -> Result<Json<ReputationResponse>, EngineError> {
    let event_id = EventId(id);
    let engine = state.lock().await;
    let standings = engine.state().ranking(event_id)?;
    Ok(Json(ReputationResponse { event_id, standings }))
}

async fn get_proof(State(state): State<SharedEngine>) -> Result<Json<ProofResponse>, EngineError> {
    let engine = state.lock().await;
    let proof = engine.proof()?;
    Ok(Json(ProofResponse::new(&proof, engine.current_snapshot_hash())))
}

async fn snapshot_save(
    State(state): State<SharedEngine>,
    req: Option<Json<SnapshotSaveRequest>>,
) -> Result<Json<SnapshotSaveResponse>, EngineError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let mut engine = state.lock().await;
    let path = req.path.map(std::path::PathBuf::from);
    let used_path = engine.save_snapshot(path.as_deref())?;

    Ok(Json(SnapshotSaveResponse {
        success: true,
        path: used_path.to_string_lossy().to_string(),
        version: engine.state().version(),
    }))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
