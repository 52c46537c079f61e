// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hidra_controller::error::ControllerError;
use serde_json::json;
use thiserror::Error;

use crate::journal::JournalError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Controller(#[from] ControllerError),
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal server error")]
    Internal,
}

impl EngineError {
    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::Controller(err) => match err {
                ControllerError::NotFound(_) => StatusCode::NOT_FOUND,
                ControllerError::AlreadyDone(_) => StatusCode::CONFLICT,
                ControllerError::InvalidState(_) => StatusCode::PRECONDITION_FAILED,
                ControllerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ControllerError::Corrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Journal(_)
            | EngineError::Io(_)
            | EngineError::Config(_)
            | EngineError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
