//! Error types for the analysis server.

use std::io;
use std::process::ExitStatus;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use minimax_core::RequestError;
use minimax_protocol::ProtocolError;

/// Failure to run one analysis on a worker.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker pipe error: {0}")]
    Io(#[from] io::Error),

    #[error("worker exited with {0}")]
    Exit(ExitStatus),

    #[error("bad worker exchange: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("worker was terminated")]
    Terminated,

    #[error("worker supervisor failed: {0}")]
    Supervisor(String),
}

/// Outcome of a one-shot HTTP analysis that did not produce a result.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    BadRequest(#[from] RequestError),

    #[error("analysis timed out")]
    Timeout,

    #[error("analysis failed: {0}")]
    Failed(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
