//! HTTP / WebSocket listener and top-level server wiring.
//!
//! Routes:
//! - `GET /status`                 scheduler counters
//! - `GET /ws`                     session protocol over WebSocket
//! - `GET /tic_tac_toe/{board}`    one-shot analysis
//! - `GET /connect_four/{board}`   one-shot analysis
//!
//! One-shot routes take `alpha_beta_pruning`, `depth_limit` and
//! `depth_limit_value` as query parameters and share the worker pool
//! with the sessions.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use minimax_core::{AnalysisResult, GameKind};
use minimax_protocol::{encode_event, AnalysisOptions, OutboundEvent};

use crate::config::Config;
use crate::error::ServiceError;
use crate::scheduler::Scheduler;
use crate::session::Session;
use crate::types::{EventRx, EventTx};

#[derive(Clone)]
struct AppState {
    scheduler: Arc<Scheduler>,
}

/// Build the application router around a scheduler.
pub fn router(scheduler: Arc<Scheduler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/status", get(status))
        .route("/ws", get(ws_upgrade))
        .route("/tic_tac_toe/{board}", get(tic_tac_toe))
        .route("/connect_four/{board}", get(connect_four))
        .layer(cors)
        .with_state(AppState { scheduler })
}

/// Run the server with the given configuration until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Listening on {} (worker_limit = {}, session_limit = {}, task_timeout = {:?})",
        addr, config.worker_limit, config.session_limit, config.task_timeout
    );

    let scheduler = Arc::new(Scheduler::from_config(&config));
    axum::serve(listener, router(scheduler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let stats = state.scheduler.stats();
    Json(json!({
        "status": "online",
        "active_workers": stats.active_workers,
        "worker_limit": stats.worker_limit,
        "active_sessions": stats.active_sessions,
        "session_limit": stats.session_limit,
    }))
}

async fn tic_tac_toe(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Query(options): Query<AnalysisOptions>,
) -> Result<Json<AnalysisResponse>, ServiceError> {
    analyze_once(&state, GameKind::TicTacToe, &board, &options).await
}

async fn connect_four(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Query(options): Query<AnalysisOptions>,
) -> Result<Json<AnalysisResponse>, ServiceError> {
    analyze_once(&state, GameKind::ConnectFour, &board, &options).await
}

#[derive(Debug, serde::Serialize)]
struct AnalysisResponse {
    evaluations: Vec<f64>,
    evaluated_nodes: u64,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        AnalysisResponse {
            evaluations: result.evaluations,
            evaluated_nodes: result.evaluated_nodes,
        }
    }
}

async fn analyze_once(
    state: &AppState,
    kind: GameKind,
    board: &str,
    options: &AnalysisOptions,
) -> Result<Json<AnalysisResponse>, ServiceError> {
    let request = options.into_request(kind, board)?;
    let result = state.scheduler.evaluate(request).await?;
    Ok(Json(result.into()))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.scheduler))
}

async fn handle_socket(mut socket: WebSocket, scheduler: Arc<Scheduler>) {
    let (events_tx, events_rx): (EventTx, EventRx) = mpsc::unbounded_channel();

    let Some(mut session) = Session::open(&scheduler, events_tx.clone()) else {
        warn!(
            "Rejecting session: session_limit ({}) reached",
            scheduler.stats().session_limit
        );
        let frame = CloseFrame {
            code: close_code::POLICY,
            reason: "connection limit reached".into(),
        };
        let _ = socket.send(Message::Close(Some(frame))).await;
        return;
    };
    let session_id = session.id();

    let (mut sink, mut stream) = socket.split();

    // Writer task: serialize lifecycle events onto the socket.
    let writer = tokio::spawn(async move {
        let mut events_rx = events_rx;
        while let Some(event) = events_rx.recv().await {
            let text = match encode_event(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(session = %session_id, "Could not encode event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => session.handle_text(text.as_str()).await,
            Ok(Message::Binary(_)) => {
                warn!(session = %session_id, "Rejected binary frame");
                let _ = events_tx.send(OutboundEvent::error("expected a text frame"));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(session = %session_id, "Socket error: {}", e);
                break;
            }
        }
    }

    session.close().await;
    writer.abort();
}
