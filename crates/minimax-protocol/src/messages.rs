//! Session message types.
//!
//! Inbound (client -> server), discriminated by `type`:
//!
//! ```text
//! {"type":"tic_tac_toe","board":"xo_______","alpha_beta_pruning":true}
//! {"type":"connect_four","board":",,,y,,,","depth_limit":true,"depth_limit_value":4}
//! {"type":"cancel_task"}
//! ```
//!
//! Outbound (server -> client), discriminated by `status`:
//!
//! ```text
//! {"status":"waiting"}
//! {"status":"running"}
//! {"status":"complete","evaluations":[0.0,1.0],"evaluated_nodes":42}
//! {"status":"timeout"}
//! {"status":"error","message":"..."}
//! ```

use serde::{Deserialize, Serialize};

use minimax_core::{AnalysisRequest, AnalysisResult, GameKind, RequestError};

/// Search options shared by both games, on the socket and in HTTP query
/// strings. Missing flags default to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub alpha_beta_pruning: bool,

    #[serde(default)]
    pub depth_limit: bool,

    /// Required and in `1..=25` when `depth_limit` is set, ignored otherwise.
    #[serde(default)]
    pub depth_limit_value: Option<i64>,
}

impl AnalysisOptions {
    /// Validate `board` and these options into a request for `kind`.
    pub fn into_request(&self, kind: GameKind, board: &str) -> Result<AnalysisRequest, RequestError> {
        AnalysisRequest::parse(
            kind,
            board,
            self.alpha_beta_pruning,
            self.depth_limit,
            self.depth_limit_value,
        )
    }
}

/// A raw inbound session message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    TicTacToe {
        board: String,
        #[serde(flatten)]
        options: AnalysisOptions,
    },
    ConnectFour {
        board: String,
        #[serde(flatten)]
        options: AnalysisOptions,
    },
    CancelTask,
}

/// What a session should do with a validated inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replace the current task (if any) with this one.
    Analyze(AnalysisRequest),
    /// Cancel the current task, if any.
    Cancel,
}

impl TryFrom<InboundMessage> for SessionCommand {
    type Error = RequestError;

    fn try_from(msg: InboundMessage) -> Result<Self, Self::Error> {
        match msg {
            InboundMessage::TicTacToe { board, options } => options
                .into_request(GameKind::TicTacToe, &board)
                .map(SessionCommand::Analyze),
            InboundMessage::ConnectFour { board, options } => options
                .into_request(GameKind::ConnectFour, &board)
                .map(SessionCommand::Analyze),
            InboundMessage::CancelTask => Ok(SessionCommand::Cancel),
        }
    }
}

/// Lifecycle event for a session's current task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// All worker slots are busy; the task is queued.
    Waiting,
    /// The task holds a worker slot and is executing.
    Running,
    Complete {
        evaluations: Vec<f64>,
        evaluated_nodes: u64,
    },
    Timeout,
    /// Rejected request or failed worker.
    Error { message: String },
}

impl OutboundEvent {
    pub fn error(message: impl Into<String>) -> Self {
        OutboundEvent::Error {
            message: message.into(),
        }
    }
}

impl From<AnalysisResult> for OutboundEvent {
    fn from(result: AnalysisResult) -> Self {
        OutboundEvent::Complete {
            evaluations: result.evaluations,
            evaluated_nodes: result.evaluated_nodes,
        }
    }
}
