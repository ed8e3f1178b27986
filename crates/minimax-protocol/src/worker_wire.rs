//! Job and report exchanged with a worker process.
//!
//! The scheduler writes one [`WorkerJob`] as JSON to the worker's stdin
//! and closes it; the worker writes one [`WorkerReport`] to stdout and
//! exits. The job carries the board as text, so the worker re-decodes it
//! with the same codec the session used.

use serde::{Deserialize, Serialize};

use minimax_core::{AnalysisRequest, AnalysisResult, GameKind, RequestError};

use crate::json_codec::ProtocolError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireGame {
    TicTacToe,
    ConnectFour,
}

impl From<GameKind> for WireGame {
    fn from(kind: GameKind) -> Self {
        match kind {
            GameKind::TicTacToe => WireGame::TicTacToe,
            GameKind::ConnectFour => WireGame::ConnectFour,
        }
    }
}

impl From<WireGame> for GameKind {
    fn from(game: WireGame) -> Self {
        match game {
            WireGame::TicTacToe => GameKind::TicTacToe,
            WireGame::ConnectFour => GameKind::ConnectFour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerJob {
    pub game: WireGame,
    pub board: String,
    pub alpha_beta_pruning: bool,
    /// Plies, already validated on the sending side.
    pub depth_limit: Option<u32>,
}

impl WorkerJob {
    pub fn from_request(request: &AnalysisRequest) -> Self {
        WorkerJob {
            game: request.game().into(),
            board: request.state.encode(),
            alpha_beta_pruning: request.pruning.is_alpha_beta(),
            depth_limit: request.depth_limit.map(|d| d.get()),
        }
    }

    /// Re-validate into a request.
    pub fn into_request(self) -> Result<AnalysisRequest, RequestError> {
        AnalysisRequest::parse(
            self.game.into(),
            &self.board,
            self.alpha_beta_pruning,
            self.depth_limit.is_some(),
            self.depth_limit.map(i64::from),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub evaluations: Vec<f64>,
    pub evaluated_nodes: u64,
}

impl From<AnalysisResult> for WorkerReport {
    fn from(result: AnalysisResult) -> Self {
        WorkerReport {
            evaluations: result.evaluations,
            evaluated_nodes: result.evaluated_nodes,
        }
    }
}

impl From<WorkerReport> for AnalysisResult {
    fn from(report: WorkerReport) -> Self {
        AnalysisResult {
            evaluations: report.evaluations,
            evaluated_nodes: report.evaluated_nodes,
        }
    }
}

pub fn encode_job(request: &AnalysisRequest) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(&WorkerJob::from_request(request))?)
}

pub fn decode_job(bytes: &[u8]) -> Result<AnalysisRequest, ProtocolError> {
    let job: WorkerJob = serde_json::from_slice(bytes)?;
    Ok(job.into_request()?)
}

pub fn encode_report(result: AnalysisResult) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(&WorkerReport::from(result))?)
}

pub fn decode_report(bytes: &[u8]) -> Result<AnalysisResult, ProtocolError> {
    let report: WorkerReport = serde_json::from_slice(bytes)?;
    Ok(report.into())
}
