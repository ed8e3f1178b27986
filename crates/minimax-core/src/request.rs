//! Validated units of work and their results.

use crate::error::{DepthLimitError, RequestError};
use crate::game_state::{GameKind, GameState};

/// Whether alpha-beta pruning is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Pruning {
    #[default]
    Off,
    AlphaBeta,
}

impl Pruning {
    pub fn from_flag(alpha_beta: bool) -> Self {
        if alpha_beta {
            Pruning::AlphaBeta
        } else {
            Pruning::Off
        }
    }

    pub fn is_alpha_beta(self) -> bool {
        self == Pruning::AlphaBeta
    }
}

/// A search depth in plies, `1..=25`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DepthLimit(u32);

impl DepthLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 25;

    pub fn new(value: i64) -> Result<Self, DepthLimitError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(DepthLimit(value as u32))
        } else {
            Err(DepthLimitError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Apply the depth-limit rule to the two client fields.
///
/// When depth limiting is off the value is ignored, whatever it holds.
pub fn parse_depth_limit(
    enabled: bool,
    value: Option<i64>,
) -> Result<Option<DepthLimit>, DepthLimitError> {
    if !enabled {
        return Ok(None);
    }
    let value = value.ok_or(DepthLimitError::Missing)?;
    DepthLimit::new(value).map(Some)
}

/// One analysis job: a root position plus the algorithm to run on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisRequest {
    pub state: GameState,
    pub pruning: Pruning,
    pub depth_limit: Option<DepthLimit>,
}

impl AnalysisRequest {
    /// Validate raw client fields into a request.
    pub fn parse(
        kind: GameKind,
        board: &str,
        alpha_beta_pruning: bool,
        depth_limit: bool,
        depth_limit_value: Option<i64>,
    ) -> Result<Self, RequestError> {
        let state = GameState::decode(kind, board)?;
        let depth_limit = parse_depth_limit(depth_limit, depth_limit_value)?;
        Ok(AnalysisRequest {
            state,
            pruning: Pruning::from_flag(alpha_beta_pruning),
            depth_limit,
        })
    }

    pub fn game(&self) -> GameKind {
        self.state.kind()
    }
}

/// Per-move values in move-generation order, plus the total node count.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub evaluations: Vec<f64>,
    pub evaluated_nodes: u64,
}

/// Round to two decimals. Negative zero comes out as `0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
