//! minimax-core
//!
//! Pure game-tree search logic:
//! - players and the `Position` seam
//! - tic-tac-toe and bitboard connect-four, with board codecs
//! - minimax / alpha-beta / depth-limited search with per-request memoization
//! - validated analysis requests and their results

pub mod player;
pub mod error;
pub mod position;
pub mod tic_tac_toe;
pub mod connect_four;
pub mod game_state;
pub mod search;
pub mod request;
pub mod analysis;

pub use player::Player;
pub use position::Position;

pub use error::{BoardError, DepthLimitError, MoveError, RequestError};

pub use tic_tac_toe::TicTacToeState;
pub use connect_four::ConnectFourState;
pub use game_state::{GameKind, GameState};
pub use search::{Evaluation, Searcher, Window};
pub use request::{parse_depth_limit, round2, AnalysisRequest, AnalysisResult, DepthLimit, Pruning};
pub use analysis::analyze;
