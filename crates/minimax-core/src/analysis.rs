//! Run a request: evaluate every legal first move from the root.

use crate::game_state::GameState;
use crate::player::Player;
use crate::position::Position;
use crate::request::{round2, AnalysisRequest, AnalysisResult, Pruning};
use crate::search::{Evaluation, Searcher, Window};

/// Evaluate each successor of the request's root, in move order.
///
/// Each first move is searched with the opponent on turn and one ply
/// of the depth budget already spent. All of them share a single memo
/// table that is dropped when this returns.
///
/// A root with no legal moves yields no evaluations and one node.
pub fn analyze(request: &AnalysisRequest) -> AnalysisResult {
    let to_move = request.state.to_move();
    let depth = request.depth_limit.map(|d| d.get() - 1);
    match request.state {
        GameState::TicTacToe(root) => analyze_root(root, to_move, request.pruning, depth),
        GameState::ConnectFour(root) => analyze_root(root, to_move, request.pruning, depth),
    }
}

fn analyze_root<P: Position>(
    root: P,
    to_move: Player,
    pruning: Pruning,
    depth: Option<u32>,
) -> AnalysisResult {
    let mut searcher = Searcher::new();
    let reply = to_move.opponent();

    let children: Vec<Evaluation> = root
        .successors(to_move)
        .map(|child| match (pruning, depth) {
            (Pruning::Off, None) => searcher.minimax(child, reply),
            (Pruning::AlphaBeta, None) => searcher.alpha_beta(child, reply, Window::FULL),
            (Pruning::Off, Some(d)) => searcher.depth_limited(child, reply, d),
            (Pruning::AlphaBeta, Some(d)) => {
                searcher.depth_limited_alpha_beta(child, reply, d, Window::FULL)
            }
        })
        .collect();

    if children.is_empty() {
        return AnalysisResult {
            evaluations: Vec::new(),
            evaluated_nodes: 1,
        };
    }

    AnalysisResult {
        evaluations: children.iter().map(|e| round2(e.value)).collect(),
        evaluated_nodes: children.iter().map(|e| e.nodes).sum(),
    }
}
