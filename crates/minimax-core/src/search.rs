//! Minimax, alpha-beta and their depth-limited variants.
//!
//! All four algorithms share one recursion in [`Searcher::search`]; they
//! differ only in whether a pruning window and/or a remaining depth is
//! threaded through it.
//!
//! Every call returns an [`Evaluation`]: the value from Max's point of
//! view and the number of nodes in the (un-memoized) tree below and
//! including the call. A cached entry stores both, so node counts are the
//! same whether or not a subtree was served from the cache.
//!
//! A [`Searcher`] owns its memo table. Create one per analysis request
//! and drop it afterwards: alpha-beta entries are keyed on the exact
//! window they were computed under and are never shared across windows.

use std::collections::HashMap;

use crate::player::Player;
use crate::position::Position;

/// Result of searching one node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Evaluation {
    /// Value from Max's point of view.
    pub value: f64,
    /// This node plus everything expanded beneath it. Always >= 1.
    pub nodes: u64,
}

impl Evaluation {
    fn leaf(value: f64) -> Self {
        Evaluation { value, nodes: 1 }
    }
}

/// `[alpha, beta]` bounds for a pruned search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Window {
    pub alpha: f64,
    pub beta: f64,
}

impl Window {
    /// `(-inf, +inf)`: nothing known yet.
    pub const FULL: Window = Window {
        alpha: f64::NEG_INFINITY,
        beta: f64::INFINITY,
    };

    fn key(self) -> (u64, u64) {
        (self.alpha.to_bits(), self.beta.to_bits())
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct CacheKey<P> {
    state: P,
    to_move: Player,
    depth: Option<u32>,
    window: Option<(u64, u64)>,
}

/// Memoizing searcher over one game.
#[derive(Debug)]
pub struct Searcher<P: Position> {
    cache: HashMap<CacheKey<P>, Evaluation>,
    hits: u64,
}

impl<P: Position> Default for Searcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Position> Searcher<P> {
    pub fn new() -> Self {
        Searcher {
            cache: HashMap::new(),
            hits: 0,
        }
    }

    /// Exact value by full expansion.
    pub fn minimax(&mut self, state: P, to_move: Player) -> Evaluation {
        self.search(state, to_move, None, None)
    }

    /// Exact value with fail-hard alpha-beta pruning.
    pub fn alpha_beta(&mut self, state: P, to_move: Player, window: Window) -> Evaluation {
        self.search(state, to_move, None, Some(window))
    }

    /// Minimax that stops `depth` plies down and substitutes
    /// [`Position::estimate`] for non-terminal leaves.
    pub fn depth_limited(&mut self, state: P, to_move: Player, depth: u32) -> Evaluation {
        self.search(state, to_move, Some(depth), None)
    }

    /// Depth-limited search with alpha-beta pruning.
    pub fn depth_limited_alpha_beta(
        &mut self,
        state: P,
        to_move: Player,
        depth: u32,
        window: Window,
    ) -> Evaluation {
        self.search(state, to_move, Some(depth), Some(window))
    }

    /// Distinct nodes stored so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Lookups answered from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.hits
    }

    fn search(
        &mut self,
        state: P,
        to_move: Player,
        depth: Option<u32>,
        window: Option<Window>,
    ) -> Evaluation {
        let key = CacheKey {
            state,
            to_move,
            depth,
            window: window.map(Window::key),
        };
        if let Some(hit) = self.cache.get(&key) {
            self.hits += 1;
            return *hit;
        }

        let evaluation = self.expand(state, to_move, depth, window);
        self.cache.insert(key, evaluation);
        evaluation
    }

    fn expand(
        &mut self,
        state: P,
        to_move: Player,
        depth: Option<u32>,
        window: Option<Window>,
    ) -> Evaluation {
        if let Some(value) = state.outcome() {
            return Evaluation::leaf(value);
        }
        if depth == Some(0) {
            return Evaluation::leaf(state.estimate(to_move));
        }

        let child_depth = depth.map(|d| d - 1);
        let next = to_move.opponent();
        let mut nodes = 1;

        match window {
            None => {
                let mut best: Option<f64> = None;
                for child in state.successors(to_move) {
                    let e = self.search(child, next, child_depth, None);
                    nodes += e.nodes;
                    best = Some(match (best, to_move) {
                        (None, _) => e.value,
                        (Some(b), Player::Max) => b.max(e.value),
                        (Some(b), Player::Min) => b.min(e.value),
                    });
                }
                debug_assert!(best.is_some(), "non-terminal position without moves");
                Evaluation {
                    value: best.unwrap_or(0.0),
                    nodes,
                }
            }
            Some(Window { mut alpha, mut beta }) => {
                for child in state.successors(to_move) {
                    let e = self.search(child, next, child_depth, Some(Window { alpha, beta }));
                    nodes += e.nodes;
                    match to_move {
                        Player::Max => alpha = alpha.max(e.value),
                        Player::Min => beta = beta.min(e.value),
                    }
                    if alpha >= beta {
                        break;
                    }
                }
                let value = match to_move {
                    Player::Max => alpha,
                    Player::Min => beta,
                };
                Evaluation { value, nodes }
            }
        }
    }
}
