//! The interface every searchable game implements.
//!
//! The search algorithms in [`crate::search`] only ever talk to a game
//! through this trait.

use std::fmt::Debug;
use std::hash::Hash;

use crate::player::Player;

/// An immutable game position.
///
/// Positions are small `Copy` values used directly as memoization keys.
/// Playing a move produces a new position and never touches the old one.
pub trait Position: Copy + Eq + Hash + Debug {
    /// Iterator over the positions reachable in one move.
    type Successors: Iterator<Item = Self>;

    /// One successor per legal move for `to_move`, in a fixed order.
    ///
    /// The iterator is derived from `self` alone, so calling this twice
    /// yields the same sequence.
    fn successors(&self, to_move: Player) -> Self::Successors;

    /// Exact result if the game is over, from Max's point of view:
    /// `1.0` Max has a line, `-1.0` Min has a line, `0.0` board full.
    fn outcome(&self) -> Option<f64>;

    /// Heuristic value of a non-terminal position where the search was
    /// cut off, from Max's point of view. `to_move` is the side on turn.
    fn estimate(&self, to_move: Player) -> f64;
}
