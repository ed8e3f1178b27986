//! Player (Max / Min) for both games.

/// The two sides of a zero-sum game.
///
/// `Max` is `x` in tic-tac-toe and yellow in connect-four; it always
/// moves first and every value is reported from its point of view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    Max,
    Min,
}

impl Player {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }

    /// Side to move given how many pieces each side has placed.
    ///
    /// Max moves first, so equal counts mean Max is on turn.
    pub fn to_move(max_count: u32, min_count: u32) -> Self {
        if max_count == min_count {
            Player::Max
        } else {
            Player::Min
        }
    }

    /// `+1.0` for Max, `-1.0` for Min.
    pub fn sign(self) -> f64 {
        match self {
            Player::Max => 1.0,
            Player::Min => -1.0,
        }
    }
}

/// Piece counts must be equal or Max ahead by exactly one.
pub(crate) fn parity_ok(max_count: u32, min_count: u32) -> bool {
    max_count == min_count || max_count == min_count + 1
}
