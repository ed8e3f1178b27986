//! Tic-tac-toe position and board codec.
//!
//! Board text is 9 characters over `{x, o, _}`, row-major from the top
//! left. `x` is [`Player::Max`] and always moves first.
//!
//! ```text
//! 0 | 1 | 2
//! 3 | 4 | 5
//! 6 | 7 | 8
//! ```

use std::fmt;

use crate::error::{BoardError, MoveError};
use crate::player::{parity_ok, Player};
use crate::position::Position;

pub const CELLS: usize = 9;

const ALPHABET: &str = "xo_";

/// The eight winning lines: three rows, three columns, two diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Nine cells, each empty or marked by one player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct TicTacToeState {
    cells: [Option<Player>; CELLS],
}

impl TicTacToeState {
    /// The empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate board text.
    pub fn decode(text: &str) -> Result<Self, BoardError> {
        let found = text.chars().count();
        if found != CELLS {
            return Err(BoardError::CellCount {
                expected: CELLS,
                found,
            });
        }

        let mut cells = [None; CELLS];
        for (slot, token) in cells.iter_mut().zip(text.chars()) {
            *slot = match token {
                'x' => Some(Player::Max),
                'o' => Some(Player::Min),
                '_' => None,
                other => {
                    return Err(BoardError::UnknownToken {
                        token: other,
                        alphabet: ALPHABET,
                    })
                }
            };
        }

        let state = TicTacToeState { cells };
        let (x_count, o_count) = (state.count(Player::Max), state.count(Player::Min));
        if !parity_ok(x_count, o_count) {
            return Err(BoardError::Parity {
                first: x_count,
                second: o_count,
            });
        }

        Ok(state)
    }

    /// Render back to the 9-character board text.
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(Player::Max) => 'x',
                Some(Player::Min) => 'o',
                None => '_',
            })
            .collect()
    }

    /// Mark at `index`, if any.
    pub fn cell(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    /// Number of cells marked by `player`.
    pub fn count(&self, player: Player) -> u32 {
        self.cells.iter().filter(|c| **c == Some(player)).count() as u32
    }

    /// Side on turn, derived from the piece counts.
    pub fn to_move(&self) -> Player {
        Player::to_move(self.count(Player::Max), self.count(Player::Min))
    }

    /// Fill the empty cell `index` with `player`'s mark.
    pub fn play(&self, index: usize, player: Player) -> Result<Self, MoveError> {
        match self.cells.get(index) {
            None => Err(MoveError::OutOfRange(index)),
            Some(Some(_)) => Err(MoveError::Occupied(index)),
            Some(None) => Ok(self.with_mark(index, player)),
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Whether `player` owns any complete line.
    pub fn has_line(&self, player: Player) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(player)))
    }

    fn with_mark(&self, index: usize, player: Player) -> Self {
        let mut cells = self.cells;
        cells[index] = Some(player);
        TicTacToeState { cells }
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Successors in cell-index order.
#[derive(Debug, Clone)]
pub struct TicTacToeSuccessors {
    state: TicTacToeState,
    player: Player,
    next: usize,
}

impl Iterator for TicTacToeSuccessors {
    type Item = TicTacToeState;

    fn next(&mut self) -> Option<TicTacToeState> {
        while self.next < CELLS {
            let index = self.next;
            self.next += 1;
            if self.state.cells[index].is_none() {
                return Some(self.state.with_mark(index, self.player));
            }
        }
        None
    }
}

impl Position for TicTacToeState {
    type Successors = TicTacToeSuccessors;

    fn successors(&self, to_move: Player) -> TicTacToeSuccessors {
        TicTacToeSuccessors {
            state: *self,
            player: to_move,
            next: 0,
        }
    }

    fn outcome(&self) -> Option<f64> {
        if self.has_line(Player::Max) {
            Some(1.0)
        } else if self.has_line(Player::Min) {
            Some(-1.0)
        } else if self.is_full() {
            Some(0.0)
        } else {
            None
        }
    }

    // No positional heuristic for tic-tac-toe: a cut-off before a line
    // exists is neutral.
    fn estimate(&self, _to_move: Player) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_bad_boards() {
        assert_eq!(
            TicTacToeState::decode("xo_"),
            Err(BoardError::CellCount {
                expected: 9,
                found: 3
            })
        );
        assert!(matches!(
            TicTacToeState::decode("xo__z____"),
            Err(BoardError::UnknownToken { token: 'z', .. })
        ));
        assert_eq!(
            TicTacToeState::decode("oo_______"),
            Err(BoardError::Parity {
                first: 0,
                second: 2
            })
        );
        assert!(TicTacToeState::decode("xxo______").is_ok());
        assert!(TicTacToeState::decode("xxx______").is_err());
    }

    #[test]
    fn successors_follow_cell_order() {
        let state = TicTacToeState::decode("xo_______").unwrap();
        let boards: Vec<String> = state
            .successors(Player::Max)
            .map(|s| s.encode())
            .collect();
        assert_eq!(boards.len(), 7);
        assert_eq!(boards[0], "xox______");
        assert_eq!(boards[6], "xo______x");
    }

    #[test]
    fn outcome_detects_lines_and_draws() {
        assert_eq!(TicTacToeState::decode("xxxoo____").unwrap().outcome(), Some(1.0));
        assert_eq!(TicTacToeState::decode("xx_ooox_x").unwrap().outcome(), Some(-1.0));
        assert_eq!(TicTacToeState::decode("xoxxoooxx").unwrap().outcome(), Some(0.0));
        assert_eq!(TicTacToeState::decode("xo_______").unwrap().outcome(), None);
    }

    #[test]
    fn play_refuses_taken_cells() {
        let state = TicTacToeState::decode("x________").unwrap();
        assert_eq!(state.play(0, Player::Min), Err(MoveError::Occupied(0)));
        assert_eq!(state.play(9, Player::Min), Err(MoveError::OutOfRange(9)));
        assert_eq!(state.play(4, Player::Min).unwrap().encode(), "x___o____");
    }
}
