//! Connect-four bitboard and board codec.
//!
//! # Bit layout
//!
//! A position is two `u64` masks over a 7 x 7 grid of bits: seven
//! columns of seven bits each. Bits 0-5 of a column are the playing rows
//! bottom to top; bit 6 is a guard that is never set, so shift-based line
//! detection cannot run from the top of one column into the bottom of
//! the next.
//!
//! ```text
//!  6 13 20 27 34 41 48   <- guard row
//!  5 12 19 26 33 40 47   <- top row
//!  4 11 18 25 32 39 46
//!  3 10 17 24 31 38 45
//!  2  9 16 23 30 37 44
//!  1  8 15 22 29 36 43
//!  0  7 14 21 28 35 42   <- bottom row
//! ```
//!
//! `own_tokens` holds Max's (yellow) pieces, `occupied` holds every piece.
//! Pieces stack from the bottom, so the occupied bits of a column are
//! always contiguous from bit 0.
//!
//! # Board text
//!
//! Seven comma-separated column strings over `{y, r}`, each listing the
//! column bottom to top, e.g. `"yr,,y,,,,"`. Yellow moves first.

use std::fmt;

use crate::error::{BoardError, MoveError};
use crate::player::{parity_ok, Player};
use crate::position::Position;

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;

/// Bits per column, including the guard bit.
const STRIDE: usize = ROWS + 1;

const ALPHABET: &str = "yr";

/// Rows 0-5 of column 0.
const COLUMN_MASK: u64 = (1 << ROWS) - 1;

/// Bit 5 of every column. All set means the board is full.
const TOP_ROW: u64 = top_row();

/// Weight of one favorable-line point in a cut-off estimate.
const LINE_WEIGHT: f64 = 0.02;

/// Shift distance for each line orientation.
const VERTICAL: u32 = 1;
const HORIZONTAL: u32 = STRIDE as u32;
const DIAGONAL_UP: u32 = STRIDE as u32 + 1;
const DIAGONAL_DOWN: u32 = STRIDE as u32 - 1;

/// `(shift, starts)` per orientation, where `starts` marks every bit at
/// which a 4-cell window fits on the board in that orientation.
const WINDOWS: [(u32, u64); 4] = [
    (VERTICAL, window_starts(0, 1)),
    (HORIZONTAL, window_starts(1, 0)),
    (DIAGONAL_UP, window_starts(1, 1)),
    (DIAGONAL_DOWN, window_starts(1, -1)),
];

const fn top_row() -> u64 {
    let mut mask = 0;
    let mut column = 0;
    while column < COLUMNS {
        mask |= 1 << (column * STRIDE + ROWS - 1);
        column += 1;
    }
    mask
}

const fn window_starts(d_col: i32, d_row: i32) -> u64 {
    let mut mask = 0;
    let mut column = 0;
    while column < COLUMNS as i32 {
        let mut row = 0;
        while row < ROWS as i32 {
            let end_col = column + 3 * d_col;
            let end_row = row + 3 * d_row;
            if end_col >= 0 && end_col < COLUMNS as i32 && end_row >= 0 && end_row < ROWS as i32 {
                mask |= 1 << (column * STRIDE as i32 + row);
            }
            row += 1;
        }
        column += 1;
    }
    mask
}

#[inline]
fn bottom_bit(column: usize) -> u64 {
    1 << (column * STRIDE)
}

#[inline]
fn column_bits(column: usize) -> u64 {
    COLUMN_MASK << (column * STRIDE)
}

/// True if `tokens` contains four in a row in any orientation.
///
/// AND-ing the mask with itself shifted by the stride leaves pairs;
/// doing it again with twice the stride leaves fours.
pub fn has_four(tokens: u64) -> bool {
    WINDOWS.iter().any(|&(shift, _)| {
        let pairs = tokens & (tokens >> shift);
        pairs & (pairs >> (2 * shift)) != 0
    })
}

/// Count the windows still open to `tokens`' owner.
///
/// Only windows holding none of `blockers` are considered. Each such
/// window scores one point if both its halves hold a token (a gapped
/// pair) and one more if either half is completely filled (a double).
pub fn favorable_lines(tokens: u64, blockers: u64) -> u32 {
    let free = !blockers;
    WINDOWS
        .iter()
        .map(|&(shift, starts)| {
            let open = free & (free >> shift);
            let open = open & (open >> (2 * shift)) & starts;

            let either = tokens | (tokens >> shift);
            let gapped = either & (either >> (2 * shift)) & open;

            let pair = tokens & (tokens >> shift);
            let doubled = (pair | (pair >> (2 * shift))) & open;

            gapped.count_ones() + doubled.count_ones()
        })
        .sum()
}

/// Legal moves for an occupancy mask, one single-bit mask per non-full
/// column, in ascending column order.
pub fn possible_moves(occupied: u64) -> PossibleMoves {
    PossibleMoves {
        occupied,
        column: 0,
    }
}

/// Iterator returned by [`possible_moves`].
#[derive(Debug, Clone)]
pub struct PossibleMoves {
    occupied: u64,
    column: usize,
}

impl Iterator for PossibleMoves {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while self.column < COLUMNS {
            let column = self.column;
            self.column += 1;
            if self.occupied & TOP_ROW & column_bits(column) == 0 {
                // The stack is contiguous from the bottom, so adding the
                // base bit carries into the first free row.
                return Some((self.occupied & column_bits(column)) + bottom_bit(column));
            }
        }
        None
    }
}

/// A connect-four position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConnectFourState {
    own_tokens: u64,
    occupied: u64,
}

impl ConnectFourState {
    /// The empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate board text.
    pub fn decode(text: &str) -> Result<Self, BoardError> {
        let columns: Vec<&str> = text.split(',').collect();
        if columns.len() != COLUMNS {
            return Err(BoardError::ColumnCount {
                expected: COLUMNS,
                found: columns.len(),
            });
        }

        let mut own_tokens = 0u64;
        let mut occupied = 0u64;
        for (column, tokens) in columns.iter().enumerate() {
            let height = tokens.chars().count();
            if height > ROWS {
                return Err(BoardError::ColumnOverflow {
                    column,
                    height,
                    max: ROWS,
                });
            }
            for (row, token) in tokens.chars().enumerate() {
                let bit = 1u64 << (column * STRIDE + row);
                match token {
                    'y' => own_tokens |= bit,
                    'r' => {}
                    other => {
                        return Err(BoardError::UnknownToken {
                            token: other,
                            alphabet: ALPHABET,
                        })
                    }
                }
                occupied |= bit;
            }
        }

        let state = ConnectFourState {
            own_tokens,
            occupied,
        };
        let (yellow, red) = (state.count(Player::Max), state.count(Player::Min));
        if !parity_ok(yellow, red) {
            return Err(BoardError::Parity {
                first: yellow,
                second: red,
            });
        }

        Ok(state)
    }

    /// Render back to comma-separated column text.
    pub fn encode(&self) -> String {
        let columns: Vec<String> = (0..COLUMNS)
            .map(|column| {
                (0..ROWS)
                    .map(|row| 1u64 << (column * STRIDE + row))
                    .take_while(|bit| self.occupied & bit != 0)
                    .map(|bit| if self.own_tokens & bit != 0 { 'y' } else { 'r' })
                    .collect()
            })
            .collect();
        columns.join(",")
    }

    /// Max's (yellow) pieces.
    pub fn own_tokens(&self) -> u64 {
        self.own_tokens
    }

    /// Every piece on the board.
    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    /// Pieces belonging to `player`.
    pub fn tokens(&self, player: Player) -> u64 {
        match player {
            Player::Max => self.own_tokens,
            Player::Min => self.occupied & !self.own_tokens,
        }
    }

    pub fn count(&self, player: Player) -> u32 {
        self.tokens(player).count_ones()
    }

    /// Side on turn, derived from the piece counts.
    pub fn to_move(&self) -> Player {
        Player::to_move(self.count(Player::Max), self.count(Player::Min))
    }

    pub fn is_full(&self) -> bool {
        self.occupied & TOP_ROW == TOP_ROW
    }

    /// Place the single-bit move mask `mv` for `player`.
    pub fn apply(&self, mv: u64, player: Player) -> Self {
        debug_assert_eq!(mv.count_ones(), 1);
        debug_assert_eq!(mv & self.occupied, 0);
        let own_tokens = match player {
            Player::Max => self.own_tokens | mv,
            Player::Min => self.own_tokens,
        };
        ConnectFourState {
            own_tokens,
            occupied: self.occupied | mv,
        }
    }

    /// Drop a piece for `player` into `column`.
    pub fn drop_token(&self, column: usize, player: Player) -> Result<Self, MoveError> {
        if column >= COLUMNS {
            return Err(MoveError::OutOfRange(column));
        }
        if self.occupied & TOP_ROW & column_bits(column) != 0 {
            return Err(MoveError::ColumnFull(column));
        }
        let mv = (self.occupied & column_bits(column)) + bottom_bit(column);
        Ok(self.apply(mv, player))
    }
}

impl fmt::Display for ConnectFourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Successors in column order 0 to 6.
#[derive(Debug, Clone)]
pub struct ConnectFourSuccessors {
    state: ConnectFourState,
    player: Player,
    moves: PossibleMoves,
}

impl Iterator for ConnectFourSuccessors {
    type Item = ConnectFourState;

    fn next(&mut self) -> Option<ConnectFourState> {
        self.moves.next().map(|mv| self.state.apply(mv, self.player))
    }
}

impl Position for ConnectFourState {
    type Successors = ConnectFourSuccessors;

    fn successors(&self, to_move: Player) -> ConnectFourSuccessors {
        ConnectFourSuccessors {
            state: *self,
            player: to_move,
            moves: possible_moves(self.occupied),
        }
    }

    fn outcome(&self) -> Option<f64> {
        if has_four(self.tokens(Player::Max)) {
            Some(1.0)
        } else if has_four(self.tokens(Player::Min)) {
            Some(-1.0)
        } else if self.is_full() {
            Some(0.0)
        } else {
            None
        }
    }

    fn estimate(&self, to_move: Player) -> f64 {
        // Scored for the side that just moved, then turned to Max's view.
        let mover = to_move.opponent();
        let mine = self.tokens(mover);
        let theirs = self.tokens(to_move);
        let score = favorable_lines(mine, theirs) as i32 - favorable_lines(theirs, mine) as i32;
        mover.sign() * (f64::from(score) * LINE_WEIGHT)
    }
}
