//! The two supported games behind one type.

use std::fmt;

use crate::connect_four::ConnectFourState;
use crate::error::BoardError;
use crate::player::Player;
use crate::tic_tac_toe::TicTacToeState;

/// Which game a board belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
}

impl GameKind {
    /// Snake-case name used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tic_tac_toe",
            GameKind::ConnectFour => "connect_four",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated root position of either game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
}

impl GameState {
    /// Decode `text` as a board of the given game.
    pub fn decode(kind: GameKind, text: &str) -> Result<Self, BoardError> {
        match kind {
            GameKind::TicTacToe => TicTacToeState::decode(text).map(GameState::TicTacToe),
            GameKind::ConnectFour => ConnectFourState::decode(text).map(GameState::ConnectFour),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            GameState::TicTacToe(s) => s.encode(),
            GameState::ConnectFour(s) => s.encode(),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameState::TicTacToe(_) => GameKind::TicTacToe,
            GameState::ConnectFour(_) => GameKind::ConnectFour,
        }
    }

    pub fn to_move(&self) -> Player {
        match self {
            GameState::TicTacToe(s) => s.to_move(),
            GameState::ConnectFour(s) => s.to_move(),
        }
    }
}

impl From<TicTacToeState> for GameState {
    fn from(state: TicTacToeState) -> Self {
        GameState::TicTacToe(state)
    }
}

impl From<ConnectFourState> for GameState {
    fn from(state: ConnectFourState) -> Self {
        GameState::ConnectFour(state)
    }
}
