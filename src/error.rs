use thiserror::Error;

use crate::notation::Square;
use crate::tile::{Occupant, Side};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("`{0}` is not a square; write a file letter followed by a rank, e.g. d4")]
    Malformed(String),
    #[error("file `{file}` is off the board (files a-{last})")]
    FileOutOfRange { file: char, last: char },
    #[error("rank {rank} is off the board (ranks 1-{size})")]
    RankOutOfRange { rank: u64, size: usize },
}

/// Why a move attempt was rejected. The variant is the reason code; the
/// `Display` text is the detail shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("invalid notation: {0}")]
    InvalidNotation(#[from] NotationError),
    #[error("Game already over")]
    GameOver,
    #[error("It's the {side}' turn now")]
    NotYourTurn { side: Side },
    #[error("No piece selected at {at}")]
    NoPieceSelected { at: Square },
    #[error("The piece at {at} is stuck")]
    PieceStuck { at: Square },
    #[error("You can only move in straight lines ({from} -> {to})")]
    NonStraightMove { from: Square, to: Square },
    #[error("Choose another destination than your current one ({at})")]
    SameSquare { at: Square },
    #[error("Only the king can go to the corner at {to}")]
    EscapeRestricted { to: Square },
    #[error("Only the king can visit the throne at {to}")]
    ThroneRestricted { to: Square },
    #[error("Your path is blocked by the {occupant} at {at}")]
    PathBlocked { at: Square, occupant: Occupant },
    #[error("{} pieces can move to {to}; give the origin as well", .candidates.len())]
    AmbiguousMover { to: Square, candidates: Vec<Square> },
    #[error("None of your pieces can move to {to}")]
    NoEligibleMover { to: Square },
}

impl MoveError {
    /// Stable name of the rejection reason, for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::InvalidNotation(_) => "InvalidNotation",
            MoveError::GameOver => "GameOver",
            MoveError::NotYourTurn { .. } => "NotYourTurn",
            MoveError::NoPieceSelected { .. } => "NoPieceSelected",
            MoveError::PieceStuck { .. } => "PieceStuck",
            MoveError::NonStraightMove { .. } => "NonStraightMove",
            MoveError::SameSquare { .. } => "SameSquare",
            MoveError::EscapeRestricted { .. } => "EscapeRestricted",
            MoveError::ThroneRestricted { .. } => "ThroneRestricted",
            MoveError::PathBlocked { .. } => "PathBlocked",
            MoveError::AmbiguousMover { .. } => "AmbiguousMover",
            MoveError::NoEligibleMover { .. } => "NoEligibleMover",
        }
    }
}

/// Failures while building a board. These only happen at session setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("The given board must be a square: row {row} has {len} cells, expected {expected}")]
    NonSquareBoard {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("board size {0} is too small (minimum 5)")]
    BoardTooSmall(usize),
    #[error("board size {0} is too large (maximum 26)")]
    BoardTooLarge(usize),
    #[error("invalid piece code {code} at ({row}, {col})")]
    InvalidPieceCode { row: usize, col: usize, code: u8 },
    #[error("layout must contain exactly one king, found {found}")]
    MissingOrDuplicateKing { found: usize },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Setup(#[from] SetupError),
}
