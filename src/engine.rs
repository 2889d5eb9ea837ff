use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, trace};

use crate::board::{Board, Direction, GameStatus, Position, Snapshot};
use crate::capture::Capture;
use crate::error::MoveError;
use crate::tile::{Occupant, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A move as typed by a player, still in rank/file notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequest {
    /// Only the destination; the origin is inferred.
    Destination { to: String },
    Explicit { from: String, to: String },
}

impl MoveRequest {
    pub fn destination(to: impl Into<String>) -> Self {
        MoveRequest::Destination { to: to.into() }
    }

    pub fn explicit(from: impl Into<String>, to: impl Into<String>) -> Self {
        MoveRequest::Explicit {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Everything that happened in an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    #[serde(rename = "move")]
    pub mv: Move,
    pub piece: Occupant,
    pub captures: Vec<Capture>,
    pub snapshot: Snapshot,
}

impl Board {
    /// Play a move given in notation. This is the entry point for adapters.
    pub fn play(&mut self, request: &MoveRequest) -> Result<MoveReport, MoveError> {
        let result = self.resolve_request(request).and_then(|mv| self.make_move(mv));
        if let Err(err) = &result {
            debug!(?request, code = err.code(), "move rejected: {err}");
        }
        result
    }

    fn resolve_request(&self, request: &MoveRequest) -> Result<Move, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        match request {
            MoveRequest::Destination { to } => {
                let to = self.parse_position(to)?;
                let from = self.infer_origin(to)?;
                Ok(Move::new(from, to))
            }
            MoveRequest::Explicit { from, to } => {
                let from = self.parse_position(from)?;
                let to = self.parse_position(to)?;
                Ok(Move::new(from, to))
            }
        }
    }

    /// Validate and execute a move for the side whose turn it is.
    ///
    /// Rejections leave the board untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<MoveReport, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let piece = self.validate_origin(mv.from)?;
        self.validate_destination(mv.from, mv.to)?;

        Ok(self.execute(mv, piece))
    }

    /// Check that the piece at `from` may be picked up this turn.
    pub fn validate_origin(&self, from: Position) -> Result<Occupant, MoveError> {
        let piece = self.occupant_at(from);
        if !piece.is_piece() {
            return Err(MoveError::NoPieceSelected {
                at: self.square(from),
            });
        }
        if !self.turn().owns(piece) {
            return Err(MoveError::NotYourTurn { side: self.turn() });
        }

        let free = self
            .neighbors(from)
            .iter()
            .any(|n| self.occupant_at(n).is_empty());
        if !free {
            return Err(MoveError::PieceStuck {
                at: self.square(from),
            });
        }

        Ok(piece)
    }

    /// Check that the piece at `from` may go to `to`. The first broken rule wins.
    pub fn validate_destination(&self, from: Position, to: Position) -> Result<(), MoveError> {
        let piece = self.occupant_at(from);
        if !self.is_on_board(to) {
            return Err(MoveError::PathBlocked {
                at: self.square(to),
                occupant: Occupant::OffBoard,
            });
        }

        let Some(path) = self.straight_path(from, to) else {
            return Err(MoveError::NonStraightMove {
                from: self.square(from),
                to: self.square(to),
            });
        };
        if path.is_empty() {
            return Err(MoveError::SameSquare {
                at: self.square(from),
            });
        }

        match self.kind_at(to) {
            Some(TileKind::Escape) if piece != Occupant::King => {
                return Err(MoveError::EscapeRestricted {
                    to: self.square(to),
                });
            }
            Some(TileKind::Throne) if piece != Occupant::King => {
                return Err(MoveError::ThroneRestricted {
                    to: self.square(to),
                });
            }
            _ => {}
        }

        // Covers the destination itself.
        for pos in path {
            let occupant = self.occupant_at(pos);
            if !occupant.is_empty() {
                return Err(MoveError::PathBlocked {
                    at: self.square(pos),
                    occupant,
                });
            }
        }

        Ok(())
    }

    /// Find the one piece of the side to move that can slide straight to `to`.
    pub fn infer_origin(&self, to: Position) -> Result<Position, MoveError> {
        let occupant = self.occupant_at(to);
        if !occupant.is_empty() {
            return Err(MoveError::PathBlocked {
                at: self.square(to),
                occupant,
            });
        }

        let side = self.turn();
        let candidates: Vec<Position> = Direction::ALL
            .into_iter()
            .filter_map(|dir| self.first_piece_from(to, dir))
            .filter(|&pos| side.owns(self.occupant_at(pos)))
            .collect();
        trace!(%to, ?candidates, "inferring origin");

        match candidates.as_slice() {
            [] => Err(MoveError::NoEligibleMover {
                to: self.square(to),
            }),
            [from] => Ok(*from),
            _ => Err(MoveError::AmbiguousMover {
                to: self.square(to),
                candidates: candidates.iter().map(|&pos| self.square(pos)).collect(),
            }),
        }
    }

    /// First occupied square when walking from `start` towards `dir`.
    fn first_piece_from(&self, start: Position, dir: Direction) -> Option<Position> {
        let mut current = start;
        loop {
            current = self.neighbor(current, dir)?;
            if !self.occupant_at(current).is_empty() {
                return Some(current);
            }
        }
    }

    fn execute(&mut self, mv: Move, piece: Occupant) -> MoveReport {
        self.set_occupant(mv.to, piece);
        self.clear(mv.from);

        let captures = self.resolve_captures(mv.to);

        if piece == Occupant::King && self.kind_at(mv.to) == Some(TileKind::Escape) {
            info!(at = %mv.to, "king escaped, defenders win");
            self.set_status(GameStatus::DefendersWon);
        }

        self.pass_turn();
        debug!(%mv, %piece, captured = captures.len(), "move played");

        MoveReport {
            mv,
            piece,
            captures,
            snapshot: self.snapshot(),
        }
    }
}
