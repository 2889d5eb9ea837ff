use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, Direction, GameStatus, Position};
use crate::tile::{Occupant, TileKind};

/// A piece taken off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capture {
    pub position: Position,
    pub piece: Occupant,
}

impl Board {
    /// Remove every neighbor of `center` that is now flanked on both sides of
    /// either axis. Called with the square a piece just moved to.
    ///
    /// A captured king ends the game for the attackers.
    pub fn resolve_captures(&mut self, center: Position) -> Vec<Capture> {
        let mut captures = Vec::new();

        for neighbor in self.neighbors(center).iter() {
            let piece = self.occupant_at(neighbor);
            if !piece.is_piece() || !self.is_surrounded(neighbor) {
                continue;
            }

            self.clear(neighbor);
            debug!(at = %neighbor, %piece, "captured");
            if piece == Occupant::King {
                info!(at = %neighbor, "king captured, attackers win");
                self.set_status(GameStatus::AttackersWon);
            }
            captures.push(Capture {
                position: neighbor,
                piece,
            });
        }

        captures
    }

    /// Whether the piece at `pos` has hostile squares on both sides of one
    /// axis. Off-board squares never flank.
    pub fn is_surrounded(&self, pos: Position) -> bool {
        let piece = self.occupant_at(pos);
        if !piece.is_piece() {
            return false;
        }

        [Direction::Above, Direction::Left].into_iter().any(|dir| {
            match (self.neighbor(pos, dir), self.neighbor(pos, dir.opposite())) {
                (Some(a), Some(b)) => self.is_hostile_to(a, piece) && self.is_hostile_to(b, piece),
                _ => false,
            }
        })
    }

    /// A square is hostile to `piece` if it holds an enemy, is an empty
    /// throne, or is an escape corner (occupied or not).
    pub fn is_hostile_to(&self, pos: Position, piece: Occupant) -> bool {
        let Some(tile) = self.tile_at(pos) else {
            return false;
        };
        let Some(side) = piece.side() else {
            return false;
        };

        match tile.kind() {
            TileKind::Escape => true,
            TileKind::Throne if tile.occupant().is_empty() => true,
            _ => side.opponent().owns(tile.occupant()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{board_from, set_piece};

    #[test]
    fn test_regular_piece_capture_by_sandwich() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". A D A . . .",
            ". . . . . . .",
            ". . . . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        let captures = board.resolve_captures(Position::new(1, 3));

        assert_eq!(
            captures,
            vec![Capture {
                position: Position::new(1, 2),
                piece: Occupant::Defender
            }]
        );
        assert_eq!(board.occupant_at(Position::new(1, 2)), Occupant::Empty);
        assert_eq!(board.status(), GameStatus::Playing);
    }

    #[test]
    fn test_vertical_sandwich() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". . D . . . .",
            ". . A . . . .",
            ". . D . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        board.resolve_captures(Position::new(3, 2));
        assert_eq!(board.occupant_at(Position::new(2, 2)), Occupant::Empty);
    }

    #[test]
    fn test_capture_requires_opposite_side_hostility() {
        let mut board = board_from(&[
            ". . . . . . .",
            "A D . . . . .",
            ". . . . . . .",
            ". . . . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        assert!(!board.is_surrounded(Position::new(1, 1)));
        assert!(board.resolve_captures(Position::new(1, 0)).is_empty());
        assert_eq!(board.occupant_at(Position::new(1, 1)), Occupant::Defender);
    }

    #[test]
    fn test_friends_do_not_flank() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". A A A . . .",
            ". . . . . . .",
            ". D K D . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        assert!(board.resolve_captures(Position::new(1, 3)).is_empty());
        assert!(board.resolve_captures(Position::new(3, 3)).is_empty());
    }

    #[test]
    fn test_edge_does_not_flank() {
        let mut board = board_from(&[
            ". . . D . . .",
            ". . . A . . .",
            ". . . . . . .",
            ". . . . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        // The defender on the top edge has nothing above it.
        assert!(board.resolve_captures(Position::new(1, 3)).is_empty());
    }

    #[test]
    fn test_corner_is_hostile_to_all() {
        let mut board = board_from(&[
            ". A D . . . .",
            "D . . . . . .",
            "A . . . . . .",
            ". . . . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        // Attacker between corner and defender.
        assert_eq!(board.resolve_captures(Position::new(0, 2)).len(), 1);
        assert_eq!(board.occupant_at(Position::new(0, 1)), Occupant::Empty);

        // Defender between corner and attacker.
        assert_eq!(board.resolve_captures(Position::new(2, 0)).len(), 1);
        assert_eq!(board.occupant_at(Position::new(1, 0)), Occupant::Empty);
    }

    #[test]
    fn test_empty_throne_is_hostile_to_everyone() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . D . . .",
            ". A . K . . .",
            ". . . A . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);
        let throne = Position::new(3, 3);
        set_piece(&mut board, throne, Occupant::Empty);
        set_piece(&mut board, Position::new(6, 5), Occupant::King);
        set_piece(&mut board, Position::new(3, 2), Occupant::Defender);
        set_piece(&mut board, Position::new(1, 3), Occupant::Attacker);

        // Defender at (2, 3): attacker above, empty throne below.
        // Defender at (3, 2): attacker left, empty throne right.
        assert!(board.is_surrounded(Position::new(2, 3)));
        assert!(board.is_surrounded(Position::new(3, 2)));

        // An attacker next to the empty throne is just as exposed.
        set_piece(&mut board, Position::new(5, 3), Occupant::Defender);
        assert!(board.is_surrounded(Position::new(4, 3)));
    }

    #[test]
    fn test_occupied_throne_is_not_hostile_to_defenders() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". A D K . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        assert!(!board.is_surrounded(Position::new(3, 2)));
        assert!(board.resolve_captures(Position::new(3, 1)).is_empty());
    }

    #[test]
    fn test_king_hostile_to_attackers() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". K A D . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        let captures = board.resolve_captures(Position::new(1, 3));
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].piece, Occupant::Attacker);
    }

    #[test]
    fn test_king_captured_by_two_attackers() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". . A . . . .",
            ". . K . . . .",
            ". . A . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);
        // Move the king off its throne so only the attackers flank it.
        set_piece(&mut board, Position::new(2, 2), Occupant::Empty);
        set_piece(&mut board, Position::new(4, 4), Occupant::King);
        set_piece(&mut board, Position::new(3, 4), Occupant::Attacker);
        set_piece(&mut board, Position::new(5, 4), Occupant::Attacker);

        let captures = board.resolve_captures(Position::new(5, 4));
        assert_eq!(
            captures,
            vec![Capture {
                position: Position::new(4, 4),
                piece: Occupant::King
            }]
        );
        assert_eq!(board.status(), GameStatus::AttackersWon);
        assert_eq!(board.king_position(), None);
    }

    #[test]
    fn test_king_against_corner() {
        let mut board = board_from(&[
            ". K A . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        board.resolve_captures(Position::new(0, 2));
        assert_eq!(board.occupant_at(Position::new(0, 1)), Occupant::Empty);
        assert_eq!(board.status(), GameStatus::AttackersWon);
    }

    #[test]
    fn test_all_neighbors_checked_after_king_capture() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". A . A . . .",
            ". K A D . . .",
            ". A . A . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);
        // King at (2, 1) flanked above/below, defender at (2, 3) flanked above/below.
        let captures = board.resolve_captures(Position::new(2, 2));
        let taken: Vec<Occupant> = captures.iter().map(|c| c.piece).collect();
        assert_eq!(captures.len(), 2);
        assert!(taken.contains(&Occupant::King));
        assert!(taken.contains(&Occupant::Defender));
        assert_eq!(board.status(), GameStatus::AttackersWon);
    }

    #[test]
    fn test_perpendicular_flank_also_counts() {
        // The defender is already flanked vertically; an attacker arriving
        // beside it springs the capture.
        let mut board = board_from(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . A . . . .",
            ". A D . . . .",
            ". . A . . . .",
            ". . . . . . .",
            ". . . . . . K",
        ]);

        assert_eq!(board.resolve_captures(Position::new(3, 1)).len(), 1);
        assert_eq!(board.occupant_at(Position::new(3, 2)), Occupant::Empty);
    }

    #[test]
    fn test_resolving_twice_is_a_no_op() {
        let mut board = board_from(&[
            ". . . . . . .",
            ". A D A . . .",
            ". . A . . . .",
            ". . . . . . K",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);

        let first = board.resolve_captures(Position::new(1, 3));
        assert_eq!(first.len(), 1);
        let after_first = board.occupants();

        assert!(board.resolve_captures(Position::new(1, 3)).is_empty());
        assert_eq!(board.occupants(), after_first);
    }
}
