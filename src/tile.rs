use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Position;

/// Static classification of a square. Decided once when the board is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Normal,
    /// Corner square; only the king may enter, and reaching it wins for the defenders.
    Escape,
    /// The king's starting square.
    Throne,
}

/// Whatever stands on a square.
///
/// `OffBoard` is only ever produced by bounds-checked lookups such as
/// [`Board::occupant_at`](crate::Board::occupant_at); it is never stored in a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Empty,
    Attacker,
    Defender,
    King,
    OffBoard,
}

impl Occupant {
    /// Map a raw layout code (0 empty, 1 attacker, 2 defender, 3 king).
    pub fn from_code(code: u8) -> Option<Occupant> {
        match code {
            0 => Some(Occupant::Empty),
            1 => Some(Occupant::Attacker),
            2 => Some(Occupant::Defender),
            3 => Some(Occupant::King),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<u8> {
        match self {
            Occupant::Empty => Some(0),
            Occupant::Attacker => Some(1),
            Occupant::Defender => Some(2),
            Occupant::King => Some(3),
            Occupant::OffBoard => None,
        }
    }

    /// The side this piece fights for. The king counts as a defender.
    pub fn side(&self) -> Option<Side> {
        match self {
            Occupant::Attacker => Some(Side::Attackers),
            Occupant::Defender | Occupant::King => Some(Side::Defenders),
            Occupant::Empty | Occupant::OffBoard => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Occupant::Empty
    }

    pub fn is_piece(&self) -> bool {
        self.side().is_some()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Occupant::Empty => "empty",
            Occupant::Attacker => "attacker",
            Occupant::Defender => "defender",
            Occupant::King => "king",
            Occupant::OffBoard => "edge",
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Attackers,
    Defenders,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attackers => Side::Defenders,
            Side::Defenders => Side::Attackers,
        }
    }

    pub fn owns(&self, occupant: Occupant) -> bool {
        occupant.side() == Some(*self)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attackers => f.write_str("attackers"),
            Side::Defenders => f.write_str("defenders"),
        }
    }
}

/// One square of the board. Only the occupant ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    kind: TileKind,
    occupant: Occupant,
    position: Position,
}

impl Tile {
    pub(crate) fn new(kind: TileKind, occupant: Occupant, position: Position) -> Self {
        Tile {
            kind,
            occupant,
            position,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_occupant(&mut self, occupant: Occupant) {
        self.occupant = occupant;
    }

    pub(crate) fn clear(&mut self) {
        self.occupant = Occupant::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_both_ways() {
        for code in 0..=3 {
            let occupant = Occupant::from_code(code).unwrap();
            assert_eq!(occupant.code(), Some(code));
        }
        assert_eq!(Occupant::from_code(4), None);
        assert_eq!(Occupant::OffBoard.code(), None);
    }

    #[test]
    fn test_king_fights_for_defenders() {
        assert_eq!(Occupant::King.side(), Some(Side::Defenders));
        assert!(Side::Defenders.owns(Occupant::King));
        assert!(!Side::Attackers.owns(Occupant::King));
        assert!(!Side::Attackers.owns(Occupant::OffBoard));
        assert!(!Side::Defenders.owns(Occupant::Empty));
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Attackers.opponent(), Side::Defenders);
        assert_eq!(Side::Defenders.opponent(), Side::Attackers);
    }

    #[test]
    fn test_tile_only_occupant_changes() {
        let mut tile = Tile::new(TileKind::Throne, Occupant::King, Position::new(3, 3));
        tile.clear();
        assert_eq!(tile.occupant(), Occupant::Empty);
        assert_eq!(tile.kind(), TileKind::Throne);
        tile.set_occupant(Occupant::Attacker);
        assert_eq!(tile.occupant(), Occupant::Attacker);
        assert_eq!(tile.position(), Position::new(3, 3));
    }
}
