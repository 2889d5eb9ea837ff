use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::Move;
use crate::error::{NotationError, SetupError};
use crate::layout::{Layout, MAX_BOARD_SIZE, MIN_BOARD_SIZE, Variant};
use crate::notation::{Square, parse_notation, to_notation};
use crate::tile::{Occupant, Side, Tile, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// The adjacent position in `dir`, or `None` when it would fall off the
    /// top or left edge. The bottom and right edges depend on the board size
    /// and are checked by [`Board::is_on_board`].
    pub fn step(&self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        Some(Position::new(
            self.row.checked_add_signed(dr)?,
            self.col.checked_add_signed(dc)?,
        ))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Above,
    Below,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Above,
        Direction::Below,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Above => (-1, 0),
            Direction::Below => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// The four orthogonal neighbors of a square; off-board ones are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors([Option<Position>; 4]);

impl Neighbors {
    pub fn get(&self, dir: Direction) -> Option<Position> {
        self.0[dir.index()]
    }

    pub fn above(&self) -> Option<Position> {
        self.get(Direction::Above)
    }

    pub fn below(&self) -> Option<Position> {
        self.get(Direction::Below)
    }

    pub fn left(&self) -> Option<Position> {
        self.get(Direction::Left)
    }

    pub fn right(&self) -> Option<Position> {
        self.get(Direction::Right)
    }

    /// On-board neighbors only.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    AttackersWon,
    DefendersWon,
}

/// What the outside world gets to see of a board after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub size: usize,
    pub grid: Vec<Vec<Occupant>>,
    pub turn: Side,
    pub status: GameStatus,
}

/// The game board: a flat arena of tiles plus whose turn it is and whether
/// the game is still running.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    turn: Side,
    status: GameStatus,
}

impl Board {
    /// Build a board from a layout of raw occupant codes.
    ///
    /// Corners become escape tiles and the king's starting square becomes the
    /// throne. The attackers move first.
    pub fn new(layout: &Layout) -> Result<Self, SetupError> {
        let rows = layout.rows();
        let size = rows.len();

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(SetupError::NonSquareBoard {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
        }
        if size < MIN_BOARD_SIZE {
            return Err(SetupError::BoardTooSmall(size));
        }
        if size > MAX_BOARD_SIZE {
            return Err(SetupError::BoardTooLarge(size));
        }

        let mut tiles = Vec::with_capacity(size * size);
        let mut kings = 0;
        for (row, cells) in rows.iter().enumerate() {
            for (col, &code) in cells.iter().enumerate() {
                let occupant = Occupant::from_code(code)
                    .ok_or(SetupError::InvalidPieceCode { row, col, code })?;
                let pos = Position::new(row, col);
                let kind = if is_corner(pos, size) {
                    TileKind::Escape
                } else if occupant == Occupant::King {
                    TileKind::Throne
                } else {
                    TileKind::Normal
                };
                if occupant == Occupant::King {
                    kings += 1;
                }
                tiles.push(Tile::new(kind, occupant, pos));
            }
        }
        if kings != 1 {
            return Err(SetupError::MissingOrDuplicateKing { found: kings });
        }

        Ok(Board {
            size,
            tiles,
            turn: Side::Attackers,
            status: GameStatus::Playing,
        })
    }

    pub fn from_variant(variant: Variant) -> Self {
        match Board::new(&variant.layout()) {
            Ok(board) => board,
            Err(err) => unreachable!("preset {variant} is invalid: {err}"),
        }
    }

    /// 11x11 preset
    pub fn standard() -> Self {
        Self::from_variant(Variant::Standard)
    }

    /// 7x7 preset
    pub fn standard_7x7() -> Self {
        Self::from_variant(Variant::Standard7x7)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn is_on_board(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.is_on_board(pos).then(|| pos.row * self.size + pos.col)
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    /// Never fails: positions off the grid report [`Occupant::OffBoard`].
    pub fn occupant_at(&self, pos: Position) -> Occupant {
        self.tile_at(pos)
            .map_or(Occupant::OffBoard, |tile| tile.occupant())
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tile_at(pos).map(Tile::kind)
    }

    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        pos.step(dir).filter(|&p| self.is_on_board(p))
    }

    pub fn neighbors(&self, pos: Position) -> Neighbors {
        Neighbors(Direction::ALL.map(|dir| self.neighbor(pos, dir)))
    }

    /// Squares from `origin` (exclusive) to `destination` (inclusive), one step
    /// at a time. `None` unless both are on the board and share a row or a
    /// column.
    pub fn straight_path(&self, origin: Position, destination: Position) -> Option<Vec<Position>> {
        if !self.is_on_board(origin) || !self.is_on_board(destination) {
            return None;
        }
        let dir = if origin.row == destination.row {
            if destination.col > origin.col {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if origin.col == destination.col {
            if destination.row > origin.row {
                Direction::Below
            } else {
                Direction::Above
            }
        } else {
            return None;
        };

        let mut path = Vec::new();
        let mut current = origin;
        while current != destination {
            current = current.step(dir)?;
            path.push(current);
        }
        Some(path)
    }

    pub(crate) fn set_occupant(&mut self, pos: Position, occupant: Occupant) {
        if let Some(idx) = self.index(pos) {
            self.tiles[idx].set_occupant(occupant);
        }
    }

    pub(crate) fn clear(&mut self, pos: Position) {
        if let Some(idx) = self.index(pos) {
            self.tiles[idx].clear();
        }
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        // Once decided, a game stays decided.
        if self.status == GameStatus::Playing {
            self.status = status;
        }
    }

    pub(crate) fn pass_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }

    pub fn king_position(&self) -> Option<Position> {
        self.tiles
            .iter()
            .find(|tile| tile.occupant() == Occupant::King)
            .map(Tile::position)
    }

    pub fn throne_position(&self) -> Option<Position> {
        self.tiles
            .iter()
            .find(|tile| tile.kind() == TileKind::Throne)
            .map(Tile::position)
    }

    pub fn occupants(&self) -> Vec<Vec<Occupant>> {
        self.tiles
            .chunks(self.size)
            .map(|row| row.iter().map(Tile::occupant).collect())
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            grid: self.occupants(),
            turn: self.turn,
            status: self.status,
        }
    }

    pub fn parse_position(&self, text: &str) -> Result<Position, NotationError> {
        parse_notation(text, self.size)
    }

    pub fn notation(&self, pos: Position) -> String {
        to_notation(pos, self.size)
    }

    pub fn square(&self, pos: Position) -> Square {
        Square::new(pos, self.size)
    }

    /// Every move the given side could make right now.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for tile in self.tiles.iter().filter(|t| side.owns(t.occupant())) {
            let from = tile.position();
            let piece = tile.occupant();
            for dir in Direction::ALL {
                let mut current = from;
                while let Some(to) = self.neighbor(current, dir) {
                    if !self.occupant_at(to).is_empty() {
                        break;
                    }
                    current = to;
                    // Restricted squares can be passed over, not landed on.
                    let restricted = matches!(
                        self.kind_at(to),
                        Some(TileKind::Escape | TileKind::Throne)
                    );
                    if restricted && piece != Occupant::King {
                        continue;
                    }
                    moves.push(Move::new(from, to));
                }
            }
        }
        moves
    }
}

fn is_corner(pos: Position, size: usize) -> bool {
    (pos.row == 0 || pos.row == size - 1) && (pos.col == 0 || pos.col == size - 1)
}

/// Plain rendering uses letters; the alternate form (`{:#}`) draws pieces as
/// blocks and empty squares as box-drawing lines joining their empty
/// neighbors, so open lanes are visible at a glance.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files: String = (0..self.size)
            .map(|col| format!(" {} ", (b'a' + col as u8) as char))
            .collect();

        writeln!(f, "   {files}")?;
        for (row, tiles) in self.tiles.chunks(self.size).enumerate() {
            let rank = self.size - row;
            write!(f, "{rank:<2} ")?;
            for tile in tiles {
                if f.alternate() {
                    f.write_str(self.glyph(tile))?;
                    continue;
                }
                let c = match (tile.kind(), tile.occupant()) {
                    (TileKind::Escape, Occupant::Empty) => 'X',
                    (TileKind::Throne, Occupant::Empty) => 'T',
                    (_, Occupant::Attacker) => 'A',
                    (_, Occupant::Defender) => 'D',
                    (_, Occupant::King) => 'K',
                    (_, Occupant::Empty | Occupant::OffBoard) => '.',
                };
                write!(f, " {c} ")?;
            }
            writeln!(f, " {rank}")?;
        }
        writeln!(f, "   {files}")
    }
}

impl Board {
    fn glyph(&self, tile: &Tile) -> &'static str {
        match (tile.kind(), tile.occupant()) {
            (_, Occupant::Attacker) => " █ ",
            (_, Occupant::Defender) => " ░ ",
            (_, Occupant::King) => " K ",
            (TileKind::Escape, _) => " ╳ ",
            (TileKind::Throne, _) => " ▣ ",
            (TileKind::Normal, _) => {
                let neighbors = self.neighbors(tile.position());
                let open = |n: Option<Position>| n.is_some_and(|p| self.occupant_at(p).is_empty());
                match (
                    open(neighbors.left()),
                    open(neighbors.right()),
                    open(neighbors.above()),
                    open(neighbors.below()),
                ) {
                    (true, true, true, true) => "═╬═",
                    (true, true, true, false) => "═╩═",
                    (true, true, false, true) => "═╦═",
                    (true, true, false, false) => "═══",
                    (true, false, true, true) => "═╣ ",
                    (true, false, true, false) => "═╝ ",
                    (true, false, false, true) => "═╗ ",
                    (true, false, false, false) => "═╡ ",
                    (false, true, true, true) => " ╠═",
                    (false, true, true, false) => " ╚═",
                    (false, true, false, true) => " ╔═",
                    (false, true, false, false) => " ╞═",
                    (false, false, true, true) => " ║ ",
                    (false, false, true, false) => " ╨ ",
                    (false, false, false, true) => " ╥ ",
                    (false, false, false, false) => "   ",
                }
            }
        }
    }
}
