//! Rank/file notation, as used on chess boards.
//!
//! Files are letters starting at `a` on the left, ranks are numbers starting
//! at `1` on the *bottom* row, so `a1` is `(size - 1, 0)` in matrix terms.

use std::fmt;

use crate::board::Position;
use crate::error::NotationError;

/// Parse a square such as `d4` into a zero-based position on a `size`×`size` board.
pub fn parse_notation(text: &str, size: usize) -> Result<Position, NotationError> {
    let malformed = || NotationError::Malformed(text.to_string());

    let mut chars = text.chars();
    let file = chars
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .ok_or_else(malformed)?
        .to_ascii_lowercase();
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let last = last_file(size);
    let col = (file as u8 - b'a') as usize;
    if col >= size {
        return Err(NotationError::FileOutOfRange { file, last });
    }

    // All digits, so the only failure left is overflow, which is out of range anyway.
    let rank: u64 = digits.parse().unwrap_or(u64::MAX);
    if rank == 0 || rank > size as u64 {
        return Err(NotationError::RankOutOfRange { rank, size });
    }

    Ok(Position::new(size - rank as usize, col))
}

/// Inverse of [`parse_notation`] for on-board positions.
pub fn to_notation(pos: Position, size: usize) -> String {
    let file = (b'a' + pos.col as u8) as char;
    format!("{}{}", file, size - pos.row)
}

/// A position together with the size of its board, so it can be shown the
/// way players type it. Off-board positions fall back to `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub position: Position,
    pub size: usize,
}

impl Square {
    pub fn new(position: Position, size: usize) -> Self {
        Square { position, size }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Position { row, col } = self.position;
        if row < self.size && col < self.size && self.size <= 26 {
            f.write_str(&to_notation(self.position, self.size))
        } else {
            write!(f, "{}", self.position)
        }
    }
}

fn last_file(size: usize) -> char {
    (b'a' + size.saturating_sub(1).min(25) as u8) as char
}
