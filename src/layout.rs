use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::LayoutError;

/// Board size constants
pub const STANDARD_SIZE: usize = 11;
pub const STANDARD_7X7_SIZE: usize = 7;
pub const MIN_BOARD_SIZE: usize = 5;
/// Files are single letters.
pub const MAX_BOARD_SIZE: usize = 26;

const STANDARD: [[u8; STANDARD_SIZE]; STANDARD_SIZE] = [
    [0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 2, 2, 2, 0, 0, 0, 1],
    [1, 1, 0, 2, 2, 3, 2, 2, 0, 1, 1],
    [1, 0, 0, 0, 2, 2, 2, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0],
];

const STANDARD_7X7: [[u8; STANDARD_7X7_SIZE]; STANDARD_7X7_SIZE] = [
    [0, 0, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 0, 0, 0],
    [1, 0, 2, 2, 2, 0, 1],
    [1, 1, 2, 3, 2, 1, 1],
    [1, 0, 2, 2, 2, 0, 1],
    [0, 0, 0, 1, 0, 0, 0],
    [0, 0, 1, 1, 1, 0, 0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Standard,    // 11x11
    Standard7x7, // 7x7
}

impl Variant {
    pub fn board_size(&self) -> usize {
        match self {
            Variant::Standard => STANDARD_SIZE,
            Variant::Standard7x7 => STANDARD_7X7_SIZE,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Variant::Standard => "standard",
            Variant::Standard7x7 => "standard_7x7",
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Variant::Standard => Layout::standard(),
            Variant::Standard7x7 => Layout::standard_7x7(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" | "11x11" => Ok(Variant::Standard),
            "standard_7x7" | "7x7" => Ok(Variant::Standard7x7),
            other => Err(format!(
                "unknown variant `{other}` (expected standard or standard_7x7)"
            )),
        }
    }
}

/// A starting position as a matrix of raw occupant codes
/// (0 empty, 1 attacker, 2 defender, 3 king).
///
/// Nothing is checked here; [`Board::new`](crate::Board::new) validates the
/// shape and the codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayoutFile")]
pub struct Layout {
    layout: Vec<Vec<u8>>,
}

/// Layout files are either a bare matrix or `{"layout": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutFile {
    Bare(Vec<Vec<u8>>),
    Wrapped { layout: Vec<Vec<u8>> },
}

impl From<LayoutFile> for Layout {
    fn from(file: LayoutFile) -> Self {
        match file {
            LayoutFile::Bare(layout) | LayoutFile::Wrapped { layout } => Layout { layout },
        }
    }
}

impl Layout {
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Layout { layout: rows }
    }

    pub fn standard() -> Self {
        Layout::new(STANDARD.iter().map(|row| row.to_vec()).collect())
    }

    pub fn standard_7x7() -> Self {
        Layout::new(STANDARD_7X7.iter().map(|row| row.to_vec()).collect())
    }

    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.layout
    }
}
