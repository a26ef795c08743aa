use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No text detected")]
    NoText,
    #[error("Invalid file format at line {line}")]
    MalformedLine { line: usize },
    #[error("Expected a size header at line {line}")]
    WrongHeaderTag { line: usize },
    #[error("Invalid size value at line {line}")]
    InvalidSize { line: usize },
    #[error("{missing} grid rows missing")]
    MissingRows { missing: usize },
    #[error("Row at line {line} is {found} cells wide, expected {expected}")]
    WrongRowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Player is defined twice, line {line}")]
    DuplicatePlayer { line: usize },
    #[error("Target is defined twice, line {line}")]
    DuplicateTarget { line: usize },
    #[error("Player is missing")]
    MissingPlayer,
    #[error("Target is missing")]
    MissingTarget,
    #[error("Invalid tile type '{glyph}' at line {line}")]
    InvalidGlyph { line: usize, glyph: char },
    #[error("'{glyph}' can't be placed on the grid edge, line {line}")]
    GlyphAtEdge { line: usize, glyph: char },
    #[error("Invalid connection '{glyph}' at {coords:?}, line {line}")]
    InvalidConnection {
        line: usize,
        glyph: char,
        coords: Coord2,
    },
    #[error("Two markers share the cell {coords:?}")]
    OverlappingMarkers { coords: Coord2 },
    #[error("Invalid level name format at line {line}")]
    InvalidLevelName { line: usize },
    #[error("Level tag is listed twice, line {line}")]
    DuplicateLevelTag { line: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
