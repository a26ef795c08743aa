use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;
pub use catalog::*;
pub use source::*;

mod builtin;
mod catalog;
mod parser;
mod source;
mod writer;

/// A loaded level: its geometry plus the block layout the player starts with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub grid: Grid,
    pub initial: MapState,
}

impl Level {
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse_level(text)
    }

    /// Parses `text`, or falls back to a built-in level when it is absent or malformed.
    pub fn load_or_fallback(tag: &str, text: Option<&str>) -> Self {
        match text.map(Self::parse) {
            Some(Ok(level)) => level,
            Some(Err(err)) => {
                log::warn!("Level {} failed to load: {}", tag, err);
                Self::builtin(tag)
            }
            None => {
                log::warn!("Level {} has no level file", tag);
                Self::builtin(tag)
            }
        }
    }

    /// Writes the level back into its text form.
    pub fn to_text(&self) -> Result<alloc::string::String> {
        writer::write_level(&self.grid, &self.initial)
    }
}

impl FromStr for Level {
    type Err = GameError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

/// Shape a block glyph gives its cell; links are derived from it once the grid is read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum BlockShape {
    #[default]
    None,
    Corner,
    Up,
    Right,
    UpRight,
}

impl BlockShape {
    const fn links_up(self) -> bool {
        matches!(self, Self::Up | Self::UpRight)
    }

    const fn links_right(self) -> bool {
        matches!(self, Self::Right | Self::UpRight)
    }

    const fn glyph(self) -> char {
        match self {
            Self::None => '.',
            Self::Corner => 'o',
            Self::Up => '^',
            Self::Right => '>',
            Self::UpRight => 'l',
        }
    }

    fn from_connection(connection: Connection) -> Self {
        match (connection.toward(Direction::Up), connection.toward(Direction::Right)) {
            (true, true) => Self::UpRight,
            (true, false) => Self::Up,
            (false, true) => Self::Right,
            (false, false) => Self::Corner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
// a sample with every glyph
size: 6, 5
#o.o.#
.l>>o#
.^...@
p^.o..
.o....
";

    #[test]
    fn written_text_parses_back_to_the_same_level() {
        let level = Level::parse(LEVEL).unwrap();

        let text = level.to_text().unwrap();
        let reparsed = Level::parse(&text).unwrap();

        assert_eq!(reparsed, level);
        assert!(text.starts_with("size: 6,5\n#o.o.#\n.l>>o#\n"));
    }

    #[test]
    fn load_or_fallback_substitutes_builtin_levels() {
        let broken = Level::load_or_fallback("debugalpha", Some("size: 2"));
        assert_eq!(broken, Level::builtin("debugalpha"));

        let missing = Level::load_or_fallback("anything", None);
        assert_eq!(missing, Level::builtin("debug"));

        let loaded = Level::load_or_fallback("ok", Some("size: 2,1\np@"));
        assert_eq!(loaded.grid.size(), (2, 1));
    }
}
