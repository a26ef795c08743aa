use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

use super::parser::ContentLines;
use crate::*;

/// Ordered list of playable level tags with their display names.
///
/// Parsed from lines of the form `tag: Display Name`, where the tag is made
/// of lowercase ASCII letters and digits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    tags: Vec<String>,
    names: BTreeMap<String, String>,
}

impl LevelCatalog {
    pub fn parse(text: &str) -> Result<Self> {
        match Self::parse_partial(text) {
            (catalog, None) => Ok(catalog),
            (_, Some(err)) => Err(err),
        }
    }

    /// Reads entries up to the first bad line. The entries before it are kept
    /// and the error for that line is returned alongside them.
    pub fn parse_partial(text: &str) -> (Self, Option<GameError>) {
        let mut catalog = Self::default();
        for (line, entry) in ContentLines::new(text) {
            if let Err(err) = catalog.push_entry(line, entry) {
                return (catalog, Some(err));
            }
        }
        log::debug!("level catalog lists {} levels", catalog.len());
        (catalog, None)
    }

    fn push_entry(&mut self, line: usize, entry: &str) -> Result<()> {
        let (tag, name) = entry
            .split_once(':')
            .ok_or(GameError::InvalidLevelName { line })?;
        let (tag, name) = (tag.trim(), name.trim());
        let valid_tag = !tag.is_empty()
            && tag
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if !valid_tag || name.is_empty() {
            return Err(GameError::InvalidLevelName { line });
        }
        if self.names.contains_key(tag) {
            return Err(GameError::DuplicateLevelTag { line });
        }

        self.tags.push(tag.to_string());
        self.names.insert(tag.to_string(), name.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_index(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|listed| listed == tag)
    }

    /// Tag of the level at `index`; past the end, alternates between the two debug levels.
    pub fn level_tag(&self, index: usize) -> &str {
        match self.tags.get(index) {
            Some(tag) => tag.as_str(),
            None if index % 2 == 0 => "debugalpha",
            None => "debug",
        }
    }

    pub fn level_name(&self, tag: &str) -> String {
        match self.names.get(tag) {
            Some(name) => name.clone(),
            None => {
                log::warn!("No assigned name for level tag {}", tag);
                format!("untitled: {}", tag)
            }
        }
    }

    /// Tag following `tag` in catalog order, if any.
    pub fn next_tag(&self, tag: &str) -> Option<&str> {
        let index = self.tag_index(tag)?;
        self.tags.get(index + 1).map(String::as_str)
    }
}
