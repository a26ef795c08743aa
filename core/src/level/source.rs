use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
};

use super::{Level, LevelCatalog};

/// Where level files and the level name list come from.
///
/// A missing entry is `None`; the caller decides on the fallback.
pub trait LevelSource {
    fn level_text(&self, tag: &str) -> Option<String>;

    fn catalog_text(&self) -> Option<String>;

    /// Parsed catalog. Empty when absent; a malformed line drops it and
    /// everything after it.
    fn catalog(&self) -> LevelCatalog {
        let Some(text) = self.catalog_text() else {
            log::warn!("No level names available");
            return LevelCatalog::default();
        };
        let (catalog, err) = LevelCatalog::parse_partial(&text);
        if let Some(err) = err {
            log::warn!(
                "Level names failed to load past {} entries: {}",
                catalog.len(),
                err
            );
        }
        catalog
    }

    fn load(&self, tag: &str) -> Level {
        Level::load_or_fallback(tag, self.level_text(tag).as_deref())
    }
}

/// In-memory [`LevelSource`], handy for bundled levels and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    levels: BTreeMap<String, String>,
    catalog: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, text: impl Into<String>) {
        self.levels.insert(tag.into(), text.into());
    }

    pub fn with_level(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(tag, text);
        self
    }

    pub fn with_catalog(mut self, text: impl Into<String>) -> Self {
        self.catalog = Some(text.into());
        self
    }
}

impl LevelSource for MemorySource {
    fn level_text(&self, tag: &str) -> Option<String> {
        self.levels.get(tag).map(ToString::to_string)
    }

    fn catalog_text(&self) -> Option<String> {
        self.catalog.clone()
    }
}
