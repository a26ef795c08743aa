use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Solved levels and the last one played, as stored in the progress file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Progress {
    #[serde(rename = "Progress", default)]
    solved: Vec<String>,
    #[serde(default)]
    version: String,
    #[serde(default)]
    last_played_level: String,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            version: current_version(),
            ..Self::default()
        }
    }

    /// Reads a progress document; anything unreadable yields empty progress.
    pub fn from_json(text: &str) -> Self {
        Self::try_from_json(text).unwrap_or_else(|err| {
            log::error!("Error occurred while loading progress: {}", err);
            Self::new()
        })
    }

    pub fn try_from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serializes with the running version stamped in.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut stamped = self.clone();
        stamped.stamp_version();
        serde_json::to_string_pretty(&stamped)
    }

    pub fn stamp_version(&mut self) {
        self.version = current_version();
    }

    /// Version string of whoever last wrote this record.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn solved(&self) -> &[String] {
        &self.solved
    }

    pub fn is_solved(&self, tag: &str) -> bool {
        self.solved.iter().any(|solved| solved == tag)
    }

    /// Returns `true` when `tag` wasn't solved before.
    pub fn add_solved(&mut self, tag: &str) -> bool {
        if self.is_solved(tag) {
            return false;
        }
        self.solved.push(tag.to_string());
        true
    }

    /// Empty when nothing has been played yet.
    pub fn last_played(&self) -> &str {
        &self.last_played_level
    }

    pub fn update_last_played(&mut self, tag: &str) -> bool {
        if self.last_played_level == tag {
            return false;
        }
        self.last_played_level = tag.to_string();
        true
    }
}

fn current_version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}
