//! Level files and the progress record on disk.

use anyhow::{Context, Result};
use crumbwarp_core::{LevelSource, Progress};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CATALOG_FILE: &str = "names.txt";
const PROGRESS_FILE: &str = "progress.json";

/// Levels stored as `<dir>/<tag>.txt`, with the catalog in `<dir>/names.txt`.
#[derive(Clone, Debug)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, file: &str) -> Option<String> {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("can't read {}: {}", path.display(), err);
                None
            }
        }
    }
}

impl LevelSource for DirSource {
    fn level_text(&self, tag: &str) -> Option<String> {
        // tags name files directly, so keep them inside the directory
        if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            log::warn!("Level tag {:?} is not a plain name", tag);
            return None;
        }
        self.read(&format!("{tag}.txt"))
    }

    fn catalog_text(&self) -> Option<String> {
        self.read(CATALOG_FILE)
    }
}

/// `$XDG_CONFIG_HOME/crumbwarp/progress.json`, or under `~/.config` when that isn't set.
pub fn default_progress_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("crumbwarp").join(PROGRESS_FILE)
}

/// A missing file is a fresh start; an unreadable one is logged and treated the same.
pub fn load_progress(path: &Path) -> Progress {
    match fs::read_to_string(path) {
        Ok(text) => Progress::from_json(&text),
        Err(err) if err.kind() == ErrorKind::NotFound => Progress::new(),
        Err(err) => {
            log::error!("Error occurred while loading {}: {}", path.display(), err);
            Progress::new()
        }
    }
}

/// Writes the progress record, creating the config directory if needed.
pub fn save_progress(path: &Path, progress: &Progress) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = progress.to_json().context("encoding progress")?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("progress saved to {}", path.display());
    Ok(())
}
