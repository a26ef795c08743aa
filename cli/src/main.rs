use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crumbwarp_core as game;
use game::{GameError, LevelCatalog, LevelSource, Progress};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use session::{GameSession, Input, describe};
use storage::DirSource;

mod session;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Directory with `<tag>.txt` level files and `names.txt`
    #[arg(short, long, default_value = "levels")]
    levels: PathBuf,

    /// Progress file [default: $XDG_CONFIG_HOME/crumbwarp/progress.json]
    #[arg(short, long)]
    progress: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Play a level; defaults to the last one played
    Play {
        tag: Option<String>,

        /// Apply these keys and print the result instead of reading stdin
        #[arg(short, long)]
        moves: Option<String>,
    },
    /// Parse a level file and print it back in normalized form
    Check {
        file: PathBuf,

        /// Print the parsed level as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the levels from the catalog
    Levels,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let progress_path = args
        .progress
        .clone()
        .unwrap_or_else(storage::default_progress_path);
    log::debug!("levels: {}", args.levels.display());
    log::debug!("progress: {}", progress_path.display());

    match args.command {
        Cmd::Play { tag, moves } => play(&args.levels, &progress_path, tag, moves),
        Cmd::Check { file, json } => check(&file, json),
        Cmd::Levels => list_levels(&args.levels, &progress_path),
    }
}

fn play(
    levels: &Path,
    progress_path: &Path,
    tag: Option<String>,
    moves: Option<String>,
) -> Result<()> {
    let source = DirSource::new(levels);
    let catalog = source.catalog();
    let mut progress = storage::load_progress(progress_path);

    let tag = tag.unwrap_or_else(|| {
        let last = progress.last_played();
        if catalog.tag_index(last).is_some() {
            last.to_string()
        } else {
            catalog.level_tag(0).to_string()
        }
    });
    if remember_last_played(&catalog, &mut progress, &tag) {
        storage::save_progress(progress_path, &progress)?;
    }

    let engine = game::PlayEngine::open(&tag, &source);
    let mut session = GameSession::new(engine, catalog.level_name(&tag));
    let mut out = io::stdout().lock();

    match moves {
        Some(keys) => {
            run_keys(&mut session, &keys)?;
            write!(out, "{}", session.render())?;
        }
        None => {
            write!(out, "{}", session.render())?;
            writeln!(out, "wasd: move, z: undo, r: reset, q: quit")?;
            for line in io::stdin().lock().lines() {
                let line = line.context("reading input")?;
                let quit = run_keys(&mut session, &line)?;
                write!(out, "{}", session.render())?;
                if quit {
                    break;
                }
            }
        }
    }

    if session.engine.is_won() {
        writeln!(out, "Solved in {} moves!", session.engine.move_count())?;
        if progress.add_solved(&tag) {
            storage::save_progress(progress_path, &progress)?;
        }
        if let Some(next) = catalog.next_tag(&tag) {
            writeln!(out, "Next up: {} ({})", catalog.level_name(next), next)?;
        }
    }
    Ok(())
}

/// Records `tag` as the level to resume, unless the catalog doesn't list it.
fn remember_last_played(catalog: &LevelCatalog, progress: &mut Progress, tag: &str) -> bool {
    if catalog.tag_index(tag).is_none() {
        log::debug!("{} is not in the catalog, keeping the last played level", tag);
        return false;
    }
    progress.update_last_played(tag)
}

/// Feeds `keys` to the session; returns `true` once a quit key is read.
fn run_keys(session: &mut GameSession, keys: &str) -> Result<bool> {
    for key in keys.chars().filter(|key| !key.is_whitespace()) {
        let command = match Input::from_key(key) {
            Some(Input::Command(command)) => command,
            Some(Input::Quit) => return Ok(true),
            None => {
                log::warn!("Unknown key {:?}", key);
                continue;
            }
        };

        match session.apply(command) {
            Ok(outcome) => {
                if let Some(note) = describe(&outcome) {
                    println!("{}", note);
                }
            }
            Err(GameError::AlreadyEnded) => {
                println!("Level solved, undo (z) or reset (r) to keep playing");
            }
            Err(err) => return Err(err).context("applying command"),
        }
    }
    Ok(false)
}

fn check(file: &Path, json: bool) -> Result<()> {
    let text =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let level = game::Level::parse(&text)
        .with_context(|| format!("{} is invalid", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&level)?);
    } else {
        print!("{}", level.to_text()?);
    }
    Ok(())
}

fn list_levels(levels: &Path, progress_path: &Path) -> Result<()> {
    let catalog = DirSource::new(levels).catalog();
    let progress = storage::load_progress(progress_path);
    if catalog.is_empty() {
        println!("No levels listed in {}", levels.join("names.txt").display());
        return Ok(());
    }

    for (index, tag) in catalog.tags().iter().enumerate() {
        let solved = if progress.is_solved(tag) { 'x' } else { ' ' };
        let last = if progress.last_played() == tag { " <" } else { "" };
        println!(
            "{:>3}. [{}] {:<12} {}{}",
            index + 1,
            solved,
            tag,
            catalog.level_name(tag),
            last
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_levels() -> DirSource {
        DirSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../levels"))
    }

    #[test]
    fn bundled_levels_are_solvable() {
        let source = bundled_levels();
        let catalog = source.catalog();
        assert_eq!(catalog.len(), 4);

        let solutions = [
            ("first", "ddd"),
            ("push", "ddddw"),
            ("twins", "ddsa"),
            ("crumble", "dda"),
        ];
        for (tag, keys) in solutions {
            let text = source.level_text(tag).unwrap();
            let level = game::Level::parse(&text).unwrap();
            let engine = game::PlayEngine::new(tag, level);
            let mut session = GameSession::new(engine, catalog.level_name(tag));

            assert!(!run_keys(&mut session, keys).unwrap());
            assert!(session.engine.is_won(), "{tag} not solved by {keys}");
        }
    }

    #[test]
    fn only_listed_levels_become_the_last_played() {
        let catalog = game::MemorySource::new()
            .with_catalog("first: First\npush: Push")
            .catalog();
        let mut progress = Progress::new();

        assert!(remember_last_played(&catalog, &mut progress, "push"));
        assert!(!remember_last_played(&catalog, &mut progress, "debug"));
        assert!(!remember_last_played(&catalog, &mut progress, "stray"));
        assert_eq!(progress.last_played(), "push");
        assert!(!remember_last_played(&catalog, &mut progress, "push"));
    }

    #[test]
    fn keys_stop_at_quit_and_survive_a_finished_level() {
        let level: game::Level = "size: 3,1\np.@".parse().unwrap();
        let mut session = GameSession::new(game::PlayEngine::new("tiny", level), String::new());

        assert!(!run_keys(&mut session, "dd d ?").unwrap());
        assert!(session.engine.is_won());
        assert!(run_keys(&mut session, "zq").unwrap());
        assert_eq!(session.engine.move_count(), 1);
    }
}
