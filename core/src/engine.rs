use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Abstract player input accepted by [`PlayEngine::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Reset,
    Undo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Moved(MoveOutcome),
    Reset { changed: bool },
    Undone { changed: bool },
}

impl CommandOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Moved(outcome) => outcome.success(),
            Self::Reset { changed } | Self::Undone { changed } => *changed,
        }
    }
}

/// One play session of a level: geometry, live state, initial snapshot and undo log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEngine {
    tag: String,
    grid: Grid,
    initial: MapState,
    state: MapState,
    history: History,
    move_count: u32,
}

impl PlayEngine {
    pub fn new(tag: impl Into<String>, level: Level) -> Self {
        let Level { grid, initial } = level;
        let mut history = History::new();
        history.start_turn();
        Self {
            tag: tag.into(),
            grid,
            state: initial.clone(),
            initial,
            history,
            move_count: 0,
        }
    }

    /// Loads `tag` from `source`, substituting a built-in level when that fails.
    pub fn open(tag: &str, source: &impl LevelSource) -> Self {
        Self::new(tag, source.load(tag))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn map_state(&self) -> &MapState {
        &self.state
    }

    pub fn initial_state(&self) -> &MapState {
        &self.initial
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn player(&self) -> Coord2 {
        self.state.player()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn is_won(&self) -> bool {
        self.state.player() == self.grid.target()
    }

    pub fn state(&self) -> EngineState {
        if self.is_won() {
            EngineState::Won
        } else if self.move_count == 0 {
            EngineState::Ready
        } else {
            EngineState::Active
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        Ok(match command {
            Command::Move(direction) => CommandOutcome::Moved(self.step(direction)?),
            Command::Reset => CommandOutcome::Reset {
                changed: self.reset(),
            },
            Command::Undo => CommandOutcome::Undone {
                changed: self.undo(),
            },
        })
    }

    /// Moves the player; a successful move becomes one undoable turn.
    pub fn step(&mut self, direction: Direction) -> Result<MoveOutcome> {
        self.check_not_finished()?;

        let before = self.state.clone();
        let outcome = self.state.try_move(&self.grid, direction);
        if outcome.success() {
            self.history.record_transition(&before, &self.state);
            self.history.record(HistoryUnit::MoveCount(self.move_count));
            self.move_count = self.move_count.saturating_add(1);
            self.history.start_turn();
            log::debug!(
                "{:?}: {:?} -> {:?} ({:?})",
                direction,
                before.player(),
                self.state.player(),
                outcome.kind()
            );
        }
        Ok(outcome)
    }

    /// Restores the initial snapshot as a single undoable turn. No-op before the first move.
    pub fn reset(&mut self) -> bool {
        if self.move_count == 0 {
            return false;
        }

        self.history.record_transition(&self.state, &self.initial);
        self.history.record(HistoryUnit::MoveCount(self.move_count));
        self.state = self.initial.clone();
        self.move_count = 0;
        self.history.start_turn();
        true
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.rollback(&mut self.state, &mut self.move_count);
        self.history.start_turn();
        undone
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state().is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
size: 7,4
.......
.>o....
p...>o@
.......
";

    fn engine() -> PlayEngine {
        PlayEngine::new("test", LEVEL.parse().unwrap())
    }

    fn snapshot(engine: &PlayEngine) -> (MapState, u32) {
        (engine.map_state().clone(), engine.move_count())
    }

    #[test]
    fn pair_teleports_and_undo_restores_everything() {
        let mut engine = engine();
        let start = snapshot(&engine);

        let outcome = engine.step(Direction::Right).unwrap();
        assert_eq!(outcome.kind(), MoveKind::Walked);
        assert!(!outcome.teleported());

        // stepping into the pair at (1..=2, 2) warps onto its twin at (4..=5, 1)
        let outcome = engine.step(Direction::Up).unwrap();
        assert!(outcome.teleported());
        assert_eq!(engine.player(), (4, 1));
        assert!(engine.map_state().cell_at((1, 2)).is_crumb());

        assert_eq!(engine.move_count(), 2);
        assert!(engine.undo());
        assert!(engine.undo());
        assert_eq!(snapshot(&engine), start);
        assert!(!engine.undo());
    }

    #[test]
    fn failed_moves_are_not_recorded() {
        let mut engine = engine();

        let outcome = engine.step(Direction::Left).unwrap();

        assert!(!outcome.success());
        assert_eq!(engine.move_count(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn reset_is_undoable_and_idempotent() {
        let mut engine = engine();
        engine.step(Direction::Right).unwrap();
        engine.step(Direction::Right).unwrap();
        let moved = snapshot(&engine);

        assert!(engine.reset());
        let after_reset = snapshot(&engine);
        assert_eq!(after_reset.0, *engine.initial_state());
        assert_eq!(after_reset.1, 0);

        assert!(!engine.reset());
        assert_eq!(snapshot(&engine), after_reset);
        assert_eq!(engine.history().len(), 3);

        assert!(engine.undo());
        assert_eq!(snapshot(&engine), moved);
    }

    #[test]
    fn reaching_the_target_ends_the_game() {
        let level: Level = "size: 3,1\np.@\n".parse().unwrap();
        let mut engine = PlayEngine::new("tiny", level);

        engine.apply(Command::Move(Direction::Right)).unwrap();
        let outcome = engine.apply(Command::Move(Direction::Right)).unwrap();
        assert!(outcome.has_update());
        assert_eq!(engine.state(), EngineState::Won);

        assert_eq!(
            engine.apply(Command::Move(Direction::Left)),
            Err(GameError::AlreadyEnded)
        );
        assert_eq!(
            engine.apply(Command::Undo),
            Ok(CommandOutcome::Undone { changed: true })
        );
        assert_eq!(engine.state(), EngineState::Active);
    }

    #[test]
    fn open_falls_back_to_a_builtin_level() {
        let source = MemorySource::new();

        let engine = PlayEngine::open("missing", &source);

        assert_eq!(engine.tag(), "missing");
        assert_eq!(engine.grid(), &Level::builtin("debug").grid);
        assert_eq!(engine.player(), (3, 1));
    }
}
