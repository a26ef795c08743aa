use crumbwarp_core as game;
use game::{Command, CommandOutcome, Direction, MoveOutcome, ReplayStep};
use std::fmt::Write;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Command(Command),
    Quit,
}

impl Input {
    /// `wasd` to move, `z` to undo, `r` to reset, `q` to quit.
    pub(crate) fn from_key(key: char) -> Option<Self> {
        let command = match key.to_ascii_lowercase() {
            'w' => Command::Move(Direction::Up),
            'a' => Command::Move(Direction::Left),
            's' => Command::Move(Direction::Down),
            'd' => Command::Move(Direction::Right),
            'z' => Command::Undo,
            'r' => Command::Reset,
            'q' => return Some(Self::Quit),
            _ => return None,
        };
        Some(Self::Command(command))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Floor,
    Wall,
    Target,
    Player { on_block: bool },
    Block { up: bool, right: bool },
    Crumb,
}

impl ViewCellState {
    fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Target => '@',
            Self::Player { on_block: false } => 'p',
            Self::Player { on_block: true } => 'P',
            Self::Block { up: true, right: true } => 'l',
            Self::Block { up: true, right: false } => '^',
            Self::Block { up: false, right: true } => '>',
            Self::Block { .. } => 'o',
            Self::Crumb => '*',
        }
    }
}

/// A level being played in the terminal.
#[derive(Clone, Debug)]
pub(crate) struct GameSession {
    pub engine: game::PlayEngine,
    pub name: String,
}

impl GameSession {
    pub(crate) fn new(engine: game::PlayEngine, name: String) -> Self {
        Self { engine, name }
    }

    pub(crate) fn apply(&mut self, command: Command) -> game::Result<CommandOutcome> {
        let outcome = self.engine.apply(command)?;
        log::trace!("{:?} -> {:?}", command, outcome);
        Ok(outcome)
    }

    fn cell_state_at(&self, coords: game::Coord2) -> ViewCellState {
        let cell = self.engine.map_state().cell_at(coords);
        if coords == self.engine.player() {
            ViewCellState::Player {
                on_block: cell.has_block(),
            }
        } else if cell.has_block() {
            ViewCellState::Block {
                up: cell.is_connected(Direction::Up),
                right: cell.is_connected(Direction::Right),
            }
        } else if cell.is_crumb() {
            ViewCellState::Crumb
        } else if coords == self.engine.grid().target() {
            ViewCellState::Target
        } else if self.engine.grid().is_wall(coords) {
            ViewCellState::Wall
        } else {
            ViewCellState::Floor
        }
    }

    /// Title line followed by the board, top row first.
    pub(crate) fn render(&self) -> String {
        let (width, height) = self.engine.grid().size();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} [{}]  moves: {}",
            self.name,
            self.engine.tag(),
            self.engine.move_count()
        );
        for y in (0..height).rev() {
            out.extend((0..width).map(|x| self.cell_state_at((x, y)).glyph()));
            out.push('\n');
        }
        out
    }
}

/// Short note about what a command did, if anything worth telling happened.
pub(crate) fn describe(outcome: &CommandOutcome) -> Option<String> {
    match outcome {
        CommandOutcome::Moved(moved) => describe_move(moved),
        CommandOutcome::Reset { changed: true } => Some("level reset".to_string()),
        CommandOutcome::Undone { changed: true } => Some("undone".to_string()),
        CommandOutcome::Reset { changed: false }
        | CommandOutcome::Undone { changed: false } => None,
    }
}

fn describe_move(outcome: &MoveOutcome) -> Option<String> {
    if !outcome.success() {
        return Some(format!("blocked ({:?})", outcome.direction()));
    }
    let notes: Vec<String> = outcome
        .replay()
        .iter()
        .filter_map(|step| match step {
            ReplayStep::Push { cells, .. } => Some(format!("pushed {} blocks", cells.len())),
            ReplayStep::Jump { from, to } => Some(format!("warped {:?} -> {:?}", from, to)),
            ReplayStep::Walk { .. } | ReplayStep::Crumble { .. } => None,
        })
        .collect();
    (!notes.is_empty()).then(|| notes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
size: 5,3
#...@
p>o..
.....
";

    fn session() -> GameSession {
        let engine = game::PlayEngine::new("test", LEVEL.parse().unwrap());
        GameSession::new(engine, "Test Level".to_string())
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            Input::from_key('W'),
            Some(Input::Command(Command::Move(Direction::Up)))
        );
        assert_eq!(Input::from_key('z'), Some(Input::Command(Command::Undo)));
        assert_eq!(Input::from_key('q'), Some(Input::Quit));
        assert_eq!(Input::from_key('x'), None);
    }

    #[test]
    fn render_draws_the_player_over_blocks() {
        let mut session = session();
        assert_eq!(
            session.render(),
            "Test Level [test]  moves: 0\n#...@\np>o..\n.....\n"
        );

        let outcome = session.apply(Command::Move(Direction::Right)).unwrap();
        assert_eq!(describe(&outcome), None);
        assert_eq!(
            session.render(),
            "Test Level [test]  moves: 1\n#...@\n.Po..\n.....\n"
        );

        let outcome = session.apply(Command::Move(Direction::Right)).unwrap();
        assert_eq!(describe(&outcome).as_deref(), Some("pushed 2 blocks"));
        assert_eq!(
            session.render(),
            "Test Level [test]  moves: 2\n#...@\n..Po.\n.....\n"
        );
    }

    #[test]
    fn blocked_moves_and_noop_commands() {
        let mut session = session();

        let outcome = session.apply(Command::Move(Direction::Left)).unwrap();
        assert_eq!(describe(&outcome).as_deref(), Some("blocked (Left)"));

        let outcome = session.apply(Command::Reset).unwrap();
        assert_eq!(describe(&outcome), None);
    }
}
