use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// How a single move attempt resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Out of bounds, a wall, or an immovable group with a block in the way.
    Blocked,
    /// The player stepped from an empty cell.
    Walked,
    /// The player stepped out of a group that could not move.
    LeftGroup,
    /// The player's group slid one cell along with the player.
    Pushed,
}

impl MoveKind {
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// One teleport hop within a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroHistory {
    pub jump_point: Coord2,
    pub broke: Array2<bool>,
}

/// Ordered sub-steps of a move, for an animation driver to play back at its own pace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayStep {
    Walk { from: Coord2, to: Coord2 },
    Push { direction: Direction, cells: Vec<Coord2> },
    Crumble { cells: Vec<Coord2> },
    Jump { from: Coord2, to: Coord2 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    kind: MoveKind,
    direction: Direction,
    block_moved: Array2<bool>,
    jumps: Vec<MicroHistory>,
    replay: Vec<ReplayStep>,
}

impl MoveOutcome {
    pub(crate) fn blocked(direction: Direction, size: Coord2) -> Self {
        Self {
            kind: MoveKind::Blocked,
            direction,
            block_moved: Array2::from_elem(size.to_nd_index(), false),
            jumps: Vec::new(),
            replay: Vec::new(),
        }
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn success(&self) -> bool {
        self.kind.is_success()
    }

    pub fn teleported(&self) -> bool {
        !self.jumps.is_empty()
    }

    pub fn block_group_moved(&self) -> bool {
        matches!(self.kind, MoveKind::Pushed)
    }

    /// Cells whose block slid during this move, indexed by their position before the push.
    pub fn block_moved(&self) -> &Array2<bool> {
        &self.block_moved
    }

    pub fn jumps(&self) -> &[MicroHistory] {
        &self.jumps
    }

    pub fn replay(&self) -> &[ReplayStep] {
        &self.replay
    }

    pub(crate) fn set_kind(&mut self, kind: MoveKind) {
        self.kind = kind;
    }

    pub(crate) fn mark_moved(&mut self, coords: Coord2) {
        self.block_moved[coords.to_nd_index()] = true;
    }

    pub(crate) fn push_step(&mut self, step: ReplayStep) {
        self.replay.push(step);
    }

    pub(crate) fn push_jump(&mut self, jump: MicroHistory) {
        self.jumps.push(jump);
    }
}
