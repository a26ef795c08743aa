use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// One reversible mutation, carrying the value from before it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryUnit {
    Player(Coord2),
    Block { coords: Coord2, cell: BlockCell },
    MoveCount(u32),
}

/// Stack of turns, each one a stack of [`HistoryUnit`]s undone last-in first-out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    turns: Vec<Vec<HistoryUnit>>,
    current: Vec<HistoryUnit>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits the turn being recorded, if it holds anything, and opens a new one.
    pub fn start_turn(&mut self) {
        if !self.current.is_empty() {
            let turn = core::mem::take(&mut self.current);
            self.turns.push(turn);
        }
    }

    pub fn record(&mut self, unit: HistoryUnit) {
        self.current.push(unit);
    }

    /// Records the player's old position and every cell that differs between the snapshots.
    pub fn record_transition(&mut self, before: &MapState, after: &MapState) {
        self.record(HistoryUnit::Player(before.player()));
        for ((coords, old), (_, new)) in before.iter_cells().zip(after.iter_cells()) {
            if old != new {
                self.record(HistoryUnit::Block { coords, cell: old });
            }
        }
    }

    /// Number of committed turns available to undo.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Reverts the most recent committed turn onto `state` and `move_count`.
    ///
    /// Returns `false` without touching anything when there is nothing to undo.
    pub fn rollback(&mut self, state: &mut MapState, move_count: &mut u32) -> bool {
        let Some(mut turn) = self.turns.pop() else {
            log::warn!("rollback: no history registered to roll back");
            return false;
        };

        while let Some(unit) = turn.pop() {
            match unit {
                HistoryUnit::Player(coords) => state.set_player(coords),
                HistoryUnit::Block { coords, cell } => {
                    if state.in_map(coords) {
                        state.set_cell(coords, cell);
                    } else {
                        log::warn!("rollback: block unit at {:?} is out of the map", coords);
                    }
                }
                HistoryUnit::MoveCount(count) => *move_count = count,
            }
        }
        true
    }
}
