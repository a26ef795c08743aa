use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mutable per-turn puzzle state: where the player is and what every cell holds.
///
/// Cloning copies the block array; the [`Grid`] is never part of the snapshot and is passed
/// alongside by reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapState {
    player: Coord2,
    blocks: Array2<BlockCell>,
}

impl MapState {
    pub fn new(grid: &Grid, player: Coord2, blocks: Array2<BlockCell>) -> Result<Self> {
        let (width, height) = grid.size();
        if blocks.dim() != (width.into(), height.into()) {
            return Err(GameError::InvalidBoardShape);
        }
        if !grid.is_open(player) {
            return Err(GameError::InvalidCoords);
        }
        Ok(Self { player, blocks })
    }

    /// State with the player on the grid's start cell and no blocks.
    pub fn empty(grid: &Grid) -> Self {
        Self {
            player: grid.start(),
            blocks: Array2::from_elem(grid.size().to_nd_index(), BlockCell::EMPTY),
        }
    }

    pub fn player(&self) -> Coord2 {
        self.player
    }

    pub fn size(&self) -> Coord2 {
        self.blocks.grid_size()
    }

    pub fn in_map(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn cell_at(&self, coords: Coord2) -> BlockCell {
        if self.in_map(coords) {
            self.blocks[coords.to_nd_index()]
        } else {
            BlockCell::EMPTY
        }
    }

    pub fn has_block(&self, coords: Coord2) -> bool {
        self.cell_at(coords).has_block()
    }

    /// Whether the block at `coords` is linked to its neighbour in `direction`.
    pub fn is_connected(&self, coords: Coord2, direction: Direction) -> bool {
        self.cell_at(coords).is_connected(direction)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|cell| cell.has_block()).count()
    }

    /// Every cell with its coordinates, x-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, BlockCell)> + '_ {
        let (width, height) = self.size();
        (0..width)
            .flat_map(move |x| (0..height).map(move |y| (x, y)))
            .map(|coords| (coords, self.blocks[coords.to_nd_index()]))
    }

    pub(crate) fn set_player(&mut self, coords: Coord2) {
        self.player = coords;
    }

    pub(crate) fn set_cell(&mut self, coords: Coord2, cell: BlockCell) {
        self.blocks[coords.to_nd_index()] = cell;
    }

    /// Places a block with the given links; for building states outside the level parser.
    pub fn place_block(&mut self, coords: Coord2, connection: Connection) -> Result<()> {
        if !self.in_map(coords) {
            return Err(GameError::InvalidCoords);
        }
        self.set_cell(coords, BlockCell::block(connection));
        Ok(())
    }

    pub(crate) fn group_at(&self, start: Coord2, adjacency: Adjacency) -> BlockGroup {
        let mut visited = self.unvisited();
        BlockGroup::discover(&self.blocks, start, &mut visited, adjacency)
    }

    pub(crate) fn unvisited(&self) -> Array2<bool> {
        Array2::from_elem(self.blocks.dim(), false)
    }

    pub(crate) fn blocks(&self) -> &Array2<BlockCell> {
        &self.blocks
    }

    /// Resolves one step of the player toward `direction`.
    ///
    /// A blocked attempt returns [`MoveKind::Blocked`] and leaves the state untouched.
    pub fn try_move(&mut self, grid: &Grid, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::blocked(direction, self.size());
        let from = self.player;

        let Some(target) = direction.step(from, self.size()) else {
            return outcome;
        };
        if grid.is_wall(target) {
            return outcome;
        }

        if self.has_block(from) {
            let group = self.group_at(from, Adjacency::Linked);
            if self.group_is_blocked(grid, &group, direction) {
                if self.has_block(target) {
                    log::trace!("group at {:?} is stuck moving {:?}", from, direction);
                    return outcome;
                }

                outcome.set_kind(MoveKind::LeftGroup);
                outcome.push_step(ReplayStep::Walk { from, to: target });
                self.player = target;
                self.clear_crumbs();
                return outcome;
            }

            self.translate_group(&group, direction, &mut outcome);
            outcome.set_kind(MoveKind::Pushed);
        } else {
            outcome.set_kind(MoveKind::Walked);
            outcome.push_step(ReplayStep::Walk { from, to: target });
        }

        self.player = target;
        self.clear_crumbs();
        self.resolve_teleports(&mut outcome);
        outcome
    }

    /// A single member with a wall, the edge, or a foreign block ahead blocks the whole group.
    fn group_is_blocked(&self, grid: &Grid, group: &BlockGroup, direction: Direction) -> bool {
        group.iter().any(|coords| match direction.step(coords, self.size()) {
            None => true,
            Some(next) => grid.is_wall(next) || (self.has_block(next) && !group.contains(next)),
        })
    }

    fn translate_group(
        &mut self,
        group: &BlockGroup,
        direction: Direction,
        outcome: &mut MoveOutcome,
    ) {
        // lift everything first so overlapping source and destination cells don't clobber
        let lifted: Vec<_> = group
            .iter()
            .map(|coords| {
                let cell = self.blocks[coords.to_nd_index()];
                self.set_cell(coords, BlockCell::EMPTY);
                outcome.mark_moved(coords);
                (coords, cell)
            })
            .collect();

        for (coords, cell) in lifted {
            if let Some(next) = direction.step(coords, self.size()) {
                self.set_cell(next, cell);
            }
        }

        outcome.push_step(ReplayStep::Push {
            direction,
            cells: group.to_vec(),
        });
    }

    pub(crate) fn clear_crumbs(&mut self) {
        for cell in self.blocks.iter_mut().filter(|cell| cell.is_crumb()) {
            *cell = BlockCell::EMPTY;
        }
    }
}
