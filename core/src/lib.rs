#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use group::*;
pub use history::*;
pub use level::*;
pub use progress::*;
pub use replay::*;
pub use state::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod group;
mod history;
mod level;
mod progress;
mod replay;
mod state;
mod teleport;
mod tile;
mod types;

/// Immutable level geometry: size, walls, and the start and target cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    walls: Array2<bool>,
    start: Coord2,
    target: Coord2,
}

impl Grid {
    pub fn new(walls: Array2<bool>, start: Coord2, target: Coord2) -> Result<Self> {
        let (width, height) = walls.dim();
        let max = usize::from(Coord::MAX);
        if width == 0 || height == 0 || width > max || height > max {
            return Err(GameError::InvalidBoardShape);
        }

        let grid = Self {
            walls,
            start,
            target,
        };
        for coords in [start, target] {
            grid.validate_coords(coords)?;
            if grid.is_wall(coords) {
                return Err(GameError::InvalidCoords);
            }
        }
        Ok(grid)
    }

    /// Open grid of the given size with no walls.
    pub fn open(size: Coord2, start: Coord2, target: Coord2) -> Result<Self> {
        Self::new(Array2::default(size.to_nd_index()), start, target)
    }

    pub fn size(&self) -> Coord2 {
        self.walls.grid_size()
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn target(&self) -> Coord2 {
        self.target
    }

    pub fn in_map(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_map(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Walls are reported for in-bounds cells only; anything outside is simply not a wall.
    pub fn is_wall(&self, coords: Coord2) -> bool {
        self.in_map(coords) && self.walls[coords.to_nd_index()]
    }

    /// Whether the player may stand on `coords`, ignoring blocks.
    pub fn is_open(&self, coords: Coord2) -> bool {
        self.in_map(coords) && !self.walls[coords.to_nd_index()]
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&wall| wall).count()
    }
}

/// Wall lookup for coordinates already known to be inside the grid.
///
/// Panics when `coords` lie outside it; use [`Grid::is_wall`] for unchecked input.
impl Index<Coord2> for Grid {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.walls[coords.to_nd_index()]
    }
}
