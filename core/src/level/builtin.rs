use core::ops::Range;
use ndarray::Array2;

use super::Level;
use crate::*;

const DEBUG_SIZE: Coord2 = (8, 6);

impl Level {
    /// Hardcoded level substituted whenever a level file can't be read.
    ///
    /// `"debugalpha"` has its own layout; every other tag gets `"debug"`.
    pub fn builtin(tag: &str) -> Self {
        match tag {
            "debugalpha" => walled_room((6, 2), (0, 5), 1..2, 1..5),
            _ => {
                if tag != "debug" {
                    log::warn!("Level {} is not pre-defined, using debug", tag);
                }
                walled_room((3, 1), (7, 0), 4..7, 1..3)
            }
        }
    }
}

/// Empty room with a rectangle of walls and no blocks.
fn walled_room(player: Coord2, target: Coord2, xs: Range<usize>, ys: Range<usize>) -> Level {
    let walls = Array2::from_shape_fn(DEBUG_SIZE.to_nd_index(), |(x, y)| {
        xs.contains(&x) && ys.contains(&y)
    });
    let grid = Grid {
        walls,
        start: player,
        target,
    };
    let initial = MapState::empty(&grid);
    Level { grid, initial }
}
