use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Rule deciding which neighbouring block cells belong to the same group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Adjacency {
    /// Follow authored connection bits only; the set that moves or crumbles together.
    Linked,
    /// Any orthogonally adjacent block cell; the outline used for shape matching.
    Touching,
}

/// A set of block cells discovered together from one seed cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockGroup {
    cells: BTreeSet<Coord2>,
}

impl BlockGroup {
    /// Breadth-first discovery from `start`, marking every reached cell in `visited`.
    pub(crate) fn discover(
        blocks: &Array2<BlockCell>,
        start: Coord2,
        visited: &mut Array2<bool>,
        adjacency: Adjacency,
    ) -> Self {
        let bounds = blocks.grid_size();
        let mut cells = BTreeSet::new();
        let mut to_visit = VecDeque::from([start]);
        visited[start.to_nd_index()] = true;

        while let Some(coords) = to_visit.pop_front() {
            cells.insert(coords);
            let cell = blocks[coords.to_nd_index()];

            for (direction, next) in NeighborIter::new(coords, bounds) {
                if visited[next.to_nd_index()] || !blocks[next.to_nd_index()].has_block() {
                    continue;
                }

                let joined = match adjacency {
                    Adjacency::Linked => cell.is_connected(direction),
                    Adjacency::Touching => true,
                };
                if joined {
                    visited[next.to_nd_index()] = true;
                    to_visit.push_back(next);
                }
            }
        }

        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Coord2> {
        self.iter().collect()
    }

    /// Smallest x and smallest y over the group, taken independently of each other.
    ///
    /// This is not necessarily a member cell.
    pub fn bottom_left(&self) -> Option<Coord2> {
        let min_x = self.cells.iter().map(|&(x, _)| x).min()?;
        let min_y = self.cells.iter().map(|&(_, y)| y).min()?;
        Some((min_x, min_y))
    }

    /// Offset that maps this group's bottom-left onto `other`'s.
    pub fn offset_to(&self, other: &Self) -> Option<Offset2> {
        Some(offset_between(self.bottom_left()?, other.bottom_left()?))
    }

    /// True when `other` is an exact translation of this group; rotations and mirror images
    /// never match.
    pub fn is_congruent(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let Some((dx, dy)) = self.offset_to(other) else {
            return self.is_empty();
        };

        self.iter().all(|(x, y)| {
            let moved = (i16::from(x) + dx, i16::from(y) + dy);
            match (Coord::try_from(moved.0), Coord::try_from(moved.1)) {
                (Ok(mx), Ok(my)) => other.contains((mx, my)),
                _ => false,
            }
        })
    }
}

impl FromIterator<Coord2> for BlockGroup {
    fn from_iter<I: IntoIterator<Item = Coord2>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
