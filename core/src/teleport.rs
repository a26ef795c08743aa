use crate::*;

impl MapState {
    /// Keeps jumping while the player stands inside a group with a unique congruent twin.
    pub(crate) fn resolve_teleports(&mut self, outcome: &mut MoveOutcome) {
        while self.teleport_once(outcome) {}
    }

    fn teleport_once(&mut self, outcome: &mut MoveOutcome) -> bool {
        let from = self.player();
        if !self.has_block(from) {
            return false;
        }

        let mut visited = self.unvisited();
        let origin = BlockGroup::discover(self.blocks(), from, &mut visited, Adjacency::Touching);

        let Some(destination) = self.unique_congruent_group(&origin, &mut visited) else {
            return false;
        };

        let Some(to) = origin
            .offset_to(&destination)
            .and_then(|offset| apply_offset(from, offset, self.size()))
        else {
            log::warn!("teleport from {:?} lands outside the map", from);
            return false;
        };

        // only the linked part crumbles, even though the whole touching cluster was matched
        let broken = self.group_at(from, Adjacency::Linked);
        let mut broke = self.unvisited();
        for coords in broken.iter() {
            broke[coords.to_nd_index()] = true;
            self.set_cell(coords, BlockCell::CRUMB);
        }

        log::debug!(
            "teleport {:?} -> {:?}, {} cells crumbled",
            from,
            to,
            broken.len()
        );
        outcome.push_step(ReplayStep::Crumble {
            cells: broken.to_vec(),
        });
        outcome.push_step(ReplayStep::Jump { from, to });
        outcome.push_jump(MicroHistory {
            jump_point: to,
            broke,
        });
        self.set_player(to);
        true
    }

    /// Scans the untouched cells x-major; `None` unless exactly one other group matches.
    fn unique_congruent_group(
        &self,
        origin: &BlockGroup,
        visited: &mut ndarray::Array2<bool>,
    ) -> Option<BlockGroup> {
        let mut found = None;

        for (coords, cell) in self.iter_cells() {
            if !cell.has_block() || visited[coords.to_nd_index()] {
                continue;
            }

            let candidate =
                BlockGroup::discover(self.blocks(), coords, visited, Adjacency::Touching);
            if origin.is_congruent(&candidate) {
                if found.is_some() {
                    log::trace!("teleport from {:?} is ambiguous", self.player());
                    return None;
                }
                found = Some(candidate);
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_board(size: Coord2, player: Coord2) -> (Grid, MapState) {
        let grid = Grid::open(size, player, player).unwrap();
        let state = MapState::empty(&grid);
        (grid, state)
    }

    fn domino(state: &mut MapState, left: Coord2) {
        state.place_block(left, Connection::RIGHT).unwrap();
        state
            .place_block((left.0 + 1, left.1), Connection::LEFT)
            .unwrap();
    }

    #[test]
    fn entering_a_group_with_a_unique_twin_teleports() {
        let (grid, mut state) = open_board((8, 6), (1, 1));
        domino(&mut state, (2, 1));
        domino(&mut state, (5, 4));

        let outcome = state.try_move(&grid, Direction::Right);

        assert!(outcome.success());
        assert!(outcome.teleported());
        assert_eq!(state.player(), (5, 4));
        assert!(state.cell_at((2, 1)).is_crumb());
        assert!(state.cell_at((3, 1)).is_crumb());
        assert!(state.has_block((5, 4)));
        assert!(state.has_block((6, 4)));

        let jumps = outcome.jumps();
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].jump_point, (5, 4));
        assert!(jumps[0].broke[[2, 1]] && jumps[0].broke[[3, 1]]);
        assert_eq!(jumps[0].broke.iter().filter(|&&b| b).count(), 2);
        assert_eq!(
            outcome.replay(),
            [
                ReplayStep::Walk { from: (1, 1), to: (2, 1) },
                ReplayStep::Crumble { cells: [(2, 1), (3, 1)].into() },
                ReplayStep::Jump { from: (2, 1), to: (5, 4) },
            ]
        );

        // the crumbs vanish on the next move
        state.try_move(&grid, Direction::Up);
        assert_eq!(state.cell_at((2, 1)), BlockCell::EMPTY);
        assert_eq!(state.cell_at((3, 1)), BlockCell::EMPTY);
    }

    #[test]
    fn ambiguous_twins_keep_the_player_in_place() {
        let (grid, mut state) = open_board((8, 6), (1, 1));
        domino(&mut state, (2, 1));
        domino(&mut state, (5, 4));
        domino(&mut state, (5, 0));

        let outcome = state.try_move(&grid, Direction::Right);

        assert!(outcome.success());
        assert!(!outcome.teleported());
        assert_eq!(state.player(), (2, 1));
        assert_eq!(state.block_count(), 6);
    }

    #[test]
    fn rotated_group_is_not_a_twin() {
        let (grid, mut state) = open_board((8, 6), (1, 1));
        domino(&mut state, (2, 1));
        state.place_block((5, 3), Connection::UP).unwrap();
        state.place_block((5, 4), Connection::DOWN).unwrap();

        let outcome = state.try_move(&grid, Direction::Right);

        assert!(!outcome.teleported());
        assert_eq!(state.player(), (2, 1));
    }

    #[test]
    fn pushing_a_block_jumps_once_the_twin_is_unique() {
        let (grid, mut state) = open_board((8, 6), (2, 1));
        state.place_block((2, 1), Connection::empty()).unwrap();
        state.place_block((5, 4), Connection::empty()).unwrap();
        state.place_block((6, 0), Connection::empty()).unwrap();

        // three lone blocks give two twins, so no jump yet
        let outcome = state.try_move(&grid, Direction::Right);
        assert_eq!(outcome.kind(), MoveKind::Pushed);
        assert!(!outcome.teleported());

        state.place_block((4, 4), Connection::empty()).unwrap();
        let outcome = state.try_move(&grid, Direction::Right);
        // (4, 4) turned the other lone block into a pair, leaving (6, 0) as the only twin
        assert!(outcome.teleported());
        assert_eq!(state.player(), (6, 0));
        assert!(state.cell_at((4, 1)).is_crumb());
    }

    #[test]
    fn touching_cluster_matches_but_only_linked_part_crumbles() {
        let (grid, mut state) = open_board((8, 6), (0, 0));
        // origin: a linked pair touching an unlinked block
        domino(&mut state, (1, 0));
        state.place_block((3, 0), Connection::empty()).unwrap();
        // twin: three blocks in a row, no links at all
        state.place_block((1, 4), Connection::empty()).unwrap();
        state.place_block((2, 4), Connection::empty()).unwrap();
        state.place_block((3, 4), Connection::empty()).unwrap();

        let outcome = state.try_move(&grid, Direction::Right);

        assert!(outcome.teleported());
        assert_eq!(state.player(), (1, 4));
        assert!(state.cell_at((1, 0)).is_crumb());
        assert!(state.cell_at((2, 0)).is_crumb());
        assert!(state.has_block((3, 0)));
        // landed on a lone block of a three-wide row with no other match left
        assert_eq!(outcome.jumps().len(), 1);
    }
}
