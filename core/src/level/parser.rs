use ndarray::Array2;

use super::{BlockShape, Level};
use crate::*;

/// Non-empty, non-comment lines paired with their 1-based line number.
pub(super) struct ContentLines<'a> {
    inner: core::iter::Enumerate<core::str::Lines<'a>>,
}

impl<'a> ContentLines<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for ContentLines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, line) = self.inner.next()?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            return Some((index + 1, line));
        }
    }
}

pub(super) fn parse_level(text: &str) -> Result<Level> {
    let mut lines = ContentLines::new(text);

    let (line, header) = lines.next().ok_or(GameError::NoText)?;
    let size = parse_size(line, header)?;
    let (width, height) = size;

    let mut walls: Array2<bool> = Array2::default(size.to_nd_index());
    let mut shapes: Array2<BlockShape> = Array2::default(size.to_nd_index());
    let mut player = None;
    let mut target = None;

    // the first grid row is the top of the map
    for row in 0..height {
        let y = height - 1 - row;
        let Some((line, text)) = lines.next() else {
            return Err(GameError::MissingRows {
                missing: usize::from(height - row),
            });
        };

        let cells = text.trim();
        if cells.chars().any(char::is_whitespace) {
            return Err(GameError::MalformedLine { line });
        }
        let found = cells.chars().count();
        if found != usize::from(width) {
            return Err(GameError::WrongRowWidth {
                line,
                expected: width.into(),
                found,
            });
        }

        let mut previous = None;
        for (x, glyph) in (0..width).zip(cells.chars()) {
            let glyph = glyph.to_ascii_lowercase();
            let coords = (x, y);

            // '>' and 'l' need a block to their right
            if let Some(linked @ ('>' | 'l')) = previous {
                if !matches!(glyph, 'o' | '>' | '^' | 'l') {
                    return Err(GameError::InvalidConnection {
                        line,
                        glyph: linked,
                        coords: (x - 1, y),
                    });
                }
            }
            previous = Some(glyph);

            let links_right = matches!(glyph, '>' | 'l');
            let links_up = matches!(glyph, '^' | 'l');
            if links_right && x == width - 1 || links_up && y == height - 1 {
                return Err(GameError::GlyphAtEdge { line, glyph });
            }
            if links_up && shapes[(x, y + 1).to_nd_index()] == BlockShape::None {
                return Err(GameError::InvalidConnection {
                    line,
                    glyph,
                    coords,
                });
            }

            match glyph {
                '#' => walls[coords.to_nd_index()] = true,
                '.' => {}
                'p' if player.is_some() => return Err(GameError::DuplicatePlayer { line }),
                'p' => player = Some(coords),
                '@' if target.is_some() => return Err(GameError::DuplicateTarget { line }),
                '@' => target = Some(coords),
                'o' => shapes[coords.to_nd_index()] = BlockShape::Corner,
                '>' => shapes[coords.to_nd_index()] = BlockShape::Right,
                '^' => shapes[coords.to_nd_index()] = BlockShape::Up,
                'l' => shapes[coords.to_nd_index()] = BlockShape::UpRight,
                _ => return Err(GameError::InvalidGlyph { line, glyph }),
            }
        }
    }

    let player = player.ok_or(GameError::MissingPlayer)?;
    let target = target.ok_or(GameError::MissingTarget)?;

    let grid = Grid::new(walls, player, target)?;
    let blocks = infer_connections(&shapes);
    let initial = MapState::new(&grid, player, blocks)?;
    log::debug!(
        "parsed {}x{} level with {} blocks",
        width,
        height,
        initial.block_count()
    );
    Ok(Level { grid, initial })
}

/// `W,H`, each a signed integer of up to three digits that must land in `1..=255`.
fn parse_size(line: usize, header: &str) -> Result<Coord2> {
    let (tag, value) = header
        .split_once(':')
        .ok_or(GameError::MalformedLine { line })?;
    let tag = tag.trim();
    if tag.is_empty() || !tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(GameError::MalformedLine { line });
    }
    if !tag.eq_ignore_ascii_case("size") {
        return Err(GameError::WrongHeaderTag { line });
    }

    let invalid = GameError::InvalidSize { line };
    let (width, height) = value.trim().split_once(',').ok_or(invalid)?;
    let width = parse_axis(width.trim()).ok_or(invalid)?;
    let height = parse_axis(height.trim()).ok_or(invalid)?;
    Ok((width, height))
}

fn parse_axis(text: &str) -> Option<Coord> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i16 = text.parse().ok()?;
    Coord::try_from(value).ok().filter(|&axis| axis > 0)
}

fn infer_connections(shapes: &Array2<BlockShape>) -> Array2<BlockCell> {
    let (width, height) = shapes.grid_size();
    let shape_at = |x: Option<Coord>, y: Option<Coord>| match (x, y) {
        (Some(x), Some(y)) if x < width && y < height => shapes[(x, y).to_nd_index()],
        _ => BlockShape::None,
    };

    Array2::from_shape_fn(shapes.dim(), |(x, y)| {
        let (x, y) = (x as Coord, y as Coord);
        let shape = shapes[(x, y).to_nd_index()];
        if shape == BlockShape::None {
            return BlockCell::EMPTY;
        }

        let code = encode_connection(
            shape.links_up(),
            shape.links_right(),
            shape_at(Some(x), y.checked_sub(1)).links_up(),
            shape_at(x.checked_sub(1), Some(y)).links_right(),
        );
        BlockCell::block(Connection::from_code(code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_map_to_walls_markers_and_linked_blocks() {
        let level = parse_level(
            "
            SIZE : 4,3
            // comments and blank lines are skipped

            #o.@
            .l>o
            P^..
            ",
        )
        .unwrap();
        let state = &level.initial;

        assert_eq!(level.grid.size(), (4, 3));
        assert!(level.grid.is_wall((0, 2)));
        assert_eq!(level.grid.start(), (0, 0));
        assert_eq!(level.grid.target(), (3, 2));
        assert_eq!(state.player(), (0, 0));

        assert_eq!(state.cell_at((1, 2)), BlockCell::block(Connection::DOWN));
        assert_eq!(
            state.cell_at((1, 1)),
            BlockCell::block(Connection::UP | Connection::RIGHT | Connection::DOWN)
        );
        assert_eq!(
            state.cell_at((2, 1)),
            BlockCell::block(Connection::RIGHT | Connection::LEFT)
        );
        assert_eq!(state.cell_at((3, 1)), BlockCell::block(Connection::LEFT));
        assert_eq!(state.cell_at((1, 0)), BlockCell::block(Connection::UP));
        assert_eq!(state.block_count(), 5);
    }

    #[test]
    fn inferred_links_point_both_ways() {
        let level = parse_level(
            "
            size: 6,4
            o>o.o@
            l>o.^.
            ^>>o.o
            p.l>o^
            ",
        )
        .unwrap();
        let state = &level.initial;
        let size = state.size();

        let mut links = 0;
        for (coords, cell) in state.iter_cells() {
            for direction in Direction::ALL {
                if !cell.is_connected(direction) {
                    continue;
                }
                links += 1;
                let neighbor = direction.step(coords, size).unwrap();
                assert!(state.has_block(neighbor), "{coords:?} {direction:?}");
                assert!(
                    state.is_connected(neighbor, direction.opposite()),
                    "{coords:?} {direction:?}"
                );
            }
        }
        assert_eq!(links % 2, 0);
        assert!(links > 0);
    }

    #[test]
    fn size_header_errors() {
        assert_eq!(parse_level(""), Err(GameError::NoText));
        assert_eq!(parse_level("// only\n\n"), Err(GameError::NoText));
        assert_eq!(
            parse_level("size 4,3"),
            Err(GameError::MalformedLine { line: 1 })
        );
        assert_eq!(
            parse_level("width: 4"),
            Err(GameError::WrongHeaderTag { line: 1 })
        );
        for bad in ["size: 4", "size: 4,x", "size: 0,3", "size: 1000,3", "size: -2,3"] {
            assert_eq!(
                parse_level(bad),
                Err(GameError::InvalidSize { line: 1 }),
                "{bad}"
            );
        }
    }

    #[test]
    fn grid_shape_errors() {
        assert_eq!(
            parse_level("size: 2,3\np@\n.."),
            Err(GameError::MissingRows { missing: 1 })
        );
        assert_eq!(
            parse_level("size: 2,1\n\np@.\n"),
            Err(GameError::WrongRowWidth {
                line: 3,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            parse_level("size: 3,1\np @"),
            Err(GameError::MalformedLine { line: 2 })
        );
    }

    #[test]
    fn marker_errors() {
        assert_eq!(
            parse_level("size: 3,1\npp@"),
            Err(GameError::DuplicatePlayer { line: 2 })
        );
        assert_eq!(
            parse_level("size: 3,2\n@..\np.@"),
            Err(GameError::DuplicateTarget { line: 3 })
        );
        assert_eq!(parse_level("size: 2,1\n.@"), Err(GameError::MissingPlayer));
        assert_eq!(parse_level("size: 2,1\np."), Err(GameError::MissingTarget));
        assert_eq!(
            parse_level("size: 2,1\np?"),
            Err(GameError::InvalidGlyph { line: 2, glyph: '?' })
        );
    }

    #[test]
    fn connection_glyph_errors() {
        assert_eq!(
            parse_level("size: 3,1\np@>"),
            Err(GameError::GlyphAtEdge { line: 2, glyph: '>' })
        );
        assert_eq!(
            parse_level("size: 3,1\n^p@"),
            Err(GameError::GlyphAtEdge { line: 2, glyph: '^' })
        );
        assert_eq!(
            parse_level("size: 3,2\n...\n^p@"),
            Err(GameError::InvalidConnection {
                line: 3,
                glyph: '^',
                coords: (0, 0)
            })
        );
        assert_eq!(
            parse_level("size: 4,1\n>.p@"),
            Err(GameError::InvalidConnection {
                line: 2,
                glyph: '>',
                coords: (0, 0)
            })
        );
    }
}
