use alloc::{format, string::String};

use super::BlockShape;
use crate::*;

/// Renders `state` over `grid` in the level text format, top row first.
///
/// Crumbs are written as empty floor. A marker sharing its cell with a block
/// or with the other marker has no glyph and is rejected.
pub(super) fn write_level(grid: &Grid, state: &MapState) -> Result<String> {
    let player = state.player();
    let target = grid.target();
    for coords in [player, target] {
        if state.has_block(coords) {
            return Err(GameError::OverlappingMarkers { coords });
        }
    }
    if player == target {
        return Err(GameError::OverlappingMarkers { coords: player });
    }

    let (width, height) = grid.size();
    let mut text = format!("size: {},{}\n", width, height);
    text.reserve((usize::from(width) + 1) * usize::from(height));

    for y in (0..height).rev() {
        for x in 0..width {
            let coords = (x, y);
            let cell = state.cell_at(coords);
            let glyph = if coords == player {
                'p'
            } else if coords == target {
                '@'
            } else if grid.is_wall(coords) {
                '#'
            } else if cell.has_block() {
                BlockShape::from_connection(cell.connection()).glyph()
            } else {
                '.'
            };
            text.push(glyph);
        }
        text.push('\n');
    }

    Ok(text)
}
