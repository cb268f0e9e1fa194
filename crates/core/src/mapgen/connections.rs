//! Connection graph between coarse cells: the random walk, dead-end
//! repair, hallway carving with room merging, and the final connectivity
//! sweep that erases orphaned cells.

use crate::types::{NO_ROOM, Terrain};

use super::context::LayoutContext;
use super::grid::Direction;
use super::hallways::carve_hallway;

/// Random walk of `floor_connectivity` steps from the cursor cell.
pub(super) fn assign_connections(ctx: &mut LayoutContext<'_>, mut cursor_x: i32, mut cursor_y: i32) {
    let (grid_x, grid_y) = (ctx.grid.width, ctx.grid.height);
    let mut heading = ctx.rng.rand_int(4);
    for _ in 0..ctx.props.floor_connectivity.max(0) {
        let turn = ctx.rng.rand_int(8);
        let candidate = ctx.rng.rand_int(4);
        if turn < 4 {
            heading = candidate;
        }

        loop {
            let allowed = match Direction::from_draw(heading) {
                Direction::Right => cursor_x < grid_x - 1,
                Direction::Up => cursor_y > 0,
                Direction::Left => cursor_x > 0,
                Direction::Down => cursor_y < grid_y - 1,
            };
            if allowed || (grid_x == 1 && grid_y == 1) {
                break;
            }
            heading += 1;
        }
        if grid_x == 1 && grid_y == 1 {
            continue;
        }

        let direction = Direction::from_draw(heading);
        let (dx, dy) = direction.offset();
        if !ctx.grid.cell(cursor_x + dx, cursor_y + dy).is_invalid {
            ctx.grid.link(cursor_x, cursor_y, direction);
            cursor_x += dx;
            cursor_y += dy;
        }
    }
}

/// Gives every anchor cell with a single connection a second one, rescanning
/// until a full pass changes nothing.
pub(super) fn remove_dead_ends(ctx: &mut LayoutContext<'_>) {
    let (grid_x, grid_y) = (ctx.grid.width, ctx.grid.height);
    let mut repeat = true;
    while repeat {
        repeat = false;
        for (x, y) in ctx.grid.positions() {
            let cell = *ctx.grid.cell(x, y);
            if cell.is_invalid || cell.is_room || !cell.is_connected_exactly_once() {
                continue;
            }

            let mut heading = ctx.rng.rand_int(4);
            let mut found = None;
            for _ in 0..8 {
                let direction = Direction::from_draw(heading & 3);
                let off_grid = match direction {
                    Direction::Right => x >= grid_x - 1,
                    Direction::Up => y < 1,
                    Direction::Left => x < 1,
                    Direction::Down => y >= grid_y - 1,
                };
                if !off_grid && !cell.is_connected_to(direction) {
                    found = Some(direction);
                    break;
                }
                heading += 1;
            }

            if let Some(direction) = found {
                let (dx, dy) = direction.offset();
                if !ctx.grid.cell(x + dx, y + dy).is_invalid {
                    ctx.grid.link(x, y, direction);
                    repeat = true;
                }
            }
        }
    }
}

/// Interior point used as a hallway end: the anchor tile itself, or a random
/// tile one step inside a room's edge along the requested axis.
fn hallway_end(ctx: &mut LayoutContext<'_>, x: i32, y: i32, along_x: bool) -> i32 {
    let cell = *ctx.grid.cell(x, y);
    match (cell.is_room, along_x) {
        (false, true) => cell.start_x,
        (false, false) => cell.start_y,
        (true, true) => ctx.rng.rand_range(cell.start_x + 1, cell.end_x - 1),
        (true, false) => ctx.rng.rand_range(cell.start_y + 1, cell.end_y - 1),
    }
}

/// Carves a hallway for every recorded connection, then gives each
/// connected room a small chance to merge with a neighbour.
pub(super) fn carve_connections(ctx: &mut LayoutContext<'_>, disable_merging: bool) {
    let (grid_x, grid_y) = (ctx.grid.width, ctx.grid.height);
    for (x, y) in ctx.grid.positions() {
        let cell = ctx.grid.cell_mut(x, y);
        if cell.is_invalid {
            cell.should_connect_top = false;
            cell.should_connect_bottom = false;
            cell.should_connect_left = false;
            cell.should_connect_right = false;
            continue;
        }
        if x < 1 {
            cell.connected_left = false;
        }
        if y < 1 {
            cell.connected_top = false;
        }
        if grid_x - 1 <= x {
            cell.connected_right = false;
        }
        if grid_y - 1 <= y {
            cell.connected_bottom = false;
        }
        cell.should_connect_top = cell.connected_top;
        cell.should_connect_bottom = cell.connected_bottom;
        cell.should_connect_left = cell.connected_left;
        cell.should_connect_right = cell.connected_right;
    }

    let coords = ctx.grid.coords;
    for (x, y) in ctx.grid.positions() {
        if ctx.grid.cell(x, y).is_invalid {
            continue;
        }
        let own_x = hallway_end(ctx, x, y, true);
        let own_y = hallway_end(ctx, x, y, false);

        if ctx.grid.cell(x, y).should_connect_top {
            if !ctx.grid.cell(x, y - 1).is_invalid {
                let other_x = hallway_end(ctx, x, y - 1, true);
                let from = (own_x, ctx.grid.cell(x, y).start_y);
                let to = (other_x, ctx.grid.cell(x, y - 1).end_y);
                carve_hallway(&mut ctx.tiles, from, to, true, coords.col(x), coords.row(y));
            }
            ctx.grid.cell_mut(x, y).should_connect_top = false;
            ctx.grid.cell_mut(x, y - 1).should_connect_bottom = false;
            ctx.grid.cell_mut(x, y).is_connected = true;
            ctx.grid.cell_mut(x, y - 1).is_connected = true;
        }

        if ctx.grid.cell(x, y).should_connect_bottom {
            if !ctx.grid.cell(x, y + 1).is_invalid {
                let other_x = hallway_end(ctx, x, y + 1, true);
                let from = (own_x, ctx.grid.cell(x, y).end_y - 1);
                let to = (other_x, ctx.grid.cell(x, y + 1).start_y);
                carve_hallway(&mut ctx.tiles, from, to, true, coords.col(x), coords.row(y + 1) - 1);
            }
            ctx.grid.cell_mut(x, y).should_connect_bottom = false;
            ctx.grid.cell_mut(x, y + 1).should_connect_top = false;
            ctx.grid.cell_mut(x, y).is_connected = true;
            ctx.grid.cell_mut(x, y + 1).is_connected = true;
        }

        if ctx.grid.cell(x, y).should_connect_left {
            if !ctx.grid.cell(x - 1, y).is_invalid {
                let other_y = hallway_end(ctx, x - 1, y, false);
                let from = (ctx.grid.cell(x, y).start_x, own_y);
                let to = (ctx.grid.cell(x - 1, y).end_x - 1, other_y);
                carve_hallway(&mut ctx.tiles, from, to, false, coords.col(x), coords.row(y));
            }
            ctx.grid.cell_mut(x, y).should_connect_left = false;
            ctx.grid.cell_mut(x - 1, y).should_connect_right = false;
            ctx.grid.cell_mut(x, y).is_connected = true;
            ctx.grid.cell_mut(x - 1, y).is_connected = true;
        }

        if ctx.grid.cell(x, y).should_connect_right {
            if !ctx.grid.cell(x + 1, y).is_invalid {
                let other_y = hallway_end(ctx, x + 1, y, false);
                let from = (ctx.grid.cell(x, y).end_x - 1, own_y);
                let to = (ctx.grid.cell(x + 1, y).start_x, other_y);
                carve_hallway(&mut ctx.tiles, from, to, false, coords.col(x + 1) - 1, coords.row(y));
            }
            ctx.grid.cell_mut(x, y).should_connect_right = false;
            ctx.grid.cell_mut(x + 1, y).should_connect_left = false;
            ctx.grid.cell_mut(x, y).is_connected = true;
            ctx.grid.cell_mut(x + 1, y).is_connected = true;
        }
    }

    if disable_merging {
        return;
    }
    for (x, y) in ctx.grid.positions() {
        let origin = *ctx.grid.cell(x, y);
        if ctx.rng.rand_int(100) < 5
            && origin.is_connected_room()
            && !origin.is_merged_room
            && !origin.has_secondary_structure
        {
            let target = match ctx.rng.rand_int(4) {
                0 if x > 0 => Some((x - 1, y)),
                1 if y > 0 => Some((x, y - 1)),
                2 if x <= grid_x - 2 => Some((x + 1, y)),
                3 if y <= grid_y - 2 => Some((x, y + 1)),
                _ => None,
            };
            if let Some(target) = target {
                try_merge(ctx, (x, y), target);
            }
        }
    }
}

/// Absorbs `origin` into `target` when the target is a connected room that
/// has not merged and carries no secondary structure.
pub(super) fn try_merge(ctx: &mut LayoutContext<'_>, origin: (i32, i32), target: (i32, i32)) -> bool {
    let source = *ctx.grid.cell(origin.0, origin.1);
    let dest = *ctx.grid.cell(target.0, target.1);
    if !dest.is_connected_room() || dest.has_secondary_structure || dest.is_merged_room {
        return false;
    }

    let min_x = source.start_x.min(dest.start_x);
    let min_y = source.start_y.min(dest.start_y);
    let max_x = source.end_x.max(dest.end_x);
    let max_y = source.end_y.max(dest.end_y);
    let room = ctx.tiles.tile(source.start_x, source.start_y).room;
    ctx.tiles.mark_rect(min_x, min_y, max_x, max_y, |tile| {
        tile.terrain = Terrain::Open;
        tile.room = room;
    });

    let dest = ctx.grid.cell_mut(target.0, target.1);
    dest.start_x = min_x;
    dest.end_x = max_x;
    dest.start_y = min_y;
    dest.end_y = max_y;
    dest.was_merged_into = true;

    let source = ctx.grid.cell_mut(origin.0, origin.1);
    source.is_merged_room = true;
    source.is_connected = false;
    source.was_merged_into = true;
    log::trace!("merged cell {origin:?} into {target:?}");
    true
}

/// Connects every still-disconnected cell to one neighbour, column by column,
/// then erases whatever is still disconnected.
pub(super) fn ensure_connectivity(ctx: &mut LayoutContext<'_>) {
    let (grid_x, grid_y) = (ctx.grid.width, ctx.grid.height);
    let coords = ctx.grid.coords;
    for (x, y) in ctx.grid.positions() {
        let cell = *ctx.grid.cell(x, y);
        if cell.is_invalid || cell.was_merged_into || cell.is_connected {
            continue;
        }
        if !cell.is_room || cell.has_secondary_structure {
            ctx.tiles.set_terrain(cell.start_x, cell.start_y, Terrain::Wall);
            continue;
        }

        let a = ctx.rng.rand_range(cell.start_x, cell.end_x - 1);
        let b = ctx.rng.rand_range(cell.start_y, cell.end_y - 1);

        let direction = if y > 0 {
            Direction::Up
        } else if y < grid_y - 1 {
            Direction::Down
        } else if x > 0 {
            Direction::Left
        } else if x < grid_x - 1 {
            Direction::Right
        } else {
            continue;
        };
        let (dx, dy) = direction.offset();
        let neighbour = *ctx.grid.cell(x + dx, y + dy);
        if !neighbour.is_connected_room() || neighbour.is_merged_room {
            continue;
        }

        // Both coordinates are drawn even though each direction uses one.
        let (c, d) = if neighbour.is_room {
            let c = ctx.rng.rand_range(neighbour.start_x, neighbour.end_x - 1);
            let d = ctx.rng.rand_range(neighbour.start_y, neighbour.end_y - 1);
            (c, d)
        } else {
            (neighbour.start_x, neighbour.start_y)
        };

        match direction {
            Direction::Up => carve_hallway(
                &mut ctx.tiles,
                (a, cell.start_y),
                (c, neighbour.end_y - 1),
                true,
                coords.col(x),
                coords.row(y),
            ),
            Direction::Down => carve_hallway(
                &mut ctx.tiles,
                (a, cell.end_y - 1),
                (c, neighbour.start_y),
                true,
                coords.col(x),
                coords.row(y + 1) - 1,
            ),
            Direction::Left => carve_hallway(
                &mut ctx.tiles,
                (cell.start_x, b),
                (neighbour.start_x, d),
                false,
                coords.col(x),
                coords.row(y),
            ),
            Direction::Right => carve_hallway(
                &mut ctx.tiles,
                (cell.end_x - 1, b),
                (neighbour.start_x, d),
                false,
                coords.col(x + 1) - 1,
                coords.row(y),
            ),
        }
        ctx.grid.cell_mut(x, y).is_connected = true;
        ctx.grid.link(x, y, direction);
    }

    for (x, y) in ctx.grid.positions() {
        let cell = *ctx.grid.cell(x, y);
        if cell.is_invalid || cell.is_connected || cell.was_merged_into {
            continue;
        }
        ctx.tiles.mark_rect(cell.start_x, cell.start_y, cell.end_x, cell.end_y, |tile| {
            tile.room = NO_ROOM;
            tile.terrain = Terrain::Wall;
        });
        ctx.grid.cell_mut(x, y).clear_connections();
        for direction in [Direction::Right, Direction::Up, Direction::Left, Direction::Down] {
            let (dx, dy) = direction.offset();
            ctx.grid.cell_mut(x + dx, y + dy).set_connected(direction.opposite(), false);
        }
        log::trace!("erased disconnected cell ({x}, {y})");
    }
}
