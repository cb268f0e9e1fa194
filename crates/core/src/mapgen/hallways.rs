//! Corridor carving: L-shaped hallways between cells and random extra
//! hallways that wander out of rooms.

use crate::tiles::TileGrid;
use crate::types::{FLOOR_HEIGHT, FLOOR_WIDTH, FloorSize, Terrain};

use super::context::LayoutContext;

/// Step counter limit for every hallway leg.
const LEG_LIMIT: i32 = FLOOR_WIDTH - 1;

/// Paints an open tile, or reports `true` when the walk ran into existing
/// open terrain anywhere other than its own start.
fn open_or_hit(tiles: &mut TileGrid, x: i32, y: i32, start: (i32, i32)) -> bool {
    if tiles.terrain(x, y) == Terrain::Open {
        (x, y) != start
    } else {
        tiles.set_terrain(x, y, Terrain::Open);
        false
    }
}

/// Carves from `(x0, y0)` to `(x1, y1)` with a dog-leg through the
/// `x_mid` column (horizontal first) or the `y_mid` row (`vertical`).
///
/// The walk stops as soon as it meets open terrain it did not start on.
pub(crate) fn carve_hallway(
    tiles: &mut TileGrid,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    vertical: bool,
    x_mid: i32,
    y_mid: i32,
) {
    let start = (x0, y0);
    let mut x = x0;
    let mut y = y0;
    let mut count = 0;

    if !vertical {
        while x != x_mid {
            if count > LEG_LIMIT {
                return;
            }
            if tiles.terrain(x, y0) == Terrain::Open {
                if x != x0 {
                    return;
                }
            } else {
                tiles.set_terrain(x, y0, Terrain::Open);
            }
            if x < x_mid {
                x += 1;
                count += 1;
            } else {
                x -= 1;
                count -= 1;
            }
        }

        count = 0;
        loop {
            if y == y1 {
                count = 0;
                loop {
                    if x == x1 || count > LEG_LIMIT {
                        return;
                    }
                    if open_or_hit(tiles, x, y, start) {
                        return;
                    }
                    x += if x < x1 { 1 } else { -1 };
                    count += 1;
                }
            }
            if count > LEG_LIMIT {
                return;
            }
            if open_or_hit(tiles, x, y, start) {
                return;
            }
            if y < y1 {
                y += 1;
                count += 1;
            } else {
                y -= 1;
                count -= 1;
            }
        }
    }

    while y != y_mid {
        if count > LEG_LIMIT {
            return;
        }
        if tiles.terrain(x0, y) == Terrain::Open {
            if y != y0 {
                return;
            }
        } else {
            tiles.set_terrain(x0, y, Terrain::Open);
        }
        if y < y_mid {
            y += 1;
            count += 1;
        } else {
            y -= 1;
            count -= 1;
        }
    }

    count = 0;
    while x != x1 {
        if count > LEG_LIMIT {
            return;
        }
        if open_or_hit(tiles, x, y, start) {
            return;
        }
        x += if x < x1 { 1 } else { -1 };
        count += 1;
    }

    count = 0;
    while y != y1 {
        if count > LEG_LIMIT {
            return;
        }
        if open_or_hit(tiles, x, y, start) {
            return;
        }
        y += if y < y1 { 1 } else { -1 };
        count += 1;
    }
}

/// Heading table indexed by `heading * 4`; `x` step at `+0`, `y` step at `+2`.
const HEADING_STEPS: [i32; 64] = [
    0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0, -1, -1, //
    0, 0, -1, -1, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, 1, 0, //
    0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0, -1, //
    0, 0, 0, -1, 0, -1, 0, -1, 0, -1, 0, 0, 0, -1, 0, 1,
];

fn heading_step(index: i32) -> (i32, i32) {
    let base = (index & 63) as usize;
    (HEADING_STEPS[base], HEADING_STEPS[(base + 2) & 63])
}

/// Max steps any extra-hallway phase may take.
const WALK_CAP: usize = (FLOOR_WIDTH * FLOOR_HEIGHT) as usize;

fn diagonal_block_open(tiles: &TileGrid, x: i32, y: i32) -> bool {
    let open = |dx: i32, dy: i32| tiles.terrain(x + dx, y + dy) == Terrain::Open;
    (open(1, 0) && open(1, 1) && open(0, 1))
        || (open(1, 0) && open(1, -1) && open(0, -1))
        || (open(-1, 0) && open(-1, 1) && open(0, 1))
        || (open(-1, 0) && open(-1, -1) && open(0, -1))
}

/// Sends `count` random walkers out of connected rooms; each carves open
/// tiles until it touches existing open terrain beside it.
pub(super) fn add_extra_hallways(ctx: &mut LayoutContext<'_>, count: i32) {
    for _ in 0..count.max(0) {
        let cell_x = ctx.rng.rand_int(ctx.grid.width);
        let cell_y = ctx.rng.rand_int(ctx.grid.height);
        let cell = *ctx.grid.cell(cell_x, cell_y);
        if !(cell.is_room && cell.is_connected && !cell.is_invalid && !cell.is_maze_room) {
            continue;
        }

        let mut x = ctx.rng.rand_range(cell.start_x, cell.end_x);
        let mut y = ctx.rng.rand_range(cell.start_y, cell.end_y);
        let mut heading = ctx.rng.rand_int(4) * 2;

        // Edge checks compare the cell column against the row count and the
        // other way round; kept as is because they decide the heading.
        for _ in 0..3 {
            if heading == 0 && ctx.grid.height - 1 <= cell_x {
                heading = 2;
            }
            if heading == 2 && ctx.grid.width - 1 <= cell_y {
                heading = 4;
            }
            if heading == 4 && cell_y < 1 {
                heading = 6;
            }
            if heading == 6 && cell_x < 1 {
                heading = 0;
            }
        }

        let room = ctx.tiles.tile(x, y).room;
        let (dx, dy) = heading_step(heading * 4);
        let mut steps = 0;
        while ctx.tiles.tile(x, y).room == room && steps < WALK_CAP {
            x += dx;
            y += dy;
            steps += 1;
        }
        while ctx.tiles.terrain(x, y) == Terrain::Open && steps < WALK_CAP {
            x += dx;
            y += dy;
            steps += 1;
        }

        if ctx.tiles.terrain(x, y) == Terrain::Secondary {
            continue;
        }
        if !(TileGrid::in_bounds(x - 2, y - 2) && TileGrid::in_bounds(x + 2, y + 2)) {
            continue;
        }

        let side_open = |tiles: &TileGrid, x: i32, y: i32, heading: i32| {
            let (ax, ay) = heading_step(((heading + 2) & 6) * 4);
            let (bx, by) = heading_step(((heading - 2) & 6) * 4);
            tiles.terrain(x + ax, y + ay) == Terrain::Open
                || tiles.terrain(x + bx, y + by) == Terrain::Open
        };
        if side_open(&ctx.tiles, x, y, heading) {
            continue;
        }

        let mut countdown = ctx.rng.rand_int(3) + 3;
        let mut steps = 0;
        while x > 1
            && y > 1
            && x < FLOOR_WIDTH - 1
            && y < FLOOR_HEIGHT - 1
            && ctx.tiles.terrain(x, y) != Terrain::Open
            && steps < WALK_CAP
        {
            if !diagonal_block_open(&ctx.tiles, x, y) {
                ctx.tiles.set_terrain(x, y, Terrain::Open);
            }
            if side_open(&ctx.tiles, x, y, heading) {
                break;
            }

            countdown -= 1;
            if countdown == 0 {
                countdown = ctx.rng.rand_int(3) + 3;
                if ctx.rng.rand_int(100) < 0x32 {
                    heading += 2;
                } else {
                    heading -= 2;
                }
                heading &= 6;

                let too_far = (x > FLOOR_HEIGHT - 1 && ctx.status.floor_size == FloorSize::Small)
                    || (y > 0x2F && ctx.status.floor_size == FloorSize::Medium);
                if heading == 2 && too_far {
                    break;
                }
            }

            let (dx, dy) = heading_step(heading * 4);
            x += dx;
            y += dy;
            steps += 1;
        }
    }
}
