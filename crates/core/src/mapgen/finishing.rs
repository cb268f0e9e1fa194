//! Whole-floor passes that run after a strategy has laid out its rooms:
//! border walls, junction marking, and secondary terrain growth.

use crate::rng::DungeonRng;
use crate::tiles::{Tile, TileGrid};
use crate::types::{ANCHOR_ROOM, FLOOR_HEIGHT, FLOOR_WIDTH, NO_ROOM, Terrain};

/// Walls the two outermost rows at the top and bottom and the outermost
/// columns. Both row pairs are written on purpose; rows 0 and 31 are the
/// impassable edge, rows 1 and 30 the inner boundary.
pub fn reset_border(tiles: &mut TileGrid) {
    for y in [0, 1, FLOOR_HEIGHT - 2, FLOOR_HEIGHT - 1] {
        tiles.mark_rect(0, y, FLOOR_WIDTH, y + 1, |tile| tile.terrain = Terrain::Wall);
    }
    for x in [0, FLOOR_WIDTH - 1] {
        tiles.mark_rect(x, 0, x + 1, FLOOR_HEIGHT, |tile| tile.terrain = Terrain::Wall);
    }
}

/// Flags every room tile touching a hallway as a junction and clears the
/// anchor sentinel, in one column-major pass.
///
/// A junction tile that is secondary terrain is turned back into open floor,
/// so water or lava never survives next to a hallway mouth.
pub fn fix_junctions(tiles: &mut TileGrid) {
    for x in 0..FLOOR_WIDTH {
        for y in 0..FLOOR_HEIGHT {
            let tile = *tiles.tile(x, y);
            if tile.terrain == Terrain::Open && tile.room == NO_ROOM {
                for (dx, dy) in [(-1, 0), (0, -1), (0, 1), (1, 0)] {
                    let (nx, ny) = (x + dx, y + dy);
                    if !TileGrid::in_bounds(nx, ny) {
                        continue;
                    }
                    let neighbour = tiles.tile_mut(nx, ny);
                    if neighbour.room != NO_ROOM {
                        neighbour.is_junction = true;
                        if neighbour.terrain == Terrain::Secondary {
                            neighbour.terrain = Terrain::Open;
                        }
                    }
                }
            } else if tile.room == ANCHOR_ROOM {
                tiles.tile_mut(x, y).room = NO_ROOM;
            }
        }
    }
}

/// Max steps a single river may take.
const RIVER_CAP: usize = (FLOOR_WIDTH * FLOOR_HEIGHT) as usize;
/// Side length of a stamped blob mask.
const STAMP_SIZE: i32 = 10;
/// Distance from the floor edge inside which transient terrain becomes wall.
const EDGE_MARGIN: i32 = 2;

/// Walls and room floor may turn into secondary terrain; hallways may not.
fn accepts_secondary(tile: &Tile) -> bool {
    (tile.terrain == Terrain::Wall || (tile.terrain == Terrain::Open && tile.in_real_room()))
        && !tile.is_junction
        && !tile.is_kecleon_shop
        && !tile.is_unreachable_from_stairs
}

fn secondary_around(tiles: &TileGrid, x: i32, y: i32) -> usize {
    (-1..=1)
        .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| tiles.terrain(x + dx, y + dy) == Terrain::Secondary)
        .count()
}

/// Grows a cellular blob around `(x, y)`: sampled points turn into
/// secondary terrain when their 3×3 window already holds two such tiles.
fn grow_blob(tiles: &mut TileGrid, rng: &mut DungeonRng, x: i32, y: i32) {
    for _ in 0..64 {
        let px = x + rng.rand_int(7) - 3;
        let py = y + rng.rand_int(7) - 3;
        if TileGrid::in_bounds(px, py)
            && accepts_secondary(tiles.tile(px, py))
            && secondary_around(tiles, px, py) >= 2
        {
            tiles.set_terrain(px, py, Terrain::Secondary);
        }
    }
}

/// One river from a random point on the top or bottom edge, alternating
/// vertical runs with single sideways steps.
fn run_river(tiles: &mut TileGrid, rng: &mut DungeonRng) {
    let (mut y, dy) = if rng.rand_int(100) < 50 { (FLOOR_HEIGHT - 1, -1) } else { (0, 1) };
    let mut x = rng.rand_range(2, FLOOR_WIDTH - 2);
    let mut steps = rng.rand_int(50) + 10;
    let mut taken = 0;

    loop {
        let run = rng.rand_int(6) + 2;
        for _ in 0..run {
            if !TileGrid::in_bounds(x, y) || taken >= RIVER_CAP {
                return;
            }
            let tile = *tiles.tile(x, y);
            if tile.terrain == Terrain::Secondary {
                return;
            }
            if tile.terrain == Terrain::Wall && tile.room == NO_ROOM && !tile.is_junction {
                tiles.set_terrain(x, y, Terrain::Secondary);
            }

            steps -= 1;
            if steps == 0 {
                grow_blob(tiles, rng, x, y);
                steps = rng.rand_int(50) + 10;
            }
            y += dy;
            taken += 1;
        }
        x += if rng.rand_int(100) < 50 { 1 } else { -1 };
    }
}

/// Stamps one 10×10 blob at a random centre away from the floor edge.
fn stamp_blob(tiles: &mut TileGrid, rng: &mut DungeonRng) {
    let margin = STAMP_SIZE / 2;
    let centre = (0..200).find_map(|_| {
        let x = rng.rand_int(FLOOR_WIDTH);
        let y = rng.rand_int(FLOOR_HEIGHT);
        let inside = (margin..FLOOR_WIDTH - margin).contains(&x) && (margin..FLOOR_HEIGHT - margin).contains(&y);
        inside.then_some((x, y))
    });
    let Some((cx, cy)) = centre else {
        return;
    };

    let mut mask = [[false; STAMP_SIZE as usize]; STAMP_SIZE as usize];
    for _ in 0..64 {
        let mx = (rng.rand_int(STAMP_SIZE - 2) + 1) as usize;
        let my = (rng.rand_int(STAMP_SIZE - 2) + 1) as usize;
        let neighbours = (my - 1..=my + 1)
            .flat_map(|row| (mx - 1..=mx + 1).map(move |col| (row, col)))
            .filter(|&(row, col)| (row, col) != (my, mx) && mask[row][col])
            .count();
        if neighbours <= 4 {
            mask[my][mx] = !mask[my][mx];
        }
    }

    for (my, row) in mask.iter().enumerate() {
        for (mx, &set) in row.iter().enumerate() {
            let (x, y) = (cx - margin + mx as i32, cy - margin + my as i32);
            if set && accepts_secondary(tiles.tile(x, y)) {
                tiles.set_terrain(x, y, Terrain::Secondary);
            }
        }
    }
}

/// Rivers, then `density` blob stamps, then the cleanup: secondary terrain
/// near the floor edge becomes wall, and outside rooms it becomes open
/// floor. Draws nothing when `density` is not positive.
pub fn grow_secondary_terrain(tiles: &mut TileGrid, rng: &mut DungeonRng, density: i32) {
    if density <= 0 {
        return;
    }

    let rivers = rng.rand_range(1, 4);
    for _ in 0..rivers {
        run_river(tiles, rng);
    }
    for _ in 0..density {
        stamp_blob(tiles, rng);
    }

    for x in 0..FLOOR_WIDTH {
        for y in 0..FLOOR_HEIGHT {
            let tile = tiles.tile_mut(x, y);
            if tile.terrain != Terrain::Secondary {
                continue;
            }
            let near_edge = x < EDGE_MARGIN
                || y < EDGE_MARGIN
                || x >= FLOOR_WIDTH - EDGE_MARGIN
                || y >= FLOOR_HEIGHT - EDGE_MARGIN;
            if near_edge {
                tile.terrain = Terrain::Wall;
            } else if tile.room == NO_ROOM {
                tile.terrain = Terrain::Open;
            }
        }
    }
    log::trace!("grew secondary terrain: {rivers} rivers, {density} stamps");
}
