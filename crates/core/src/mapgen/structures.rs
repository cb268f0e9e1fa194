//! Per-room secondary structures and maze carving.

use std::mem;

use crate::tiles::TileGrid;
use crate::types::{FLOOR_HEIGHT, FLOOR_WIDTH, NO_ROOM, Terrain};

use super::context::LayoutContext;

/// Max jumps a single maze line may take.
const MAZE_LINE_CAP: usize = (FLOOR_WIDTH * FLOOR_HEIGHT) as usize;

/// True when an orthogonal neighbour (or the tile itself) is open hallway.
pub(super) fn is_next_to_hallway(tiles: &TileGrid, x: i32, y: i32) -> bool {
    [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)].into_iter().any(|(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        if !TileGrid::in_bounds(nx, ny) {
            return false;
        }
        let tile = tiles.tile(nx, ny);
        tile.terrain == Terrain::Open && tile.room == NO_ROOM
    })
}

/// Decorates eligible rooms with water or lava features. Each room draws one
/// of six kinds; most spend from the floor-wide budget.
pub(super) fn add_secondary_structures(ctx: &mut LayoutContext<'_>) {
    for y in 0..ctx.grid.height {
        for x in 0..ctx.grid.width {
            let cell = *ctx.grid.cell(x, y);
            let eligible = !cell.is_invalid
                && cell.is_room
                && cell.is_connected
                && !cell.is_monster_house
                && !cell.is_merged_room
                && !cell.flag_imperfect
                && cell.flag_secondary_structure;
            if !eligible {
                continue;
            }

            let width = cell.width();
            let height = cell.height();
            let mid_x = (cell.start_x + cell.end_x) / 2;
            let mid_y = (cell.start_y + cell.end_y) / 2;

            match ctx.rng.rand_int(6) {
                1 if ctx.status.secondary_structures_budget > 0 => {
                    ctx.status.secondary_structures_budget -= 1;
                    if width % 2 == 0 || height % 2 != 0 {
                        ctx.tiles.set_terrain(mid_x, mid_y, Terrain::Secondary);
                        if !(width > 4 || height < 5) {
                            for (dx, dy) in [(1, 0), (0, 1), (-1, 0), (0, -1)] {
                                ctx.tiles.set_terrain(mid_x + dx, mid_y + dy, Terrain::Secondary);
                            }
                        }
                    } else {
                        carve_maze(ctx, (x, y), true);
                    }
                }
                2 if ctx.status.secondary_structures_budget > 0 && width != 0 && height != 0 => {
                    ctx.status.secondary_structures_budget -= 1;
                    for _ in 0..64 {
                        let dx = ctx.rng.rand_int(width);
                        let dy = ctx.rng.rand_int(height);
                        if (dx + dy) % 2 != 0 {
                            ctx.tiles.set_terrain(cell.start_x + dx, cell.start_y + dy, Terrain::Secondary);
                        }
                    }
                    ctx.grid.cell_mut(x, y).has_secondary_structure = true;
                }
                3 if width > 4 && height > 4 => {
                    let mut a = ctx.rng.rand_range(cell.start_x + 2, cell.end_x - 3);
                    let mut b = ctx.rng.rand_range(cell.start_y + 2, cell.end_y - 3);
                    let mut c = ctx.rng.rand_range(cell.start_x + 2, cell.end_x - 3);
                    let mut d = ctx.rng.rand_range(cell.start_y + 2, cell.end_y - 3);
                    if c < a {
                        mem::swap(&mut a, &mut c);
                    }
                    if d < b {
                        mem::swap(&mut b, &mut d);
                    }
                    ctx.tiles.mark_rect(a, b, c + 1, d + 1, |tile| tile.terrain = Terrain::Secondary);
                    ctx.status.secondary_structures_budget += 1;
                }
                4 if width > 4 && height > 5 && ctx.status.secondary_structures_budget > 0 => {
                    ctx.status.secondary_structures_budget -= 1;
                    place_island(&mut ctx.tiles, mid_x, mid_y);
                    ctx.grid.cell_mut(x, y).has_secondary_structure = true;
                }
                5 if ctx.status.secondary_structures_budget > 0 => {
                    ctx.status.secondary_structures_budget -= 1;
                    if ctx.rng.rand_int(2) == 0 {
                        let line_clear = (cell.start_x..cell.end_x)
                            .all(|tx| !is_next_to_hallway(&ctx.tiles, tx, mid_y));
                        if line_clear {
                            ctx.tiles.mark_rect(cell.start_x, mid_y, cell.end_x, mid_y + 1, |tile| {
                                tile.terrain = Terrain::Secondary;
                            });
                            ctx.tiles.mark_rect(cell.start_x, mid_y + 1, cell.end_x, cell.end_y, |tile| {
                                tile.is_unreachable_from_stairs = true;
                            });
                        }
                    } else {
                        let line_clear = (cell.start_y..cell.end_y)
                            .all(|ty| !is_next_to_hallway(&ctx.tiles, mid_x, ty));
                        if line_clear {
                            ctx.tiles.mark_rect(mid_x, cell.start_y, mid_x + 1, cell.end_y, |tile| {
                                tile.terrain = Terrain::Secondary;
                            });
                            ctx.tiles.mark_rect(mid_x + 1, cell.start_y, cell.end_x, cell.end_y, |tile| {
                                tile.is_unreachable_from_stairs = true;
                            });
                        }
                    }
                    ctx.grid.cell_mut(x, y).has_secondary_structure = true;
                }
                _ => {}
            }
        }
    }
}

/// A 4×4 ring of secondary terrain around a 2×2 island holding three items
/// and a trap. The island can only be reached by crossing the ring.
fn place_island(tiles: &mut TileGrid, mid_x: i32, mid_y: i32) {
    for x in mid_x - 2..=mid_x + 1 {
        for y in mid_y - 2..=mid_y + 1 {
            let inner = (mid_x - 1..=mid_x).contains(&x) && (mid_y - 1..=mid_y).contains(&y);
            if inner {
                tiles.tile_mut(x, y).is_unreachable_from_stairs = true;
            } else {
                tiles.set_terrain(x, y, Terrain::Secondary);
            }
        }
    }
    tiles.tile_mut(mid_x - 1, mid_y - 1).has_trap = true;
    tiles.tile_mut(mid_x, mid_y - 1).has_item = true;
    tiles.tile_mut(mid_x - 1, mid_y).has_item = true;
    tiles.tile_mut(mid_x, mid_y).has_item = true;
}

fn set_obstacle(tiles: &mut TileGrid, x: i32, y: i32, use_secondary: bool, room: u8) {
    let tile = tiles.tile_mut(x, y);
    tile.terrain = Terrain::Wall;
    if use_secondary && tile.room == room {
        tile.terrain = Terrain::Secondary;
    }
}

/// Bounds of the room a maze line may jump within, half-open.
#[derive(Clone, Copy)]
struct MazeBounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl MazeBounds {
    fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..self.max_x).contains(&x) && (self.min_y..self.max_y).contains(&y)
    }
}

/// Grows one wall line two tiles at a time through open terrain. The four
/// direction tries are shared across the whole line.
fn carve_maze_line(
    ctx: &mut LayoutContext<'_>,
    (mut x, mut y): (i32, i32),
    bounds: MazeBounds,
    use_secondary: bool,
    room: u8,
) {
    let mut tries = 0;
    let mut heading = ctx.rng.rand_int(4);
    for _ in 0..MAZE_LINE_CAP {
        set_obstacle(&mut ctx.tiles, x, y, use_secondary, room);
        loop {
            let (dx, dy) = match heading % 4 {
                0 => (2, 0),
                1 => (0, -2),
                2 => (-2, 0),
                _ => (0, 2),
            };
            tries += 1;
            heading += 1;
            if bounds.contains(x + dx, y + dy) && ctx.tiles.terrain(x + dx, y + dy) == Terrain::Open {
                break;
            }
            if tries > 3 {
                return;
            }
        }
        // The heading already moved past the successful try.
        let (dx, dy) = match heading % 4 {
            0 => (1, 0),
            1 => (0, -1),
            2 => (-1, 0),
            _ => (0, 1),
        };
        set_obstacle(&mut ctx.tiles, x + dx, y + dy, use_secondary, room);
        x += dx * 2;
        y += dy * 2;
    }
}

/// Turns the room at grid position `cell` into a maze of wall (or secondary
/// terrain) lines grown from its border and from an odd interior lattice.
pub(super) fn carve_maze(ctx: &mut LayoutContext<'_>, (cell_x, cell_y): (i32, i32), use_secondary: bool) {
    ctx.status.has_maze = true;
    ctx.grid.cell_mut(cell_x, cell_y).is_maze_room = true;
    let cell = *ctx.grid.cell(cell_x, cell_y);
    let room = ctx.tiles.tile(cell.start_x, cell.start_y).room;
    let bounds = MazeBounds {
        min_x: cell.start_x,
        min_y: cell.start_y,
        max_x: cell.end_x,
        max_y: cell.end_y,
    };

    // Border seeds: top, right, bottom, then left edge, one tile outside the room.
    let columns = || (cell.start_x + 1..cell.end_x - 1).step_by(2);
    let rows = || (cell.start_y + 1..cell.end_y - 1).step_by(2);
    let border: Vec<(i32, i32)> = columns()
        .map(|x| (x, cell.start_y - 1))
        .chain(rows().map(|y| (cell.end_x, y)))
        .chain(columns().map(|x| (x, cell.end_y)))
        .chain(rows().map(|y| (cell.start_x - 1, y)))
        .collect();
    for (x, y) in border {
        if ctx.tiles.terrain(x, y) != Terrain::Open {
            carve_maze_line(ctx, (x, y), bounds, use_secondary, room);
        }
    }

    for x in (cell.start_x + 3..cell.end_x - 3).step_by(2) {
        for y in (cell.start_y + 3..cell.end_y - 3).step_by(2) {
            if ctx.tiles.terrain(x, y) == Terrain::Open {
                let wall = if use_secondary { Terrain::Secondary } else { Terrain::Wall };
                ctx.tiles.set_terrain(x - 1, y, wall);
                carve_maze_line(ctx, (x, y), bounds, use_secondary, room);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::mapgen::context::GridGeometry;
    use crate::props::FloorProperties;
    use crate::rng::DungeonRng;
    use crate::types::GenerationOptions;

    use super::*;

    fn single_room<'a>(rng: &'a mut DungeonRng, props: &'a FloorProperties) -> LayoutContext<'a> {
        let geometry = GridGeometry { grid_x: 1, grid_y: 1, ..GridGeometry::default() };
        let mut ctx = LayoutContext::new(rng, props, GenerationOptions::default(), &geometry);
        let cell = ctx.grid.cell_mut(0, 0);
        cell.start_x = 10;
        cell.start_y = 8;
        cell.end_x = 21;
        cell.end_y = 19;
        cell.is_connected = true;
        cell.flag_secondary_structure = true;
        ctx.tiles.mark_rect(10, 8, 21, 19, |tile| {
            tile.terrain = Terrain::Open;
            tile.room = 0;
        });
        ctx
    }

    #[test]
    fn next_to_hallway_only_counts_orthogonal_open_hallway_tiles() {
        let mut tiles = TileGrid::new();
        tiles.set_terrain(5, 5, Terrain::Open);
        assert!(is_next_to_hallway(&tiles, 5, 6));
        assert!(is_next_to_hallway(&tiles, 4, 5));
        assert!(!is_next_to_hallway(&tiles, 6, 6));

        tiles.tile_mut(5, 5).room = 2;
        assert!(!is_next_to_hallway(&tiles, 5, 6));
    }

    #[test]
    fn island_rings_the_centre_with_secondary_terrain() {
        let mut tiles = TileGrid::new();
        tiles.mark_rect(0, 0, 20, 20, |tile| tile.terrain = Terrain::Open);
        place_island(&mut tiles, 10, 10);

        let ring = tiles.count(|tile| tile.terrain == Terrain::Secondary);
        assert_eq!(ring, 12);
        assert!(tiles.tile(9, 9).has_trap);
        assert!(tiles.tile(10, 10).has_item && tiles.tile(9, 10).has_item && tiles.tile(10, 9).has_item);
        assert!(tiles.tile(9, 9).is_unreachable_from_stairs);
        assert_eq!(tiles.terrain(9, 9), Terrain::Open);
    }

    #[test]
    fn maze_marks_status_and_keeps_walls_inside_room() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(31);
        let mut ctx = single_room(&mut rng, &props);
        carve_maze(&mut ctx, (0, 0), false);

        assert!(ctx.status.has_maze);
        assert!(ctx.grid.cell(0, 0).is_maze_room);
        let walls_inside = (10..21)
            .flat_map(|x| (8..19).map(move |y| (x, y)))
            .filter(|&(x, y)| ctx.tiles.terrain(x, y) == Terrain::Wall)
            .count();
        assert!(walls_inside > 0, "maze added no walls");
        assert!(walls_inside < 11 * 11, "maze filled the whole room");
    }

    #[test]
    fn structures_respect_budget() {
        let props = FloorProperties::default();
        for seed in 0..64 {
            let mut rng = DungeonRng::new(seed);
            let mut ctx = single_room(&mut rng, &props);
            ctx.status.secondary_structures_budget = 0;
            add_secondary_structures(&mut ctx);

            let secondary = ctx.tiles.count(|tile| tile.terrain == Terrain::Secondary);
            let budget = ctx.status.secondary_structures_budget;
            // Only the budget-free filled rectangle can appear.
            assert!(budget == 0 || (budget == 1 && secondary > 0), "seed {seed}");
            assert!(!ctx.status.has_maze, "seed {seed}");
        }
    }
}
