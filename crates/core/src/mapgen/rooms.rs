//! Grid sizing, room assignment, and room/anchor geometry.

use crate::types::{ANCHOR_ROOM, FloorSize, Terrain};

use super::context::LayoutContext;
use super::grid::GridCoords;

pub(super) fn compute_grid_coordinates(ctx: &mut LayoutContext<'_>) {
    ctx.grid.coords = GridCoords::compute(ctx.grid.width, ctx.grid.height);
}

/// Marks cells outside the floor-size footprint invalid.
pub(super) fn initialize_grid(ctx: &mut LayoutContext<'_>) {
    let grid_x = ctx.grid.width;
    let floor_size = ctx.status.floor_size;
    for (x, y) in ctx.grid.positions() {
        let invalid = match floor_size {
            FloorSize::Small => grid_x / 2 <= x,
            FloorSize::Medium => grid_x * 3 / 4 <= x,
            FloorSize::Large => false,
        };
        ctx.grid.cell_mut(x, y).is_invalid = invalid;
    }
}

/// Chooses which valid cells become rooms; the rest become hallway anchors.
///
/// The variance draw always happens. It is added to `target` unless `exact`.
pub(super) fn assign_rooms(ctx: &mut LayoutContext<'_>, target: i32, exact: bool) {
    let variance = ctx.rng.rand_int(3);
    let wanted = if exact { target } else { target + variance };

    let mut flags = [false; 256];
    for flag in flags.iter_mut().take(wanted.clamp(0, 256) as usize) {
        *flag = true;
    }

    // Swap indices span the whole active grid, not just the valid cells.
    let span = ctx.grid.width * ctx.grid.height;
    for _ in 0..64 {
        let a = ctx.rng.rand_int(span) as usize;
        let b = ctx.rng.rand_int(span) as usize;
        flags.swap(a, b);
    }

    let grid_x = ctx.grid.width;
    let mut index = 0;
    let mut room_count = 0;
    for (x, y) in ctx.grid.positions() {
        let cell = ctx.grid.cell_mut(x, y);
        if cell.is_invalid {
            continue;
        }
        if room_count > 31 || !flags[index] {
            cell.is_room = false;
        } else {
            cell.is_room = true;
            room_count += 1;
            if grid_x % 2 != 0 && x == (grid_x - 1) / 2 && y == 1 {
                cell.is_room = false;
            }
        }
        index += 1;
    }

    if room_count < 2 {
        for _ in 0..200 {
            for (x, y) in ctx.grid.positions() {
                if !ctx.grid.cell(x, y).is_invalid && ctx.rng.rand_int(100) < 60 {
                    ctx.grid.cell_mut(x, y).is_room = true;
                    return;
                }
            }
        }
    }
    ctx.status.room_count = room_count;
}

/// Sizes every valid cell: one anchor tile for hallway cells, a painted
/// rectangle for rooms. Rows are visited outermost here.
pub(super) fn create_rooms_and_anchors(ctx: &mut LayoutContext<'_>) {
    let mut room_id: u8 = 0;
    for y in 0..ctx.grid.height {
        for x in 0..ctx.grid.width {
            let coords = ctx.grid.coords;
            let mut a = coords.col(x) + 2;
            let mut b = coords.row(y) + 2;
            let c = coords.col(x + 1) - coords.col(x) - 4;
            let d = coords.row(y + 1) - coords.row(y) - 3;

            let cell = *ctx.grid.cell(x, y);
            if cell.is_invalid {
                continue;
            }

            if !cell.is_room {
                let top = if y == 0 { 1 } else { 2 };
                let left = if x == 0 { 1 } else { 2 };
                let right = if x == ctx.grid.width - 1 { 2 } else { 4 };
                let bottom = if y == ctx.grid.height - 1 { 2 } else { 4 };

                let anchor_x = ctx.rng.rand_range(a + left, a + c - right);
                let anchor_y = ctx.rng.rand_range(b + top, b + d - bottom);

                let cell = ctx.grid.cell_mut(x, y);
                cell.start_x = anchor_x;
                cell.end_x = anchor_x + 1;
                cell.start_y = anchor_y;
                cell.end_y = anchor_y + 1;

                let tile = ctx.tiles.tile_mut(anchor_x, anchor_y);
                tile.is_junction = true;
                tile.room = ANCHOR_ROOM;
                tile.terrain = Terrain::Open;
                continue;
            }

            let mut width = ctx.rng.rand_range(5, c);
            let mut height = ctx.rng.rand_range(4, d);
            if (width | 1) < c {
                width |= 1;
            }
            if (height | 1) < d {
                height |= 1;
            }
            if height * 3 / 2 < width {
                width = height * 3 / 2;
            }
            if width * 3 / 2 < height {
                height = width * 3 / 2;
            }

            a += ctx.rng.rand_int(c - width);
            b += ctx.rng.rand_int(d - height);

            ctx.tiles.mark_rect(a, b, a + width, b + height, |tile| {
                tile.terrain = Terrain::Open;
                tile.room = room_id;
            });

            let mut secondary = ctx.props.secondary_structures && ctx.rng.rand_int(100) < 50;
            let mut imperfect = ctx.props.room_imperfections;
            if secondary && imperfect {
                imperfect = 0x31 < ctx.rng.rand_int(100);
                if a < 49 {
                    secondary = false;
                }
            }

            let cell = ctx.grid.cell_mut(x, y);
            cell.start_x = a;
            cell.end_x = a + width;
            cell.start_y = b;
            cell.end_y = b + height;
            cell.flag_secondary_structure = secondary;
            cell.flag_imperfect = imperfect;
            room_id = room_id.wrapping_add(1);
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

    fn context<'a>(
        rng: &'a mut DungeonRng,
        props: &'a FloorProperties,
        geometry: GridGeometry,
    ) -> LayoutContext<'a> {
        LayoutContext::new(rng, props, GenerationOptions::default(), &geometry)
    }

    #[test]
    fn small_floors_invalidate_right_half() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(1);
        let geometry = GridGeometry { grid_x: 4, grid_y: 3, floor_size: FloorSize::Small, ..GridGeometry::default() };
        let mut ctx = context(&mut rng, &props, geometry);
        initialize_grid(&mut ctx);

        for (x, y) in ctx.grid.positions() {
            assert_eq!(ctx.grid.cell(x, y).is_invalid, x >= 2, "cell ({x}, {y})");
        }
    }

    #[test]
    fn medium_floors_keep_the_left_three_quarters() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(1);
        let geometry = GridGeometry { grid_x: 4, grid_y: 2, floor_size: FloorSize::Medium, ..GridGeometry::default() };
        let mut ctx = context(&mut rng, &props, geometry);
        initialize_grid(&mut ctx);

        for (x, y) in ctx.grid.positions() {
            assert_eq!(ctx.grid.cell(x, y).is_invalid, x >= 3, "cell ({x}, {y})");
        }
        assert_eq!(ctx.rng.draws_since(1), 0);
    }

    #[test]
    fn assign_rooms_consumes_fixed_draw_count_when_rooms_suffice() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(42);
        let geometry = GridGeometry { grid_x: 4, grid_y: 4, ..GridGeometry::default() };
        let mut ctx = context(&mut rng, &props, geometry);
        initialize_grid(&mut ctx);
        assign_rooms(&mut ctx, 12, false);

        // One variance draw plus two draws per swap.
        assert_eq!(ctx.rng.draws_since(42), 1 + 64 * 2);
        let rooms = ctx.grid.positions().filter(|&(x, y)| ctx.grid.cell(x, y).is_room).count();
        assert!(rooms >= 2);
        assert_eq!(ctx.status.room_count, rooms);
    }

    #[test]
    fn rooms_stay_inside_their_cell_and_are_painted() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(7);
        let geometry = GridGeometry { grid_x: 3, grid_y: 2, ..GridGeometry::default() };
        let mut ctx = context(&mut rng, &props, geometry);
        compute_grid_coordinates(&mut ctx);
        initialize_grid(&mut ctx);
        assign_rooms(&mut ctx, 4, false);
        create_rooms_and_anchors(&mut ctx);

        let coords = ctx.grid.coords;
        for (x, y) in ctx.grid.positions() {
            let cell = *ctx.grid.cell(x, y);
            assert!(cell.start_x >= coords.col(x) && cell.end_x <= coords.col(x + 1), "cell ({x}, {y})");
            assert!(cell.start_y >= coords.row(y) && cell.end_y <= coords.row(y + 1), "cell ({x}, {y})");
            if cell.is_room {
                assert!(cell.width() >= 1 && cell.height() >= 1);
                assert!(cell.width() <= cell.height() * 3 / 2 + 1);
                let tile = ctx.tiles.tile(cell.start_x, cell.start_y);
                assert_eq!(tile.terrain, Terrain::Open);
                assert!(tile.in_real_room());
            } else {
                let tile = ctx.tiles.tile(cell.start_x, cell.start_y);
                assert!(tile.is_anchor() && tile.is_junction);
            }
        }
    }
}
