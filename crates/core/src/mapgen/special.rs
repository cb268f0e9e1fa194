//! Special rooms: Kecleon shops, monster houses, and the experimental maze
//! room and room-imperfection passes.

use std::array;

use crate::types::{FloorType, NO_ROOM, Terrain};

use super::context::LayoutContext;
use super::structures::{carve_maze, is_next_to_hallway};

/// Converts the first eligible room, visited in a shuffled column/row
/// order, into a shop. Succeeds only when the chance roll passes.
pub(super) fn place_kecleon_shop(ctx: &mut LayoutContext<'_>, chance: i32) -> bool {
    if ctx.rng.rand_int(100) >= chance {
        return false;
    }

    let mut order_x: [i32; 15] = array::from_fn(|i| i as i32);
    let mut order_y: [i32; 15] = array::from_fn(|i| i as i32);
    for order in [&mut order_x, &mut order_y] {
        for _ in 0..200 {
            let a = ctx.rng.rand_int(15) as usize;
            let b = ctx.rng.rand_int(15) as usize;
            order.swap(a, b);
        }
    }

    let (grid_x, grid_y) = (ctx.grid.width, ctx.grid.height);
    for &x in order_x.iter().take(grid_x as usize) {
        if x >= grid_x {
            continue;
        }
        for &y in order_y.iter().take(grid_y as usize) {
            if y >= grid_y {
                continue;
            }
            let cell = *ctx.grid.cell(x, y);
            if cell.can_host_shop() && cell.width().abs() > 4 && cell.height().abs() > 3 {
                ctx.grid.cell_mut(x, y).is_kecleon_shop = true;
                ctx.tiles.mark_rect(cell.start_x, cell.start_y, cell.end_x, cell.end_y, |tile| {
                    tile.is_kecleon_shop = true;
                });
                log::trace!("kecleon shop in cell ({x}, {y})");
                return true;
            }
        }
    }
    false
}

/// Picks one eligible room by shuffling a single set flag. A `forced` house
/// skips the chance roll and the floor checks but still draws the shuffle.
pub(super) fn place_monster_house(ctx: &mut LayoutContext<'_>, chance: i32, forced: bool) -> bool {
    if !forced {
        let rolled = chance > 0 && ctx.rng.rand_int(100) < chance;
        if !rolled || ctx.status.has_kecleon_shop || ctx.status.floor_type != FloorType::Normal {
            return false;
        }
    }

    let eligible = ctx
        .grid
        .positions()
        .filter(|&(x, y)| ctx.grid.cell(x, y).can_host_monster_house())
        .count() as i32;
    if eligible == 0 {
        return false;
    }

    let mut flags = [false; 256];
    flags[0] = true;
    for _ in 0..64 {
        let a = ctx.rng.rand_int(eligible) as usize;
        let b = ctx.rng.rand_int(eligible) as usize;
        flags.swap(a, b);
    }

    let mut index = 0;
    for (x, y) in ctx.grid.positions() {
        let cell = *ctx.grid.cell(x, y);
        if !cell.can_host_monster_house() {
            continue;
        }
        if flags[index] {
            ctx.grid.cell_mut(x, y).is_monster_house = true;
            ctx.tiles.mark_rect(cell.start_x, cell.start_y, cell.end_x, cell.end_y, |tile| {
                tile.is_monster_house = true;
            });
            ctx.status.has_monster_house = true;
            log::trace!("monster house in cell ({x}, {y})");
            return true;
        }
        index += 1;
    }
    false
}

/// Turns one connected odd-sized room into a wall maze.
pub(super) fn place_maze_room(ctx: &mut LayoutContext<'_>, chance: i32) {
    if chance <= 0 || ctx.rng.rand_int(100) >= chance {
        return;
    }
    let candidates: Vec<(i32, i32)> = ctx
        .grid
        .positions()
        .filter(|&(x, y)| {
            let cell = ctx.grid.cell(x, y);
            cell.can_host_shop()
                && cell.width() >= 5
                && cell.height() >= 5
                && cell.width() % 2 == 1
                && cell.height() % 2 == 1
        })
        .collect();
    if candidates.is_empty() {
        return;
    }
    let pick = candidates[ctx.rng.rand_int(candidates.len() as i32) as usize];
    carve_maze(ctx, pick, false);
}

/// Diagonal directions walking inward from each room corner.
const CORNERS: [(bool, bool, i32, i32); 4] =
    [(false, false, 1, 1), (true, false, -1, 1), (true, true, -1, -1), (false, true, 1, -1)];

/// Shaves tiles off the corners of rooms flagged imperfect.
pub(super) fn add_room_imperfections(ctx: &mut LayoutContext<'_>) {
    for (x, y) in ctx.grid.positions() {
        let cell = *ctx.grid.cell(x, y);
        let eligible = cell.is_connected_room()
            && !cell.was_merged_into
            && !cell.is_merged_room
            && !cell.has_secondary_structure
            && !cell.is_maze_room
            && cell.flag_imperfect;
        if !eligible || ctx.rng.rand_int(100) >= 60 {
            continue;
        }

        let passes = ((cell.width() + cell.height()) / 4).max(1);
        let reach = cell.width().min(cell.height());
        for _ in 0..passes {
            let (from_right, from_bottom, dx, dy) = CORNERS[ctx.rng.rand_int(4) as usize];
            let mut tx = if from_right { cell.end_x - 1 } else { cell.start_x };
            let mut ty = if from_bottom { cell.end_y - 1 } else { cell.start_y };
            for _ in 0..reach {
                let tile = ctx.tiles.tile(tx, ty);
                if tile.terrain == Terrain::Open {
                    if !tile.is_junction && !is_next_to_hallway(&ctx.tiles, tx, ty) {
                        let tile = ctx.tiles.tile_mut(tx, ty);
                        tile.terrain = Terrain::Wall;
                        tile.room = NO_ROOM;
                    }
                    break;
                }
                tx += dx;
                ty += dy;
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

    fn two_rooms<'a>(rng: &'a mut DungeonRng, props: &'a FloorProperties) -> LayoutContext<'a> {
        let geometry = GridGeometry { grid_x: 2, grid_y: 1, ..GridGeometry::default() };
        let mut ctx = LayoutContext::new(rng, props, GenerationOptions::default(), &geometry);
        for (index, (sx, ex)) in [(3, 12), (30, 41)].into_iter().enumerate() {
            let cell = ctx.grid.cell_mut(index as i32, 0);
            cell.start_x = sx;
            cell.end_x = ex;
            cell.start_y = 4;
            cell.end_y = 11;
            cell.is_connected = true;
            ctx.tiles.mark_rect(sx, 4, ex, 11, |tile| {
                tile.terrain = Terrain::Open;
                tile.room = index as u8;
            });
        }
        ctx
    }

    #[test]
    fn shop_with_zero_chance_never_places() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(8);
        let mut ctx = two_rooms(&mut rng, &props);
        assert!(!place_kecleon_shop(&mut ctx, 0));
        assert_eq!(ctx.rng.draws_since(8), 1);
    }

    #[test]
    fn shop_with_full_chance_flags_one_room() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(8);
        let mut ctx = two_rooms(&mut rng, &props);
        assert!(place_kecleon_shop(&mut ctx, 100));

        let shops = ctx.grid.positions().filter(|&(x, y)| ctx.grid.cell(x, y).is_kecleon_shop).count();
        assert_eq!(shops, 1);
        assert_eq!(ctx.tiles.count(|tile| tile.is_kecleon_shop), 9 * 7);
        // Chance roll plus two 200-swap shuffles.
        assert_eq!(ctx.rng.draws_since(8), 1 + 800);
    }

    #[test]
    fn monster_house_always_lands_on_an_eligible_room() {
        let props = FloorProperties::default();
        for seed in 0..32 {
            let mut rng = DungeonRng::new(seed);
            let mut ctx = two_rooms(&mut rng, &props);
            assert!(place_monster_house(&mut ctx, 100, false), "seed {seed}");
            assert!(ctx.status.has_monster_house);
            let houses = ctx.grid.positions().filter(|&(x, y)| ctx.grid.cell(x, y).is_monster_house).count();
            assert_eq!(houses, 1, "seed {seed}");
        }
    }

    #[test]
    fn monster_house_is_blocked_by_shop_and_rescue_floors() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(2);
        let mut ctx = two_rooms(&mut rng, &props);
        ctx.status.has_kecleon_shop = true;
        assert!(!place_monster_house(&mut ctx, 100, false));

        let mut rng = DungeonRng::new(2);
        let mut ctx = two_rooms(&mut rng, &props);
        ctx.status.floor_type = FloorType::Rescue;
        assert!(!place_monster_house(&mut ctx, 100, false));
        assert!(place_monster_house(&mut ctx, 0, true));
    }

    #[test]
    fn imperfections_never_wall_junctions() {
        let props = FloorProperties::default();
        for seed in 0..16 {
            let mut rng = DungeonRng::new(seed);
            let mut ctx = two_rooms(&mut rng, &props);
            for (x, y) in ctx.grid.positions() {
                ctx.grid.cell_mut(x, y).flag_imperfect = true;
            }
            for (x, y) in [(3, 4), (11, 4), (3, 10), (11, 10)] {
                ctx.tiles.tile_mut(x, y).is_junction = true;
            }
            add_room_imperfections(&mut ctx);
            for (x, y) in [(3, 4), (11, 4), (3, 10), (11, 10)] {
                assert_eq!(ctx.tiles.terrain(x, y), Terrain::Open, "seed {seed} corner ({x}, {y})");
            }
        }
    }
}
