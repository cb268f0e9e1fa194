use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::rng::DungeonRng;
use crate::types::{FLOOR_HEIGHT, FLOOR_WIDTH, Terrain};

use super::{LayoutStrategy, lay_out_grid};

/// Tiles kept clear between the room and the floor edge.
const MARGIN: i32 = 2;

/// A single room filling the floor, all of it a monster house. Also the
/// dispatcher's fallback, so it never draws.
pub struct OneRoomMonsterHouse;

impl LayoutStrategy for OneRoomMonsterHouse {
    fn name(&self) -> &'static str {
        "one_room_monster_house"
    }

    fn min_rooms(&self) -> usize {
        1
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 1;
        geometry.grid_y = 1;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        ctx.grid.width = 1;
        ctx.grid.height = 1;
        lay_out_grid(ctx);

        let (start_x, start_y) = (MARGIN, MARGIN);
        let (end_x, end_y) = (FLOOR_WIDTH - MARGIN, FLOOR_HEIGHT - MARGIN);
        let cell = ctx.grid.cell_mut(0, 0);
        cell.start_x = start_x;
        cell.start_y = start_y;
        cell.end_x = end_x;
        cell.end_y = end_y;
        cell.is_room = true;
        cell.is_connected = true;
        cell.is_monster_house = true;

        ctx.tiles.mark_rect(start_x, start_y, end_x, end_y, |tile| {
            tile.terrain = Terrain::Open;
            tile.room = 0;
            tile.is_monster_house = true;
        });
        ctx.status.room_count = 1;
        ctx.status.has_monster_house = true;
    }
}
