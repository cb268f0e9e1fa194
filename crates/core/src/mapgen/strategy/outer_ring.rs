use crate::mapgen::connections::assign_connections;
use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::rng::DungeonRng;

use super::{LayoutStrategy, connect, decorate, lay_out_grid, link_border_ring, place_fixed_rooms};

/// A hallway loop around the floor edge enclosing a 4×2 block of rooms.
pub struct OuterRing;

impl LayoutStrategy for OuterRing {
    fn name(&self) -> &'static str {
        "outer_ring"
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 6;
        geometry.grid_y = 4;
        geometry.generate_secondary_terrain = true;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        let (last_x, last_y) = (ctx.grid.width - 1, ctx.grid.height - 1);
        place_fixed_rooms(ctx, |x, y| Some(x > 0 && x < last_x && y > 0 && y < last_y));
        link_border_ring(ctx);

        let cursor_x = 1 + ctx.rng.rand_int(4);
        let cursor_y = 1 + ctx.rng.rand_int(2);
        assign_connections(ctx, cursor_x, cursor_y);
        connect(ctx, false);
        decorate(ctx);
    }
}
