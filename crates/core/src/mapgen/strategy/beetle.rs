use crate::mapgen::connections::{carve_connections, ensure_connectivity, try_merge};
use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::grid::Direction;
use crate::rng::DungeonRng;

use super::{LayoutStrategy, decorate, lay_out_grid, place_fixed_rooms};

/// A large body room down the middle column with three rooms on each side.
pub struct Beetle;

impl LayoutStrategy for Beetle {
    fn name(&self) -> &'static str {
        "beetle"
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 3;
        geometry.grid_y = 3;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        place_fixed_rooms(ctx, |_, _| Some(true));
        for y in 0..3 {
            ctx.grid.link(0, y, Direction::Right);
            ctx.grid.link(1, y, Direction::Right);
        }
        carve_connections(ctx, true);

        try_merge(ctx, (1, 0), (1, 1));
        try_merge(ctx, (1, 1), (1, 2));
        ensure_connectivity(ctx);
        decorate(ctx);
    }
}
