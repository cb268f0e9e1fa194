use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::grid::Direction;
use crate::rng::DungeonRng;

use super::{LayoutStrategy, connect, decorate, lay_out_grid, place_fixed_rooms};

/// Rooms along the edges, each joined inward to a central hallway lattice.
pub struct Crossroads;

impl LayoutStrategy for Crossroads {
    fn name(&self) -> &'static str {
        "crossroads"
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 5;
        geometry.grid_y = 4;
        geometry.generate_secondary_terrain = true;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        let (last_x, last_y) = (ctx.grid.width - 1, ctx.grid.height - 1);
        place_fixed_rooms(ctx, |x, y| {
            let edge_x = x == 0 || x == last_x;
            let edge_y = y == 0 || y == last_y;
            match (edge_x, edge_y) {
                (true, true) => None,
                (false, false) => Some(false),
                _ => Some(true),
            }
        });

        for x in 1..last_x {
            ctx.grid.link(x, 0, Direction::Down);
            ctx.grid.link(x, last_y, Direction::Up);
        }
        for y in 1..last_y {
            ctx.grid.link(0, y, Direction::Right);
            ctx.grid.link(last_x, y, Direction::Left);
        }
        for x in 1..last_x {
            for y in 1..last_y {
                if x + 1 < last_x {
                    ctx.grid.link(x, y, Direction::Right);
                }
                if y + 1 < last_y {
                    ctx.grid.link(x, y, Direction::Down);
                }
            }
        }

        connect(ctx, false);
        decorate(ctx);
    }
}
