use crate::mapgen::connections::{carve_connections, ensure_connectivity};
use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::grid::Direction;
use crate::mapgen::hallways::add_extra_hallways;
use crate::mapgen::special::place_monster_house;
use crate::mapgen::structures::add_secondary_structures;
use crate::rng::DungeonRng;

use super::{LayoutStrategy, lay_out_grid, place_fixed_rooms};

/// Two side-by-side rooms joined by one hallway; one of them always holds a
/// monster house.
pub struct TwoRoomsWithMonsterHouse;

impl LayoutStrategy for TwoRoomsWithMonsterHouse {
    fn name(&self) -> &'static str {
        "two_rooms_with_monster_house"
    }

    fn min_rooms(&self) -> usize {
        1
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 2;
        geometry.grid_y = 1;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        place_fixed_rooms(ctx, |_, _| Some(true));
        ctx.grid.link(0, 0, Direction::Right);
        carve_connections(ctx, true);
        ensure_connectivity(ctx);

        ctx.status.has_monster_house = place_monster_house(ctx, 0, true);
        let extra = ctx.props.extra_hallways;
        if extra != 0 {
            add_extra_hallways(ctx, extra);
        }
        add_secondary_structures(ctx);
    }
}
