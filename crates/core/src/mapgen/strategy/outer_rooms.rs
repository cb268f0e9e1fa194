use crate::mapgen::connections::assign_connections;
use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::rng::DungeonRng;

use super::{LayoutStrategy, connect, decorate, lay_out_grid, link_border_ring, place_fixed_rooms};

/// Rooms around the floor edge joined in a ring, with hallway anchors in
/// the interior.
pub struct OuterRooms;

impl LayoutStrategy for OuterRooms {
    fn name(&self) -> &'static str {
        "outer_rooms"
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = geometry.grid_x.max(3);
        geometry.grid_y = geometry.grid_y.max(3);
        geometry.generate_secondary_terrain = true;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        let (last_x, last_y) = (ctx.grid.width - 1, ctx.grid.height - 1);
        place_fixed_rooms(ctx, |x, y| Some(x == 0 || y == 0 || x == last_x || y == last_y));
        link_border_ring(ctx);

        let cursor_x = 1 + ctx.rng.rand_int(last_x - 1);
        let cursor_y = 1 + ctx.rng.rand_int(last_y - 1);
        assign_connections(ctx, cursor_x, cursor_y);
        connect(ctx, false);
        decorate(ctx);
    }
}

#[cfg(test)]
mod tests {
    use crate::props::FloorProperties;
    use crate::types::GenerationOptions;

    use super::*;

    #[test]
    fn border_rooms_ring_the_interior() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(12);
        let mut geometry = GridGeometry { grid_x: 4, grid_y: 2, ..GridGeometry::default() };
        OuterRooms.prepare(&mut geometry, &mut rng);
        assert_eq!((geometry.grid_x, geometry.grid_y), (4, 3));

        let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
        OuterRooms.build(&mut ctx);
        assert_eq!(ctx.status.room_count, 10);
        assert!(!ctx.grid.cell(1, 1).is_room && !ctx.grid.cell(2, 1).is_room);
        for x in 0..3 {
            assert!(ctx.grid.cell(x, 0).connected_right, "top cell {x}");
            assert!(ctx.grid.cell(x, 2).connected_right, "bottom cell {x}");
        }
    }
}
