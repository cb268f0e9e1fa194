use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::grid::Direction;
use crate::rng::DungeonRng;

use super::{LayoutStrategy, connect, decorate, lay_out_grid, place_fixed_rooms};

/// A single row of rooms, each joined to the next.
pub struct Line;

impl LayoutStrategy for Line {
    fn name(&self) -> &'static str {
        "line"
    }

    /// Keeps the width drawn by the dispatcher's geometry roll.
    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_y = 1;
        geometry.generate_secondary_terrain = true;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        place_fixed_rooms(ctx, |_, _| Some(true));
        for x in 0..ctx.grid.width - 1 {
            ctx.grid.link(x, 0, Direction::Right);
        }
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
    fn rooms_form_one_chain() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(21);
        let mut geometry = GridGeometry { grid_x: 4, grid_y: 3, ..GridGeometry::default() };
        Line.prepare(&mut geometry, &mut rng);
        let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
        Line.build(&mut ctx);

        assert_eq!(ctx.grid.height, 1);
        assert_eq!(ctx.status.room_count, 4);
        for x in 0..3 {
            assert!(ctx.grid.cell(x, 0).connected_right, "cell {x}");
            assert!(ctx.grid.cell(x + 1, 0).connected_left, "cell {}", x + 1);
        }
        assert!(ctx.painted_room_count() >= 1);
    }
}
