use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::grid::Direction;
use crate::rng::DungeonRng;

use super::{LayoutStrategy, connect, decorate, lay_out_grid, place_fixed_rooms};

/// Five rooms in a plus shape around a centre room.
pub struct Cross;

impl LayoutStrategy for Cross {
    fn name(&self) -> &'static str {
        "cross"
    }

    fn prepare(&self, geometry: &mut GridGeometry, _rng: &mut DungeonRng) {
        geometry.grid_x = 3;
        geometry.grid_y = 3;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        place_fixed_rooms(ctx, |x, y| (x == 1 || y == 1).then_some(true));
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            ctx.grid.link(1, 1, direction);
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
    fn corners_stay_empty() {
        let props = FloorProperties::default();
        let mut rng = DungeonRng::new(4);
        let mut geometry = GridGeometry::default();
        Cross.prepare(&mut geometry, &mut rng);
        let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
        Cross.build(&mut ctx);

        assert_eq!(ctx.status.room_count, 5);
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(ctx.grid.cell(x, y).is_invalid);
        }
        assert_eq!(ctx.grid.cell(1, 1).connection_count(), 4);
    }
}
