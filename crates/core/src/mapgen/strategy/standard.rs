use crate::mapgen::connections::assign_connections;
use crate::mapgen::context::{GridGeometry, LayoutContext};
use crate::mapgen::rooms::{assign_rooms, create_rooms_and_anchors};
use crate::rng::DungeonRng;
use crate::types::FloorSize;

use super::{LayoutStrategy, connect, decorate, lay_out_grid};

/// Random rooms and anchors over the dispatcher's grid. Small and medium
/// floors pin the grid to four columns and shrink the usable footprint.
pub struct Standard {
    size: FloorSize,
}

impl Standard {
    pub const fn new(size: FloorSize) -> Self {
        Self { size }
    }
}

impl LayoutStrategy for Standard {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn prepare(&self, geometry: &mut GridGeometry, rng: &mut DungeonRng) {
        geometry.floor_size = self.size;
        if self.size != FloorSize::Large {
            geometry.grid_x = 4;
            geometry.grid_y = rng.rand_int(2) + 2;
        }
        geometry.generate_secondary_terrain = true;
    }

    fn build(&self, ctx: &mut LayoutContext<'_>) {
        lay_out_grid(ctx);
        // Positive densities get a little variance; the rest ask for an exact count.
        let density = ctx.props.room_density;
        assign_rooms(ctx, density.abs(), density <= 0);
        create_rooms_and_anchors(ctx);

        let cursor_x = ctx.rng.rand_int(ctx.grid.width);
        let cursor_y = ctx.rng.rand_int(ctx.grid.height);
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
    fn negative_density_requests_an_exact_room_count() {
        let props = FloorProperties { room_density: -3, ..FloorProperties::default() };
        for seed in 0..16 {
            let mut rng = DungeonRng::new(seed);
            let geometry = GridGeometry { grid_x: 4, grid_y: 3, ..GridGeometry::default() };
            let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
            Standard::new(FloorSize::Large).build(&mut ctx);
            assert!(ctx.status.room_count <= 3, "seed {seed}");
        }
    }

    #[test]
    fn small_floors_keep_rooms_on_the_left_half() {
        let props = FloorProperties::default();
        let strategy = Standard::new(FloorSize::Small);
        for seed in 0..16 {
            let mut rng = DungeonRng::new(seed);
            let mut geometry = GridGeometry::default();
            strategy.prepare(&mut geometry, &mut rng);
            let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
            strategy.build(&mut ctx);

            let half = ctx.grid.coords.col(2);
            for (pos, tile) in ctx.tiles.iter() {
                if tile.in_real_room() {
                    assert!(pos.x < half, "seed {seed} room tile at {pos:?}");
                }
            }
        }
    }
}
