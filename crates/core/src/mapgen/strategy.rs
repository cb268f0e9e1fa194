//! Floor shapes. Every layout maps onto one strategy that fixes the grid
//! shape and composes the shared stages into a full attempt.

mod beetle;
mod cross;
mod crossroads;
mod line;
mod one_room_monster_house;
mod outer_ring;
mod outer_rooms;
mod standard;
mod two_rooms_with_monster_house;

use crate::props::FloorLayout;
use crate::rng::DungeonRng;
use crate::types::{FloorSize, FloorType};

use super::connections::{carve_connections, ensure_connectivity, remove_dead_ends};
use super::context::{GridGeometry, LayoutContext};
use super::grid::Direction;
use super::hallways::add_extra_hallways;
use super::rooms::{compute_grid_coordinates, create_rooms_and_anchors, initialize_grid};
use super::special::{add_room_imperfections, place_kecleon_shop, place_maze_room, place_monster_house};
use super::structures::add_secondary_structures;

pub use beetle::Beetle;
pub use cross::Cross;
pub use crossroads::Crossroads;
pub use line::Line;
pub use one_room_monster_house::OneRoomMonsterHouse;
pub use outer_ring::OuterRing;
pub use outer_rooms::OuterRooms;
pub use standard::Standard;
pub use two_rooms_with_monster_house::TwoRoomsWithMonsterHouse;

/// One floor shape.
pub trait LayoutStrategy: Sync {
    fn name(&self) -> &'static str;

    /// Fewest painted rooms an attempt may end with before it is retried.
    fn min_rooms(&self) -> usize {
        2
    }

    /// Adjusts the dispatcher's geometry before the attempt's context is
    /// built. Runs once per attempt and may draw.
    fn prepare(&self, geometry: &mut GridGeometry, rng: &mut DungeonRng);

    fn build(&self, ctx: &mut LayoutContext<'_>);
}

static LARGE: Standard = Standard::new(FloorSize::Large);
static SMALL: Standard = Standard::new(FloorSize::Small);
static MEDIUM: Standard = Standard::new(FloorSize::Medium);

pub fn strategy_for(layout: FloorLayout) -> &'static dyn LayoutStrategy {
    match layout {
        FloorLayout::Large | FloorLayout::Large0x8 => &LARGE,
        FloorLayout::Small => &SMALL,
        FloorLayout::Medium => &MEDIUM,
        FloorLayout::OneRoomMonsterHouse => &OneRoomMonsterHouse,
        FloorLayout::OuterRing => &OuterRing,
        FloorLayout::Crossroads => &Crossroads,
        FloorLayout::TwoRoomsWithMonsterHouse => &TwoRoomsWithMonsterHouse,
        FloorLayout::Line => &Line,
        FloorLayout::Cross => &Cross,
        FloorLayout::Beetle => &Beetle,
        FloorLayout::OuterRooms => &OuterRooms,
    }
}

/// Grid coordinates and validity for the context's grid size.
fn lay_out_grid(ctx: &mut LayoutContext<'_>) {
    compute_grid_coordinates(ctx);
    initialize_grid(ctx);
}

/// Fixes every cell's role, then sizes the rooms and anchors. `None`
/// invalidates a cell and `Some(true)` makes it a room.
fn place_fixed_rooms(ctx: &mut LayoutContext<'_>, role: impl Fn(i32, i32) -> Option<bool>) {
    let mut rooms = 0;
    for (x, y) in ctx.grid.positions() {
        let cell = ctx.grid.cell_mut(x, y);
        match role(x, y) {
            None => cell.is_invalid = true,
            Some(is_room) => {
                cell.is_room = is_room;
                rooms += usize::from(is_room && !cell.is_invalid);
            }
        }
    }
    ctx.status.room_count = rooms;
    create_rooms_and_anchors(ctx);
}

/// Joins the outermost ring of cells, clockwise from the top-left corner.
fn link_border_ring(ctx: &mut LayoutContext<'_>) {
    let (last_x, last_y) = (ctx.grid.width - 1, ctx.grid.height - 1);
    for x in 0..last_x {
        ctx.grid.link(x, 0, Direction::Right);
        ctx.grid.link(x, last_y, Direction::Right);
    }
    for y in 0..last_y {
        ctx.grid.link(0, y, Direction::Down);
        ctx.grid.link(last_x, y, Direction::Down);
    }
}

/// Turns the recorded connection graph into hallways and repairs it.
fn connect(ctx: &mut LayoutContext<'_>, disable_merging: bool) {
    if !ctx.props.allow_dead_ends {
        remove_dead_ends(ctx);
    }
    carve_connections(ctx, disable_merging);
    ensure_connectivity(ctx);
}

/// The stages every connected layout runs once its hallways exist.
fn decorate(ctx: &mut LayoutContext<'_>) {
    let props = ctx.props;
    if ctx.options.experimental {
        place_maze_room(ctx, props.maze_room_chance);
    }

    let shop_chance = props.kecleon_shop_spawn_chance;
    if shop_chance != 0 && !ctx.status.has_monster_house && ctx.status.floor_type != FloorType::Rescue {
        ctx.status.has_kecleon_shop = place_kecleon_shop(ctx, shop_chance);
    }
    let house_chance = props.monster_house_spawn_chance;
    if house_chance != 0 {
        ctx.status.has_monster_house = place_monster_house(ctx, house_chance, false);
    }
    if props.extra_hallways != 0 {
        add_extra_hallways(ctx, props.extra_hallways);
    }

    if ctx.options.experimental {
        add_room_imperfections(ctx);
    }
    add_secondary_structures(ctx);
}

#[cfg(test)]
mod tests {
    use crate::mapgen::model::GenerationStatus;
    use crate::props::FloorProperties;
    use crate::rng::RngState;
    use crate::tiles::TileGrid;
    use crate::types::GenerationOptions;

    use super::*;

    type Outcome = (GridGeometry, TileGrid, GenerationStatus, RngState);

    fn run(layout: FloorLayout, seed: u32) -> Outcome {
        let props = FloorProperties { layout, ..FloorProperties::default() };
        let mut rng = DungeonRng::new(seed);
        let strategy = strategy_for(layout);
        let mut geometry = GridGeometry { grid_x: 3, grid_y: 3, ..GridGeometry::default() };
        strategy.prepare(&mut geometry, &mut rng);
        let mut ctx = LayoutContext::new(&mut rng, &props, GenerationOptions::default(), &geometry);
        strategy.build(&mut ctx);
        let (tiles, status) = (ctx.tiles, ctx.status);
        (geometry, tiles, status, rng.state())
    }

    #[test]
    fn every_layout_maps_to_a_named_strategy() {
        let names: Vec<&str> = FloorLayout::ALL.iter().map(|&layout| strategy_for(layout).name()).collect();
        assert_eq!(names[usize::from(FloorLayout::Large.id())], "standard");
        assert_eq!(names[usize::from(FloorLayout::Large0x8.id())], "standard");
        assert_eq!(names[usize::from(FloorLayout::Beetle.id())], "beetle");
        assert_eq!(strategy_for(FloorLayout::OneRoomMonsterHouse).min_rooms(), 1);
        assert_eq!(strategy_for(FloorLayout::Cross).min_rooms(), 2);
    }

    #[test]
    fn fixed_shapes_set_their_grid() {
        assert_eq!(run(FloorLayout::OuterRing, 3).0.grid_x, 6);
        assert_eq!(run(FloorLayout::Crossroads, 3).0.grid_x, 5);
        assert_eq!(run(FloorLayout::Line, 3).0.grid_y, 1);
        let (geometry, ..) = run(FloorLayout::Small, 3);
        assert_eq!((geometry.grid_x, geometry.floor_size), (4, FloorSize::Small));
        assert!((2..=3).contains(&geometry.grid_y));
    }

    #[test]
    fn every_strategy_replays_identically() {
        for layout in FloorLayout::ALL {
            for seed in [0, 1, 0xBEEF] {
                assert_eq!(run(layout, seed), run(layout, seed), "{layout} seed {seed}");
            }
        }
    }
}
