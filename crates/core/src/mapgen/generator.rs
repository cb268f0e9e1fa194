//! Attempt loop that composes geometry choice, a layout strategy, finishing,
//! and validation, falling back to a single monster-house room.

use std::collections::{BTreeSet, VecDeque};

use crate::props::{FloorLayout, FloorProperties};
use crate::rng::DungeonRng;
use crate::tiles::TileGrid;
use crate::types::{FLOOR_HEIGHT, FLOOR_WIDTH, GenerationOptions, Pos};

use super::context::{GridGeometry, LayoutContext};
use super::finishing::{fix_junctions, grow_secondary_terrain, reset_border};
use super::model::{FloorSummary, GeneratedFloor, GenerationStatus};
use super::spawns::{SpawnContext, place_spawns};
use super::strategy::{LayoutStrategy, OneRoomMonsterHouse, strategy_for};

const OUTER_ATTEMPTS: u32 = 10;
const INNER_ATTEMPTS: u32 = 10;
const GEOMETRY_TRIES: u32 = 32;
/// Fewest tiles a grid column or row may span before the axis collapses to
/// a single cell.
const MIN_CELL_SPAN: i32 = 8;

/// What survives of a laid-out attempt once its context is released.
struct Attempt {
    strategy: &'static str,
    tiles: TileGrid,
    status: GenerationStatus,
    grid_width: i32,
    grid_height: i32,
    room_count: usize,
}

pub struct FloorGenerator<'a> {
    props: &'a FloorProperties,
    options: GenerationOptions,
}

impl<'a> FloorGenerator<'a> {
    pub fn new(props: &'a FloorProperties, options: GenerationOptions) -> Self {
        Self { props, options }
    }

    pub fn generate(&self, seed: u32) -> GeneratedFloor {
        let mut rng = DungeonRng::new(seed);
        let strategy = strategy_for(self.props.layout);
        let mut geometry = GridGeometry::default();

        for outer in 0..OUTER_ATTEMPTS {
            geometry.attempts = outer;
            let Some(attempt) = self.lay_out(strategy, &mut geometry, &mut rng) else {
                log::debug!("attempt {outer}: no layout with enough rooms");
                continue;
            };
            let floor = self.finish(attempt, &mut rng, false);
            if is_floor_valid(&floor) {
                log::debug!("attempt {outer}: {} floor accepted", floor.summary.strategy);
                return floor;
            }
            log::debug!("attempt {outer}: stairs missing or rooms unreachable");
        }

        self.fall_back(strategy, &mut geometry, &mut rng)
    }

    /// Lays out one more attempt with the counter at its limit, discards it
    /// whatever its validity, and returns the one-room monster house. The
    /// discarded attempt still advances the random source.
    fn fall_back(
        &self,
        strategy: &'static dyn LayoutStrategy,
        geometry: &mut GridGeometry,
        rng: &mut DungeonRng,
    ) -> GeneratedFloor {
        log::warn!(
            "no valid {} floor after {OUTER_ATTEMPTS} attempts; using a one-room monster house",
            strategy.name()
        );
        geometry.attempts = OUTER_ATTEMPTS;
        let _discarded = self.lay_out(strategy, geometry, rng);
        let attempt = self.run_strategy(&OneRoomMonsterHouse, geometry, rng);
        self.finish(attempt, rng, true)
    }

    /// Inner retry loop: redraws the geometry until the strategy paints
    /// enough rooms.
    fn lay_out(
        &self,
        strategy: &'static dyn LayoutStrategy,
        geometry: &mut GridGeometry,
        rng: &mut DungeonRng,
    ) -> Option<Attempt> {
        for inner in 0..INNER_ATTEMPTS {
            choose_geometry(geometry, self.props.layout, rng);
            let attempt = self.run_strategy(strategy, geometry, rng);
            if !attempt.status.is_invalid {
                return Some(attempt);
            }
            log::trace!(
                "inner attempt {inner}: {} rooms on a {}x{} grid",
                attempt.room_count,
                attempt.grid_width,
                attempt.grid_height
            );
        }
        None
    }

    fn run_strategy(
        &self,
        strategy: &dyn LayoutStrategy,
        geometry: &mut GridGeometry,
        rng: &mut DungeonRng,
    ) -> Attempt {
        strategy.prepare(geometry, rng);
        let mut ctx = LayoutContext::new(rng, self.props, self.options, geometry);
        strategy.build(&mut ctx);

        let room_count = ctx.painted_room_count();
        ctx.status.is_invalid = room_count < strategy.min_rooms();
        let LayoutContext { tiles, status, grid, .. } = ctx;
        Attempt {
            strategy: strategy.name(),
            tiles,
            status,
            grid_width: grid.width,
            grid_height: grid.height,
            room_count,
        }
    }

    fn finish(&self, attempt: Attempt, rng: &mut DungeonRng, used_fallback: bool) -> GeneratedFloor {
        let Attempt { strategy, mut tiles, status, grid_width, grid_height, room_count } = attempt;

        reset_border(&mut tiles);
        if status.attempts < OUTER_ATTEMPTS {
            fix_junctions(&mut tiles);
        }
        if status.generate_secondary_terrain {
            grow_secondary_terrain(&mut tiles, rng, self.props.secondary_terrain_density);
        }
        let anchors = place_spawns(&mut SpawnContext { tiles: &mut tiles, rng, props: self.props });

        let summary = FloorSummary {
            strategy: strategy.to_owned(),
            grid_width,
            grid_height,
            floor_size: status.floor_size,
            room_count,
            has_maze: status.has_maze,
            has_kecleon_shop: status.has_kecleon_shop,
            has_monster_house: status.has_monster_house,
            attempts: status.attempts,
            used_fallback,
            stairs: anchors.stairs,
            player_spawn: anchors.player,
            rng_state: rng.state(),
        };
        GeneratedFloor { tiles, summary }
    }
}

/// Draws a grid shape in range for the layout, collapsing an axis to one
/// cell when its cells would be too narrow.
fn choose_geometry(geometry: &mut GridGeometry, layout: FloorLayout, rng: &mut DungeonRng) {
    let (max_x, max_y) = if layout == FloorLayout::Large0x8 { (5, 4) } else { (9, 8) };
    let drawn = (0..GEOMETRY_TRIES).find_map(|_| {
        let x = rng.rand_range(2, max_x);
        let y = rng.rand_range(2, max_y);
        (x <= 6 && y <= 4).then_some((x, y))
    });
    let (mut grid_x, mut grid_y) = drawn.unwrap_or((4, 4));
    if FLOOR_WIDTH / grid_x < MIN_CELL_SPAN {
        grid_x = 1;
    }
    if FLOOR_HEIGHT / grid_y < MIN_CELL_SPAN {
        grid_y = 1;
    }
    geometry.grid_x = grid_x;
    geometry.grid_y = grid_y;
}

/// Stairs exist and every open room tile not flagged unreachable can be
/// walked to from them.
fn is_floor_valid(floor: &GeneratedFloor) -> bool {
    let Some(stairs) = floor.summary.stairs else {
        return false;
    };
    let tiles = &floor.tiles;

    let mut open = VecDeque::from([stairs]);
    let mut seen = BTreeSet::from([stairs]);
    while let Some(pos) = open.pop_front() {
        for next in [
            Pos::new(pos.x, pos.y - 1),
            Pos::new(pos.x + 1, pos.y),
            Pos::new(pos.x, pos.y + 1),
            Pos::new(pos.x - 1, pos.y),
        ] {
            if !TileGrid::in_bounds(next.x, next.y) || !tiles.at(next).is_open() || seen.contains(&next) {
                continue;
            }
            seen.insert(next);
            open.push_back(next);
        }
    }

    tiles
        .iter()
        .filter(|(_, tile)| tile.is_open() && tile.in_real_room() && !tile.is_unreachable_from_stairs)
        .all(|(pos, _)| seen.contains(&pos))
}
