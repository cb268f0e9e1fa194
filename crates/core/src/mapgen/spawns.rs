//! Stairs, item, trap, and player spawn placement on a finished floor.

use crate::props::FloorProperties;
use crate::rng::DungeonRng;
use crate::tiles::{Tile, TileGrid};
use crate::types::{Occupant, Pos};

pub(super) struct SpawnContext<'a> {
    pub(super) tiles: &'a mut TileGrid,
    pub(super) rng: &'a mut DungeonRng,
    pub(super) props: &'a FloorProperties,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct SpawnAnchors {
    pub(super) stairs: Option<Pos>,
    pub(super) player: Option<Pos>,
}

fn is_spawn_candidate(tile: &Tile) -> bool {
    tile.is_open()
        && tile.in_real_room()
        && !tile.is_kecleon_shop
        && tile.occupant != Occupant::Enemy
        && !tile.is_key_door
        && !tile.is_unreachable_from_stairs
}

/// Eligible tiles in column-major order.
fn spawn_candidates(tiles: &TileGrid) -> Vec<Pos> {
    let mut candidates: Vec<Pos> =
        tiles.iter().filter(|(_, tile)| is_spawn_candidate(tile)).map(|(pos, _)| pos).collect();
    candidates.sort_by_key(|pos| (pos.x, pos.y));
    candidates
}

/// Picks `count` of `pool` in order: each candidate is taken when a draw over
/// the candidates still unseen falls below the number still to place.
fn select_sample(rng: &mut DungeonRng, pool: &[Pos], count: i32) -> Vec<Pos> {
    let mut to_place = count.max(0);
    let mut picked = Vec::with_capacity(to_place as usize);
    for (index, &pos) in pool.iter().enumerate() {
        if to_place == 0 {
            break;
        }
        let remaining = (pool.len() - index) as i32;
        if rng.rand_int(remaining) < to_place {
            picked.push(pos);
            to_place -= 1;
        }
    }
    picked
}

pub(super) fn place_spawns(context: &mut SpawnContext<'_>) -> SpawnAnchors {
    let candidates = spawn_candidates(context.tiles);

    let preset = context.tiles.iter().find(|(_, tile)| tile.has_stairs).map(|(pos, _)| pos);
    let stairs = match preset {
        Some(pos) => Some(pos),
        None if candidates.is_empty() => None,
        None => {
            let pick = candidates[context.rng.rand_int(candidates.len() as i32) as usize];
            context.tiles.tile_mut(pick.x, pick.y).has_stairs = true;
            Some(pick)
        }
    };

    let mut pool: Vec<Pos> = candidates.into_iter().filter(|&pos| Some(pos) != stairs).collect();

    let item_density = context.props.item_density;
    if item_density > 0 {
        // Same single draw as a range over [d - 2, d + 2), kept signed so
        // densities below 2 cannot wrap.
        let count = (item_density - 2 + context.rng.rand_int(4)).max(1);
        let items = select_sample(context.rng, &pool, count);
        for pos in &items {
            context.tiles.tile_mut(pos.x, pos.y).has_item = true;
        }
        pool.retain(|pos| !items.contains(pos));
    }

    let trap_density = context.props.trap_density;
    if trap_density > 0 {
        let count = context.rng.rand_range(trap_density / 2, trap_density);
        let traps = select_sample(context.rng, &pool, count);
        for pos in &traps {
            context.tiles.tile_mut(pos.x, pos.y).has_trap = true;
        }
        pool.retain(|pos| !traps.contains(pos));
    }

    let player = if pool.is_empty() {
        None
    } else {
        let pick = pool[context.rng.rand_int(pool.len() as i32) as usize];
        context.tiles.tile_mut(pick.x, pick.y).occupant = Occupant::Player;
        Some(pick)
    };

    log::trace!("spawns: stairs {stairs:?}, player {player:?}");
    SpawnAnchors { stairs, player }
}
