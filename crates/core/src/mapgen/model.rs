//! Public data models for generated floors and their bookkeeping.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::rng::RngState;
use crate::tiles::TileGrid;
use crate::types::{FloorSize, FloorType, Occupant, Pos, Terrain};

/// Mutable bookkeeping for one generation attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationStatus {
    pub floor_type: FloorType,
    pub floor_size: FloorSize,
    pub generate_secondary_terrain: bool,
    pub room_count: usize,
    pub secondary_structures_budget: i32,
    pub has_maze: bool,
    pub has_kecleon_shop: bool,
    pub has_monster_house: bool,
    pub attempts: u32,
    pub is_invalid: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub strategy: String,
    pub grid_width: i32,
    pub grid_height: i32,
    pub floor_size: FloorSize,
    pub room_count: usize,
    pub has_maze: bool,
    pub has_kecleon_shop: bool,
    pub has_monster_house: bool,
    pub attempts: u32,
    pub used_fallback: bool,
    pub stairs: Option<Pos>,
    pub player_spawn: Option<Pos>,
    pub rng_state: RngState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFloor {
    pub tiles: TileGrid,
    pub summary: FloorSummary,
}

fn push_pos(bytes: &mut Vec<u8>, pos: Option<Pos>) {
    match pos {
        Some(pos) => {
            bytes.push(1);
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }
        None => bytes.push(0),
    }
}

impl GeneratedFloor {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (_, tile) in self.tiles.iter() {
            bytes.push(match tile.terrain {
                Terrain::Wall => 0,
                Terrain::Open => 1,
                Terrain::Secondary => 2,
                Terrain::Chasm => 3,
            });
            bytes.push(tile.room);
            let flags = [
                tile.is_junction,
                tile.is_monster_house,
                tile.is_kecleon_shop,
                tile.is_key_door,
                tile.is_unreachable_from_stairs,
                tile.has_item,
                tile.has_stairs,
                tile.has_trap,
            ];
            bytes.push(flags.iter().enumerate().fold(0_u8, |acc, (bit, &set)| acc | (u8::from(set) << bit)));
            bytes.push(match tile.occupant {
                Occupant::None => 0,
                Occupant::Player => 1,
                Occupant::Partner => 2,
                Occupant::Enemy => 3,
            });
        }

        let summary = &self.summary;
        bytes.extend(summary.grid_width.to_le_bytes());
        bytes.extend(summary.grid_height.to_le_bytes());
        bytes.push(match summary.floor_size {
            FloorSize::Large => 0,
            FloorSize::Small => 1,
            FloorSize::Medium => 2,
        });
        bytes.extend((summary.room_count as u32).to_le_bytes());
        bytes.push(u8::from(summary.has_maze));
        bytes.push(u8::from(summary.has_kecleon_shop));
        bytes.push(u8::from(summary.has_monster_house));
        bytes.extend(summary.attempts.to_le_bytes());
        bytes.push(u8::from(summary.used_fallback));
        push_pos(&mut bytes, summary.stairs);
        push_pos(&mut bytes, summary.player_spawn);
        bytes.extend(summary.rng_state.hi.to_le_bytes());
        bytes.extend(summary.rng_state.lo.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn render_ascii(&self) -> String {
        self.tiles.render_ascii()
    }
}
