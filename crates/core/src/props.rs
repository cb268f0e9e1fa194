//! Per-floor generation knobs as stored in the dungeon data tables.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "LayoutRepr")]
pub enum FloorLayout {
    #[default]
    Large,
    Small,
    OneRoomMonsterHouse,
    OuterRing,
    Crossroads,
    TwoRoomsWithMonsterHouse,
    Line,
    Cross,
    #[serde(rename = "large_0x8")]
    Large0x8,
    Beetle,
    OuterRooms,
    Medium,
}

impl FloorLayout {
    pub const ALL: [Self; 12] = [
        Self::Large,
        Self::Small,
        Self::OneRoomMonsterHouse,
        Self::OuterRing,
        Self::Crossroads,
        Self::TwoRoomsWithMonsterHouse,
        Self::Line,
        Self::Cross,
        Self::Large0x8,
        Self::Beetle,
        Self::OuterRooms,
        Self::Medium,
    ];

    /// Numeric id used by the game's floor tables.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Small => "small",
            Self::OneRoomMonsterHouse => "one_room_monster_house",
            Self::OuterRing => "outer_ring",
            Self::Crossroads => "crossroads",
            Self::TwoRoomsWithMonsterHouse => "two_rooms_with_monster_house",
            Self::Line => "line",
            Self::Cross => "cross",
            Self::Large0x8 => "large_0x8",
            Self::Beetle => "beetle",
            Self::OuterRooms => "outer_rooms",
            Self::Medium => "medium",
        }
    }

    /// Accepts snake_case names, dashed names and numeric ids.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(id) = text.parse::<u8>() {
            return Self::from_id(id);
        }
        let normalized = text.to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|layout| layout.name() == normalized)
    }
}

impl fmt::Display for FloorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutRepr {
    Id(u8),
    Name(String),
}

impl TryFrom<LayoutRepr> for FloorLayout {
    type Error = String;

    fn try_from(repr: LayoutRepr) -> Result<Self, Self::Error> {
        match repr {
            LayoutRepr::Id(id) => {
                Self::from_id(id).ok_or_else(|| format!("unknown floor layout id {id}"))
            }
            LayoutRepr::Name(name) => {
                Self::parse(&name).ok_or_else(|| format!("unknown floor layout `{name}`"))
            }
        }
    }
}

/// Resolved configuration for one procedurally generated floor.
///
/// Missing fields take their defaults so hand-written records only need the
/// knobs they care about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorProperties {
    pub layout: FloorLayout,
    /// Positive values are a target with random variance; zero or negative
    /// values request an exact count.
    pub room_density: i32,
    pub floor_connectivity: i32,
    pub allow_dead_ends: bool,
    #[serde(alias = "f_secondary_structures")]
    pub secondary_structures: bool,
    pub max_secondary_structures: i32,
    #[serde(alias = "f_room_imperfections")]
    pub room_imperfections: bool,
    pub maze_room_chance: i32,
    pub item_density: i32,
    pub trap_density: i32,
    /// Not used by layout generation; carried for downstream population.
    pub enemy_density: i32,
    pub kecleon_shop_spawn_chance: i32,
    pub monster_house_spawn_chance: i32,
    pub extra_hallways: i32,
    pub secondary_terrain_density: i32,
}

impl Default for FloorProperties {
    fn default() -> Self {
        Self {
            layout: FloorLayout::Large,
            room_density: 6,
            floor_connectivity: 15,
            allow_dead_ends: false,
            secondary_structures: false,
            max_secondary_structures: 0,
            room_imperfections: false,
            maze_room_chance: 0,
            item_density: 0,
            trap_density: 0,
            enemy_density: 0,
            kecleon_shop_spawn_chance: 0,
            monster_house_spawn_chance: 0,
            extra_hallways: 0,
            secondary_terrain_density: 0,
        }
    }
}
