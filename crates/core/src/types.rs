use serde::{Deserialize, Serialize};

/// Tile-space width of every generated floor.
pub const FLOOR_WIDTH: i32 = 56;
/// Tile-space height of every generated floor.
pub const FLOOR_HEIGHT: i32 = 32;

/// Room id carried by tiles that belong to no room (walls and hallways).
pub const NO_ROOM: u8 = 0xFF;
/// Room id carried by hallway anchor points until junctions are finalized.
pub const ANCHOR_ROOM: u8 = 0xFE;
/// Highest room id a regular room can receive.
pub const MAX_ROOM_ID: u8 = 31;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Wall,
    Open,
    /// Water or lava, depending on the dungeon.
    Secondary,
    Chasm,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    None,
    Player,
    Partner,
    Enemy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorSize {
    #[default]
    Large,
    Small,
    Medium,
}

/// Mission context of the floor being generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorType {
    #[default]
    Normal,
    Rescue,
}

/// Knobs that change how a floor is generated without being part of its data record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub floor_type: FloorType,
    /// Enables the maze-room and room-imperfection stages, which the shipped
    /// game never runs.
    pub experimental: bool,
}
