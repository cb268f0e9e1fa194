pub mod catalog;
pub mod mapgen;
pub mod props;
pub mod rng;
pub mod tiles;
pub mod types;

pub use catalog::{CatalogError, DungeonCatalog};
pub use mapgen::{FloorGenerator, FloorSummary, GeneratedFloor, generate_floor};
pub use props::{FloorLayout, FloorProperties};
pub use rng::{DungeonRng, RngState};
pub use tiles::{Tile, TileGrid};
pub use types::*;
