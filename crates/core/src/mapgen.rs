//! Floor layout generation split into coherent submodules: the coarse grid,
//! the shared toolbox stages, per-shape strategies, finishing passes, and
//! the attempt loop that ties them together.

pub mod context;
pub mod grid;
pub mod model;
pub mod strategy;

mod connections;
mod finishing;
mod generator;
mod hallways;
mod rooms;
mod spawns;
mod special;
mod structures;

pub use context::{GridGeometry, LayoutContext};
pub use finishing::{fix_junctions, grow_secondary_terrain, reset_border};
pub use generator::FloorGenerator;
pub use grid::{CoarseGrid, Direction, GridCell, GridCoords, MAX_GRID_DIM};
pub use model::{FloorSummary, GeneratedFloor, GenerationStatus};
pub use strategy::{LayoutStrategy, strategy_for};

use crate::props::FloorProperties;
use crate::types::GenerationOptions;

pub fn generate_floor(props: &FloorProperties, seed: u32, options: GenerationOptions) -> GeneratedFloor {
    FloorGenerator::new(props, options).generate(seed)
}
