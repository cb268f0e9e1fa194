//! Shared state threaded through every stage of one generation attempt.

use std::collections::BTreeSet;

use crate::props::FloorProperties;
use crate::rng::DungeonRng;
use crate::tiles::TileGrid;
use crate::types::{FloorSize, GenerationOptions};

use super::grid::CoarseGrid;
use super::model::GenerationStatus;

/// Grid shape chosen by the dispatcher. It outlives single attempts: values a
/// strategy writes here are still in place when the next attempt starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub grid_x: i32,
    pub grid_y: i32,
    pub floor_size: FloorSize,
    pub generate_secondary_terrain: bool,
    pub attempts: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            grid_x: 2,
            grid_y: 2,
            floor_size: FloorSize::Large,
            generate_secondary_terrain: false,
            attempts: 0,
        }
    }
}

pub struct LayoutContext<'a> {
    pub rng: &'a mut DungeonRng,
    pub props: &'a FloorProperties,
    pub options: GenerationOptions,
    pub status: GenerationStatus,
    pub tiles: TileGrid,
    pub grid: CoarseGrid,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        rng: &'a mut DungeonRng,
        props: &'a FloorProperties,
        options: GenerationOptions,
        geometry: &GridGeometry,
    ) -> Self {
        let status = GenerationStatus {
            floor_type: options.floor_type,
            floor_size: geometry.floor_size,
            generate_secondary_terrain: geometry.generate_secondary_terrain,
            secondary_structures_budget: props.max_secondary_structures,
            attempts: geometry.attempts,
            ..GenerationStatus::default()
        };
        Self {
            rng,
            props,
            options,
            status,
            tiles: TileGrid::new(),
            grid: CoarseGrid::new(geometry.grid_x, geometry.grid_y),
        }
    }

    /// Number of distinct regular room ids present on the tile grid.
    pub fn painted_room_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|(_, tile)| tile.in_real_room())
            .map(|(_, tile)| tile.room)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
