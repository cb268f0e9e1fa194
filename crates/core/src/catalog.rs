//! Dungeon data tables: resolves a dungeon name and floor number into
//! [`FloorProperties`].
//!
//! The catalog file is a JSON array of dungeons:
//!
//! ```json
//! [{ "name": { "en": "Beach Cave" }, "floors": { "1": { "layout": 0, "room_density": 6 } } }]
//! ```
//!
//! Fields the generator does not use (tilesets, music, weather) are ignored.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::props::FloorProperties;

#[derive(Clone, Debug, Deserialize)]
struct DungeonName {
    en: String,
}

#[derive(Clone, Debug, Deserialize)]
struct FloorRecord {
    #[serde(flatten)]
    props: FloorProperties,
    #[serde(default)]
    fixed_room_id: u8,
}

#[derive(Clone, Debug, Deserialize)]
struct DungeonRecord {
    name: DungeonName,
    #[serde(default)]
    floors: BTreeMap<u32, FloorRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct DungeonCatalog {
    dungeons: Vec<DungeonRecord>,
}

/// Describes why a floor configuration could not be resolved.
#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Parse(serde_json::Error),
    DungeonNotFound(String),
    FloorNotFound { dungeon: String, floor: u32 },
    /// Hand-authored floors are not generated procedurally.
    FixedFloor { dungeon: String, floor: u32, fixed_room_id: u8 },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "catalog I/O error: {e}"),
            Self::Parse(e) => write!(f, "catalog is not valid dungeon JSON: {e}"),
            Self::DungeonNotFound(name) => write!(
                f,
                "dungeon \"{name}\" not found; check the spelling and quote multi-word names"
            ),
            Self::FloorNotFound { dungeon, floor } => {
                write!(f, "{dungeon} has no floor entry {floor}")
            }
            Self::FixedFloor { dungeon, floor, fixed_room_id } => {
                write!(f, "{dungeon} floor {floor} uses fixed room {fixed_room_id} and has no procedural layout")
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl DungeonCatalog {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let dungeons = serde_json::from_str(text).map_err(CatalogError::Parse)?;
        Ok(Self { dungeons })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&text)
    }

    pub fn dungeon_names(&self) -> impl Iterator<Item = &str> {
        self.dungeons.iter().map(|dungeon| dungeon.name.en.as_str())
    }

    pub fn lookup(&self, dungeon: &str, floor: u32) -> Result<FloorProperties, CatalogError> {
        let record = self
            .dungeons
            .iter()
            .find(|record| record.name.en == dungeon)
            .ok_or_else(|| CatalogError::DungeonNotFound(dungeon.to_string()))?;
        let entry = record
            .floors
            .get(&floor)
            .ok_or_else(|| CatalogError::FloorNotFound { dungeon: dungeon.to_string(), floor })?;
        if entry.fixed_room_id != 0 {
            return Err(CatalogError::FixedFloor {
                dungeon: dungeon.to_string(),
                floor,
                fixed_room_id: entry.fixed_room_id,
            });
        }
        Ok(entry.props.clone())
    }
}
