//! Tile types, tiles and edge match quality.
//!
//! This module contains:
//! - `TileType`: the terrain carried by one side of a tile
//! - `Tile`: six sides, indexed clockwise in [`Direction`](crate::hex::Direction) order
//! - `Edge`: how well a candidate fits a frontier cell

use crate::engine::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of sides of a tile
pub const EDGE_COUNT: usize = 6;

/// Terrain of one tile side
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum TileType {
    /// Unfilled slot; never part of a placed tile
    #[default]
    Unknown,
    Grassland,
    Forest,
    Field,
    Town,
    River,
    Lake,
    Railway,
    WaterStation,
}

/// Static properties of a tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    /// Human readable name
    pub display_name: &'static str,
    /// Takes part in ordinary per-side construction
    pub normal: bool,
    /// May be used to fill the remaining sides of a candidate
    pub fill: bool,
    /// Display color (CSS hex)
    pub color: &'static str,
}

impl TileType {
    /// All tile types, in code order
    pub const ALL: [TileType; 9] = [
        TileType::Unknown,
        TileType::Grassland,
        TileType::Forest,
        TileType::Field,
        TileType::Town,
        TileType::River,
        TileType::Lake,
        TileType::Railway,
        TileType::WaterStation,
    ];

    /// Static properties of this type
    pub const fn config(self) -> TileConfig {
        match self {
            TileType::Unknown => TileConfig {
                display_name: "Unknown",
                normal: false,
                fill: false,
                color: "#aaa",
            },
            TileType::Grassland => TileConfig {
                display_name: "Grassland",
                normal: true,
                fill: true,
                color: "#91d63e",
            },
            TileType::Forest => TileConfig {
                display_name: "Forest",
                normal: true,
                fill: true,
                color: "#1f771a",
            },
            TileType::Field => TileConfig {
                display_name: "Field",
                normal: true,
                fill: true,
                color: "#d8d515",
            },
            TileType::Town => TileConfig {
                display_name: "Town",
                normal: true,
                fill: true,
                color: "#ce5c73",
            },
            TileType::River => TileConfig {
                display_name: "River",
                normal: true,
                fill: true,
                color: "#0d99c4",
            },
            TileType::Lake => TileConfig {
                display_name: "Lake",
                normal: true,
                fill: true,
                color: "#64c3e0",
            },
            TileType::Railway => TileConfig {
                display_name: "Railway",
                normal: true,
                fill: true,
                color: "#91632b",
            },
            TileType::WaterStation => TileConfig {
                display_name: "Water Station",
                normal: false,
                fill: true,
                color: "#14e8b6",
            },
        }
    }

    /// Numeric code used by older save files
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this type can appear on a placed tile
    pub fn placeable(self) -> bool {
        self != TileType::Unknown
    }

    /// Types offered for side-by-side construction
    pub fn normal_types() -> impl Iterator<Item = TileType> {
        Self::ALL.into_iter().filter(|t| t.config().normal)
    }

    /// Types offered for filling the remaining sides
    pub fn fill_types() -> impl Iterator<Item = TileType> {
        Self::ALL.into_iter().filter(|t| t.config().fill)
    }
}

impl TryFrom<u8> for TileType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, u8> {
        Self::ALL.get(usize::from(code)).copied().ok_or(code)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().display_name)
    }
}

/// Error returned when a tile type name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tile type '{0}'")]
pub struct ParseTileTypeError(pub String);

impl FromStr for TileType {
    type Err = ParseTileTypeError;

    /// Accepts variant names and display names, ignoring case, spaces,
    /// dashes and underscores (`"water-station"`, `"Water Station"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| format!("{t:?}").to_ascii_lowercase() == wanted)
            .ok_or_else(|| ParseTileTypeError(s.to_string()))
    }
}

/// A hex tile: six sides in clockwise order.
///
/// Sides that have not been chosen yet read as [`TileType::Unknown`].
/// Tiles are values; every transformation returns a new tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile {
    items: [TileType; EDGE_COUNT],
}

impl Tile {
    /// An empty tile
    pub const fn new() -> Self {
        Self {
            items: [TileType::Unknown; EDGE_COUNT],
        }
    }

    /// Build a tile from its sides; anything past the sixth is dropped
    pub fn from_items(items: &[TileType]) -> Self {
        let mut tile = Self::new();
        for (slot, item) in tile.items.iter_mut().zip(items) {
            *slot = *item;
        }
        tile
    }

    /// A tile with the same type on every side
    pub const fn single_tile(tile_type: TileType) -> Self {
        Self {
            items: [tile_type; EDGE_COUNT],
        }
    }

    /// Side at `index`, `Unknown` past the last side
    pub fn get(&self, index: usize) -> TileType {
        self.items.get(index).copied().unwrap_or_default()
    }

    /// All six sides
    pub fn items(&self) -> [TileType; EDGE_COUNT] {
        self.items
    }

    /// Number of chosen sides
    pub fn filled(&self) -> usize {
        self.items.iter().filter(|t| t.placeable()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == EDGE_COUNT
    }

    /// Put `tile_type` on the first unchosen side
    pub fn add(&self, tile_type: TileType) -> Result<Tile, MapError> {
        if !tile_type.placeable() {
            return Err(MapError::InvalidType(tile_type));
        }
        let slot = self
            .items
            .iter()
            .position(|t| !t.placeable())
            .ok_or(MapError::TileFull)?;
        let mut items = self.items;
        items[slot] = tile_type;
        Ok(Self { items })
    }

    /// Put `tile_type` on a specific side, replacing whatever was there
    pub fn set(&self, index: usize, tile_type: TileType) -> Result<Tile, MapError> {
        if index >= EDGE_COUNT {
            return Err(MapError::InvalidSlot(index));
        }
        if !tile_type.placeable() {
            return Err(MapError::InvalidType(tile_type));
        }
        if self.is_complete() {
            return Err(MapError::TileFull);
        }
        let mut items = self.items;
        items[index] = tile_type;
        Ok(Self { items })
    }

    /// Fill every unchosen side with `tile_type`.
    ///
    /// Types without per-side semantics (`normal == false`) always cover the
    /// whole tile.
    pub fn fill(&self, tile_type: TileType) -> Tile {
        if !tile_type.config().normal {
            return Self::single_tile(tile_type);
        }
        let items = self
            .items
            .map(|t| if t.placeable() { t } else { tile_type });
        Self { items }
    }

    /// Cyclic shift of the sides: side `i` of the result is side `i - amount` of `self`
    pub fn rotate(&self, amount: i32) -> Tile {
        let items = std::array::from_fn(|i| {
            let from = (i as i32 - amount).rem_euclid(EDGE_COUNT as i32) as usize;
            self.items[from]
        });
        Self { items }
    }

    /// The six rotations, index 0 unrotated
    pub fn all_rotations(&self) -> [Tile; EDGE_COUNT] {
        std::array::from_fn(|i| self.rotate(i as i32))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if item.placeable() {
                write!(f, "{item}")?;
            } else {
                f.write_str("?")?;
            }
        }
        Ok(())
    }
}

/// Match quality of a frontier cell for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Placed sides touching the cell
    pub all: u8,
    /// Touching sides that match the candidate
    pub good: u8,
}

impl Edge {
    pub const fn new(all: u8, good: u8) -> Self {
        Self { all, good }
    }

    /// Every touching side matches
    pub fn is_good(&self) -> bool {
        self.good == self.all
    }
}
