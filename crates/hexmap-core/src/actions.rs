//! Map actions and the events they produce.
//!
//! Front ends that drive the engine from scripts or foreign bindings send
//! [`MapAction`]s through [`MapEngine::apply_action`](crate::engine::MapEngine::apply_action)
//! and listeners receive [`MapEvent`]s after each mutation.

use crate::hex::{LogicalCoordinate, PhysicalCoordinate};
use crate::tile::TileType;
use crate::view::ViewTransform;
use serde::{Deserialize, Serialize};

/// All mutating operations of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapAction {
    // ==================== Candidate ====================
    /// Choose the next free side of the candidate
    AddTile(TileType),
    /// Choose a specific side of the candidate
    SetTileEdge { index: usize, tile_type: TileType },
    /// Complete the remaining sides
    FillTile(TileType),
    /// Empty the candidate
    ClearCandidate,
    /// Rotate the candidate one step in the direction of the sign
    RotateCandidate(i32),
    /// Step back one candidate edit
    UndoTile,

    // ==================== Board ====================
    /// Place the candidate
    AddCandidate(LogicalCoordinate),
    /// Take a placed tile back into the candidate
    RemoveTile(LogicalCoordinate),
    /// Take the last placed tile back into the candidate
    UndoPlacement,

    // ==================== Marks ====================
    AddMark(LogicalCoordinate),
    RemoveMark(LogicalCoordinate),

    // ==================== View ====================
    /// Set the viewport size in screen pixels
    SetWindowSize(PhysicalCoordinate),
    SetView(ViewTransform),
    /// Start over with the starting tile
    Reset,
}

/// Notifications sent after a mutation completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// The placed tiles changed
    TilesChanged,
    /// The candidate or its history changed
    CandidateChanged,
    /// The set of marks changed
    MarksChanged,
    /// The view transform changed
    ViewChanged(ViewTransform),
    /// The map was reset to the starting tile
    Reset,
    /// A saved game replaced the map
    Loaded { tiles: usize, marks: usize },
}

impl MapEvent {
    /// Whether the persisted state is affected
    pub fn is_persistent(&self) -> bool {
        !matches!(self, MapEvent::CandidateChanged)
    }
}
