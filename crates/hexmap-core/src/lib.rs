//! Hexmap - a hex tile placement engine
//!
//! This crate provides the core logic for building a map out of hexagonal
//! tiles, including:
//! - Offset hex coordinates and their mapping to continuous 2D space
//! - Six-sided tiles and the rules deciding which sides match
//! - A candidate tile built side by side with step-by-step undo
//! - Placement scoring over the frontier, placement undo and marks
//! - A strict JSON save format
//!
//! # Architecture
//!
//! The engine is platform-agnostic and free of I/O: persistence goes through
//! the [`Storage`] trait and changes are announced to subscribers. It can be
//! compiled to:
//! - Native Rust, driven by the `hexmap` command line front end
//! - WebAssembly (`wasm` feature) for browser front ends
//!
//! # Modules
//!
//! - [`hex`]: Coordinate system and hit-testing
//! - [`tile`]: Tile types, tiles and edge quality
//! - [`rules`]: Side matching rules
//! - [`board`]: Placed tiles and frontier scoring
//! - [`candidate`]: The tile under construction
//! - [`engine`]: The placement engine
//! - [`codec`]: Saved game format

pub mod actions;
pub mod board;
pub mod candidate;
pub mod codec;
pub mod engine;
pub mod hex;
pub mod rules;
pub mod storage;
pub mod tile;
pub mod view;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{MapAction, MapEvent};
pub use board::{Board, Item};
pub use candidate::{CandidateBuilder, CandidateState};
pub use codec::{CodecError, SavedGame};
pub use engine::{EngineConfig, ListenerId, MapEngine, MapError};
pub use hex::{
    hexagon_vertices, is_visible, logical_to_screen, opposite_direction, screen_to_logical,
    Direction, LogicalCoordinate, PhysicalCoordinate, COORDINATE_LIMIT,
};
pub use rules::{Contact, MatchRules};
pub use storage::{MemoryStorage, NullStorage, Storage};
pub use tile::{Edge, Tile, TileType, EDGE_COUNT};
pub use view::ViewTransform;
