//! Map engine state and operations.
//!
//! `MapEngine` owns the board, the candidate tile and the three undo stacks:
//! - placement history: coordinates in the order tiles were placed
//! - build history: prior candidate snapshots (see [`CandidateBuilder`])
//! - pending candidates: in-progress candidates set aside when a placed tile
//!   is taken back into the candidate slot
//!
//! Every mutation goes through [`MapEngine::apply_action`] or one of the
//! named wrappers, and is all-or-nothing. After a mutation completes the
//! state is saved through the [`Storage`] port (when the persisted part
//! changed) and listeners are notified.

use crate::actions::{MapAction, MapEvent};
use crate::board::{Board, Item};
use crate::candidate::{CandidateBuilder, CandidateState};
use crate::codec::{self, CodecError, SavedGame};
use crate::hex::{
    hexagon_vertices, is_visible, screen_to_logical, LogicalCoordinate, PhysicalCoordinate,
};
use crate::rules::MatchRules;
use crate::storage::Storage;
use crate::tile::{Edge, Tile, TileType};
use crate::view::ViewTransform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MapError {
    #[error("Tile is full")]
    TileFull,

    #[error("Not ready")]
    NotReady,

    #[error("Cell {0} is occupied")]
    Occupied(LogicalCoordinate),

    #[error("Cell {0} is off the map")]
    OutOfBounds(LogicalCoordinate),

    #[error("Cannot place the candidate at {0}")]
    CannotPlace(LogicalCoordinate),

    #[error("Invalid slot {0}")]
    InvalidSlot(usize),

    #[error("{0:?} cannot be used here")]
    InvalidType(TileType),

    #[error("No window size")]
    NoWindowSize,

    #[error("Malformed saved map: {0}")]
    Malformed(String),
}

impl From<CodecError> for MapError {
    fn from(error: CodecError) -> Self {
        MapError::Malformed(error.to_string())
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which sides match
    pub rules: MatchRules,
    /// Reject placements whose current orientation conflicts with a neighbor
    pub check_validity: bool,
    /// Type of the tile at the origin after a reset
    pub start_type: TileType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: MatchRules::default(),
            check_validity: true,
            start_type: TileType::Grassland,
        }
    }
}

/// Handle returned by [`MapEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&MapEvent)>;

/// The tile placement engine
pub struct MapEngine {
    config: EngineConfig,
    board: Board,
    builder: CandidateBuilder,
    /// Placed coordinates, oldest first
    placements: Vec<LogicalCoordinate>,
    /// Candidates set aside by remove/undo, most recent last
    pending: Vec<Tile>,
    marks: BTreeSet<LogicalCoordinate>,
    view: ViewTransform,
    window_size: Option<PhysicalCoordinate>,
    storage: Box<dyn Storage>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl fmt::Debug for MapEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapEngine")
            .field("config", &self.config)
            .field("board", &self.board)
            .field("builder", &self.builder)
            .field("placements", &self.placements)
            .field("pending", &self.pending)
            .field("marks", &self.marks)
            .field("view", &self.view)
            .field("window_size", &self.window_size)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl MapEngine {
    /// Create an engine with the default configuration.
    ///
    /// The board starts with the starting tile; call [`MapEngine::init`] to
    /// pick up a saved map.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self::with_config(EngineConfig::default(), storage)
    }

    pub fn with_config(config: EngineConfig, storage: impl Storage + 'static) -> Self {
        Self {
            board: Board::starting(config.start_type),
            config,
            builder: CandidateBuilder::new(),
            placements: Vec::new(),
            pending: Vec::new(),
            marks: BTreeSet::new(),
            view: ViewTransform::default(),
            window_size: None,
            storage: Box::new(storage),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Lifecycle ====================

    /// Load the saved map, or start over when there is none or it is unreadable
    pub fn init(&mut self) -> Result<(), MapError> {
        match self.storage.load_string() {
            Some(data) => match self.deserialize(&data) {
                Ok(()) => return Ok(()),
                Err(error) => warn!(%error, "discarding saved map"),
            },
            None => debug!("no saved map"),
        }
        self.reset()
    }

    /// Start over: the starting tile alone, no history, no marks, centered view
    pub fn reset(&mut self) -> Result<(), MapError> {
        let events = self.do_reset()?;
        self.dispatch(&events);
        Ok(())
    }

    pub fn set_window_size(&mut self, size: PhysicalCoordinate) {
        self.window_size = Some(size);
    }

    pub fn window_size(&self) -> Option<PhysicalCoordinate> {
        self.window_size
    }

    // ==================== Candidate ====================

    pub fn add_tile(&mut self, tile_type: TileType) -> Result<(), MapError> {
        self.apply_action(MapAction::AddTile(tile_type)).map(drop)
    }

    pub fn set_tile_edge(&mut self, index: usize, tile_type: TileType) -> Result<(), MapError> {
        self.apply_action(MapAction::SetTileEdge { index, tile_type })
            .map(drop)
    }

    pub fn fill_tile(&mut self, tile_type: TileType) -> Result<(), MapError> {
        self.apply_action(MapAction::FillTile(tile_type)).map(drop)
    }

    pub fn clear_candidate(&mut self) {
        let events = self.do_clear_candidate();
        self.dispatch(&events);
    }

    pub fn rotate_candidate(&mut self, delta: i32) {
        let events = self.do_rotate_candidate(delta);
        self.dispatch(&events);
    }

    pub fn undo_tile(&mut self) {
        let events = self.do_undo_tile();
        self.dispatch(&events);
    }

    pub fn candidate(&self) -> Tile {
        *self.builder.current()
    }

    pub fn candidate_state(&self) -> CandidateState {
        self.builder.state()
    }

    pub fn can_undo_tile(&self) -> bool {
        self.builder.can_undo()
    }

    /// Number of candidates waiting behind the current one
    pub fn pending_candidates(&self) -> usize {
        self.pending.len()
    }

    // ==================== Board ====================

    /// Whether the candidate could go to `coordinate` in some rotation
    pub fn can_add_candidate(&self, coordinate: &LogicalCoordinate) -> bool {
        let candidate = self.builder.current();
        if !candidate.is_complete()
            || !coordinate.in_bounds()
            || self.board.is_occupied(coordinate)
        {
            return false;
        }
        !self.config.check_validity
            || self
                .board
                .best_edge(&self.config.rules, candidate, coordinate)
                .is_some()
    }

    /// Place the candidate, as currently oriented, at `coordinate`
    pub fn add_candidate(&mut self, coordinate: LogicalCoordinate) -> Result<(), MapError> {
        self.apply_action(MapAction::AddCandidate(coordinate))
            .map(drop)
    }

    /// Take the tile at `coordinate` back into the candidate slot
    pub fn remove_tile(&mut self, coordinate: &LogicalCoordinate) {
        let events = self.do_remove_tile(coordinate);
        self.dispatch(&events);
    }

    /// Take the most recently placed tile back into the candidate slot
    pub fn undo_placement(&mut self) {
        let events = self.do_undo_placement();
        self.dispatch(&events);
    }

    pub fn can_undo_placement(&self) -> bool {
        !self.placements.is_empty()
    }

    pub fn tiles(&self) -> Vec<Item<Tile>> {
        self.board.items()
    }

    pub fn get_tile(&self, coordinate: &LogicalCoordinate) -> Option<&Tile> {
        self.board.get_tile(coordinate)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Match quality of every frontier cell for the candidate
    pub fn edges(&self) -> Vec<Item<Edge>> {
        self.board
            .edges(&self.config.rules, self.builder.current())
    }

    /// Best rotation of the candidate at `coordinate`.
    ///
    /// The rotation counts [`MapEngine::rotate_candidate`] steps with a
    /// positive delta.
    pub fn best_rotation(&self, coordinate: &LogicalCoordinate) -> Option<(usize, Edge)> {
        let candidate = self.builder.current();
        if !candidate.is_complete()
            || !coordinate.in_bounds()
            || self.board.is_occupied(coordinate)
        {
            return None;
        }
        self.board
            .best_edge(&self.config.rules, candidate, coordinate)
    }

    // ==================== Marks ====================

    /// Mark an empty cell. Occupied and off-map cells are ignored.
    pub fn add_mark(&mut self, coordinate: LogicalCoordinate) {
        let events = self.do_add_mark(coordinate);
        self.dispatch(&events);
    }

    pub fn remove_mark(&mut self, coordinate: &LogicalCoordinate) {
        let events = self.do_remove_mark(coordinate);
        self.dispatch(&events);
    }

    pub fn has_mark(&self, coordinate: &LogicalCoordinate) -> bool {
        self.marks.contains(coordinate)
    }

    pub fn marks(&self) -> Vec<LogicalCoordinate> {
        self.marks.iter().copied().collect()
    }

    // ==================== View ====================

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        let events = self.do_set_view(view);
        self.dispatch(&events);
    }

    /// The cell under a screen position
    pub fn hit_test(&self, screen: PhysicalCoordinate) -> LogicalCoordinate {
        screen_to_logical(self.view.to_physical(screen))
    }

    /// Screen-space corners of the placed tiles that show in the window.
    /// Empty until a window size is known.
    pub fn tile_outlines(&self) -> Vec<Item<[PhysicalCoordinate; 6]>> {
        let Some(size) = self.window_size else {
            return Vec::new();
        };
        let radius = self.view.zoom();
        self.board
            .iter()
            .filter_map(|(coordinate, _)| {
                let center = self.view.to_screen(coordinate.to_physical());
                is_visible(size, center, radius)
                    .then(|| Item::new(*coordinate, hexagon_vertices(center, radius)))
            })
            .collect()
    }

    // ==================== Persistence ====================

    pub fn serialize(&self) -> Result<String, MapError> {
        Ok(codec::encode(&self.board, &self.marks, &self.view)?)
    }

    /// Replace the board, marks and view with a saved map.
    ///
    /// The candidate is kept; every history is dropped. On error nothing
    /// changes.
    pub fn deserialize(&mut self, data: &str) -> Result<(), MapError> {
        let saved = SavedGame::decode(data).map_err(|error| {
            warn!(%error, "rejecting saved map");
            MapError::from(error)
        })?;

        self.board = saved.board;
        self.marks = saved.marks;
        self.view = saved.view;
        self.placements.clear();
        self.pending.clear();
        self.builder.clear_history();
        debug!(
            tiles = self.board.len(),
            marks = self.marks.len(),
            "loaded saved map"
        );

        let events = vec![MapEvent::Loaded {
            tiles: self.board.len(),
            marks: self.marks.len(),
        }];
        self.dispatch(&events);
        Ok(())
    }

    // ==================== Listeners ====================

    /// Call `listener` with every event from now on
    pub fn subscribe(&mut self, listener: impl FnMut(&MapEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    // ==================== Actions ====================

    /// Apply an action to the map
    pub fn apply_action(&mut self, action: MapAction) -> Result<Vec<MapEvent>, MapError> {
        let events = match action {
            MapAction::AddTile(tile_type) => {
                self.builder.add(tile_type)?;
                vec![MapEvent::CandidateChanged]
            }
            MapAction::SetTileEdge { index, tile_type } => {
                self.builder.set(index, tile_type)?;
                vec![MapEvent::CandidateChanged]
            }
            MapAction::FillTile(tile_type) => {
                self.builder.fill(tile_type)?;
                vec![MapEvent::CandidateChanged]
            }
            MapAction::ClearCandidate => self.do_clear_candidate(),
            MapAction::RotateCandidate(delta) => self.do_rotate_candidate(delta),
            MapAction::UndoTile => self.do_undo_tile(),
            MapAction::AddCandidate(coordinate) => self.do_add_candidate(coordinate)?,
            MapAction::RemoveTile(coordinate) => self.do_remove_tile(&coordinate),
            MapAction::UndoPlacement => self.do_undo_placement(),
            MapAction::AddMark(coordinate) => self.do_add_mark(coordinate),
            MapAction::RemoveMark(coordinate) => self.do_remove_mark(&coordinate),
            MapAction::SetWindowSize(size) => {
                self.set_window_size(size);
                Vec::new()
            }
            MapAction::SetView(view) => self.do_set_view(view),
            MapAction::Reset => self.do_reset()?,
        };
        self.dispatch(&events);
        Ok(events)
    }

    fn do_reset(&mut self) -> Result<Vec<MapEvent>, MapError> {
        let size = self.window_size.ok_or(MapError::NoWindowSize)?;
        self.board = Board::starting(self.config.start_type);
        self.builder = CandidateBuilder::new();
        self.placements.clear();
        self.pending.clear();
        self.marks.clear();
        self.view = ViewTransform::centered(size);
        debug!("map reset");
        Ok(vec![MapEvent::Reset])
    }

    fn do_clear_candidate(&mut self) -> Vec<MapEvent> {
        self.builder.clear();
        vec![MapEvent::CandidateChanged]
    }

    fn do_rotate_candidate(&mut self, delta: i32) -> Vec<MapEvent> {
        if self.builder.rotate(delta) {
            vec![MapEvent::CandidateChanged]
        } else {
            Vec::new()
        }
    }

    fn do_undo_tile(&mut self) -> Vec<MapEvent> {
        if self.builder.undo() {
            vec![MapEvent::CandidateChanged]
        } else {
            Vec::new()
        }
    }

    fn do_add_candidate(
        &mut self,
        coordinate: LogicalCoordinate,
    ) -> Result<Vec<MapEvent>, MapError> {
        let candidate = *self.builder.current();
        if !candidate.is_complete() {
            return Err(MapError::NotReady);
        }
        if !coordinate.in_bounds() {
            return Err(MapError::OutOfBounds(coordinate));
        }
        if self.board.is_occupied(&coordinate) {
            return Err(MapError::Occupied(coordinate));
        }
        if self.config.check_validity
            && self
                .board
                .get_edge(&self.config.rules, &candidate, &coordinate, 0)
                .is_none()
        {
            return Err(MapError::CannotPlace(coordinate));
        }

        self.board.insert(coordinate, candidate);
        self.placements.push(coordinate);
        let next = self.pending.pop().unwrap_or_default();
        self.builder.replace(next);
        self.builder.clear_history();
        debug!(%coordinate, tile = %candidate, "placed tile");

        let mut events = vec![MapEvent::TilesChanged, MapEvent::CandidateChanged];
        if self.marks.remove(&coordinate) {
            events.push(MapEvent::MarksChanged);
        }
        Ok(events)
    }

    fn do_remove_tile(&mut self, coordinate: &LogicalCoordinate) -> Vec<MapEvent> {
        let Some(tile) = self.board.remove(coordinate) else {
            return Vec::new();
        };
        self.placements.retain(|placed| placed != coordinate);
        self.take_back(tile);
        debug!(%coordinate, "removed tile");
        vec![MapEvent::TilesChanged, MapEvent::CandidateChanged]
    }

    fn do_undo_placement(&mut self) -> Vec<MapEvent> {
        let Some(coordinate) = self.placements.pop() else {
            return Vec::new();
        };
        let Some(tile) = self.board.remove(&coordinate) else {
            return Vec::new();
        };
        self.take_back(tile);
        debug!(%coordinate, "undid placement");
        vec![MapEvent::TilesChanged, MapEvent::CandidateChanged]
    }

    /// Make `tile` the candidate, setting aside whatever was being built
    fn take_back(&mut self, tile: Tile) {
        let previous = self.builder.replace(tile);
        if !previous.is_empty() {
            self.pending.push(previous);
        }
        self.builder.clear_history();
    }

    fn do_add_mark(&mut self, coordinate: LogicalCoordinate) -> Vec<MapEvent> {
        if !coordinate.in_bounds()
            || self.board.is_occupied(&coordinate)
            || !self.marks.insert(coordinate)
        {
            return Vec::new();
        }
        vec![MapEvent::MarksChanged]
    }

    fn do_remove_mark(&mut self, coordinate: &LogicalCoordinate) -> Vec<MapEvent> {
        if self.marks.remove(coordinate) {
            vec![MapEvent::MarksChanged]
        } else {
            Vec::new()
        }
    }

    fn do_set_view(&mut self, view: ViewTransform) -> Vec<MapEvent> {
        // Same zoom range the saved map is read back with
        let view = ViewTransform::new(view.offset, view.zoom_level);
        if self.view == view {
            return Vec::new();
        }
        self.view = view;
        vec![MapEvent::ViewChanged(view)]
    }

    /// Save if needed, then notify listeners
    fn dispatch(&mut self, events: &[MapEvent]) {
        if events.is_empty() {
            return;
        }
        if events.iter().any(MapEvent::is_persistent) {
            self.persist();
        }
        for (_, listener) in self.listeners.iter_mut() {
            for event in events {
                listener(event);
            }
        }
    }

    fn persist(&mut self) {
        match self.serialize() {
            Ok(data) => self.storage.save_string(&data),
            Err(error) => warn!(%error, "failed to serialize map"),
        }
    }
}
