//! The candidate tile under construction and its build history.

use crate::engine::MapError;
use crate::tile::{Tile, TileType, EDGE_COUNT};
use serde::{Deserialize, Serialize};

/// Progress of the candidate tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateState {
    /// No side chosen
    Empty,
    /// Some sides chosen (count)
    Building(usize),
    /// All six sides chosen; the tile can be placed
    Complete,
}

impl CandidateState {
    pub fn of(tile: &Tile) -> Self {
        match tile.filled() {
            0 => CandidateState::Empty,
            EDGE_COUNT => CandidateState::Complete,
            n => CandidateState::Building(n),
        }
    }
}

/// Holds the current candidate together with every prior version of it.
///
/// Each successful mutation pushes the previous candidate so that
/// [`CandidateBuilder::undo`] can step back one edit at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBuilder {
    current: Tile,
    history: Vec<Tile>,
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Tile {
        &self.current
    }

    pub fn state(&self) -> CandidateState {
        CandidateState::of(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn commit(&mut self, next: Tile) {
        self.history.push(self.current);
        self.current = next;
    }

    /// Choose the next free side
    pub fn add(&mut self, tile_type: TileType) -> Result<(), MapError> {
        let next = self.current.add(tile_type)?;
        self.commit(next);
        Ok(())
    }

    /// Choose a specific side
    pub fn set(&mut self, index: usize, tile_type: TileType) -> Result<(), MapError> {
        let next = self.current.set(index, tile_type)?;
        self.commit(next);
        Ok(())
    }

    /// Complete the remaining sides with `tile_type`
    pub fn fill(&mut self, tile_type: TileType) -> Result<(), MapError> {
        if !tile_type.config().fill {
            return Err(MapError::InvalidType(tile_type));
        }
        if self.current.is_complete() {
            return Err(MapError::TileFull);
        }
        let next = self.current.fill(tile_type);
        self.commit(next);
        Ok(())
    }

    /// Reset to an empty candidate. The old candidate stays undoable.
    pub fn clear(&mut self) {
        self.commit(Tile::new());
    }

    /// Rotate one step against the sign of `delta`; zero is a no-op.
    ///
    /// Rotation is not a build step and is not recorded in the history.
    /// Returns whether the candidate changed.
    pub fn rotate(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }
        self.current = self.current.rotate(-delta.signum());
        true
    }

    /// Restore the candidate before the last edit
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Swap in a new candidate without recording history.
    ///
    /// Returns the previous candidate.
    pub fn replace(&mut self, tile: Tile) -> Tile {
        std::mem::replace(&mut self.current, tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_progression() {
        let mut builder = CandidateBuilder::new();
        assert_eq!(builder.state(), CandidateState::Empty);
        builder.add(TileType::Forest).unwrap();
        assert_eq!(builder.state(), CandidateState::Building(1));
        builder.fill(TileType::Grassland).unwrap();
        assert_eq!(builder.state(), CandidateState::Complete);
    }

    #[test]
    fn test_add_on_full_candidate() {
        let mut builder = CandidateBuilder::new();
        builder.fill(TileType::Town).unwrap();
        assert!(matches!(builder.add(TileType::Town), Err(MapError::TileFull)));
        assert!(matches!(builder.fill(TileType::Field), Err(MapError::TileFull)));
        // Failed edits record nothing
        assert_eq!(builder.history_len(), 1);
    }

    #[test]
    fn test_undo_walks_back_every_edit() {
        let mut builder = CandidateBuilder::new();
        builder.add(TileType::River).unwrap();
        builder.add(TileType::Lake).unwrap();
        builder.rotate(1);
        builder.clear();

        assert!(builder.current().is_empty());
        assert!(builder.undo());
        // The snapshot taken by clear carries the rotation
        assert_eq!(builder.current().get(5), TileType::River);
        assert_eq!(builder.current().get(0), TileType::Lake);
        assert!(builder.undo());
        assert_eq!(builder.current(), &Tile::from_items(&[TileType::River]));
        assert!(builder.undo());
        assert!(builder.current().is_empty());
        assert!(!builder.undo());
    }

    #[test]
    fn test_rotate_single_step() {
        let mut builder = CandidateBuilder::new();
        builder.add(TileType::Forest).unwrap();
        assert!(builder.rotate(4));
        // One step regardless of magnitude
        assert_eq!(builder.current().get(5), TileType::Forest);
        assert!(builder.rotate(-7));
        assert_eq!(builder.current().get(0), TileType::Forest);
        assert!(!builder.rotate(0));
        assert_eq!(builder.history_len(), 1);
    }

    #[test]
    fn test_fill_with_non_normal_type_covers_tile() {
        let mut builder = CandidateBuilder::new();
        builder.add(TileType::Forest).unwrap();
        builder.fill(TileType::WaterStation).unwrap();
        assert_eq!(builder.current(), &Tile::single_tile(TileType::WaterStation));
    }

    #[test]
    fn test_fill_rejects_unknown() {
        let mut builder = CandidateBuilder::new();
        assert!(matches!(
            builder.fill(TileType::Unknown),
            Err(MapError::InvalidType(TileType::Unknown))
        ));
    }

    #[test]
    fn test_replace_skips_history() {
        let mut builder = CandidateBuilder::new();
        let old = builder.replace(Tile::single_tile(TileType::Lake));
        assert!(old.is_empty());
        assert!(!builder.can_undo());
    }
}
