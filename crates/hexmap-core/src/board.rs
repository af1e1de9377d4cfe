//! Board representation and placement scoring.
//!
//! This module contains:
//! - `Board`: sparse map of placed tiles keyed by logical coordinate
//! - `Item`: a value attached to a board coordinate
//! - Frontier enumeration and per-cell edge quality for a candidate tile

use crate::hex::{opposite_direction, LogicalCoordinate};
use crate::rules::{Contact, MatchRules};
use crate::tile::{Edge, Tile, TileType, EDGE_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A value located at a board coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item<T> {
    pub coordinate: LogicalCoordinate,
    pub item: T,
}

impl<T> Item<T> {
    pub fn new(coordinate: LogicalCoordinate, item: T) -> Self {
        Self { coordinate, item }
    }
}

/// The placed tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// All tiles indexed by coordinate
    tiles: BTreeMap<LogicalCoordinate, Tile>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// A board holding a single uniform tile at the origin
    pub fn starting(tile_type: TileType) -> Self {
        let mut board = Self::new();
        board
            .tiles
            .insert(LogicalCoordinate::new(0, 0), Tile::single_tile(tile_type));
        board
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get a tile by coordinate
    pub fn get_tile(&self, coordinate: &LogicalCoordinate) -> Option<&Tile> {
        self.tiles.get(coordinate)
    }

    pub fn is_occupied(&self, coordinate: &LogicalCoordinate) -> bool {
        self.tiles.contains_key(coordinate)
    }

    /// Place a tile, returning whatever was there before
    pub fn insert(&mut self, coordinate: LogicalCoordinate, tile: Tile) -> Option<Tile> {
        self.tiles.insert(coordinate, tile)
    }

    pub fn remove(&mut self, coordinate: &LogicalCoordinate) -> Option<Tile> {
        self.tiles.remove(coordinate)
    }

    /// All placed tiles in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = (&LogicalCoordinate, &Tile)> {
        self.tiles.iter()
    }

    /// Snapshot of the placed tiles
    pub fn items(&self) -> Vec<Item<Tile>> {
        self.tiles
            .iter()
            .map(|(coordinate, tile)| Item::new(*coordinate, *tile))
            .collect()
    }

    /// Empty in-bounds cells adjacent to at least one placed tile
    pub fn frontier(&self) -> BTreeSet<LogicalCoordinate> {
        let mut open = BTreeSet::new();
        for coordinate in self.tiles.keys() {
            for neighbor in coordinate.neighbors() {
                if neighbor.in_bounds() && !self.tiles.contains_key(&neighbor) {
                    open.insert(neighbor);
                }
            }
        }
        open
    }

    /// Score `candidate` at `coordinate` with the given rotation offset.
    ///
    /// For neighbor direction `d` the candidate's side `(d + rotation) % 6`
    /// is laid against the neighbor's side facing back. Returns `None` when
    /// no neighbor is placed or when an exclusive side conflicts.
    pub fn get_edge(
        &self,
        rules: &MatchRules,
        candidate: &Tile,
        coordinate: &LogicalCoordinate,
        rotation: usize,
    ) -> Option<Edge> {
        let mut all = 0;
        let mut good = 0;
        for (direction, neighbor) in coordinate.neighbors().iter().enumerate() {
            let Some(tile) = self.tiles.get(neighbor) else {
                continue;
            };
            let ours = candidate.get((direction + rotation) % EDGE_COUNT);
            let theirs = tile.get(opposite_direction(direction));
            match rules.contact(ours, theirs) {
                Contact::Conflict => return None,
                Contact::Match => good += 1,
                Contact::Mismatch => {}
            }
            all += 1;
        }
        (all > 0).then(|| Edge::new(all, good))
    }

    /// Best rotation of `candidate` at `coordinate`: highest `good`, lowest rotation on ties
    pub fn best_edge(
        &self,
        rules: &MatchRules,
        candidate: &Tile,
        coordinate: &LogicalCoordinate,
    ) -> Option<(usize, Edge)> {
        let mut best: Option<(usize, Edge)> = None;
        for rotation in 0..EDGE_COUNT {
            let Some(edge) = self.get_edge(rules, candidate, coordinate, rotation) else {
                continue;
            };
            if best.map_or(true, |(_, current)| edge.good > current.good) {
                best = Some((rotation, edge));
            }
        }
        best
    }

    /// Best edge for every frontier cell that accepts `candidate` in some rotation
    pub fn edges(&self, rules: &MatchRules, candidate: &Tile) -> Vec<Item<Edge>> {
        if !candidate.is_complete() {
            return Vec::new();
        }
        self.frontier()
            .into_iter()
            .filter_map(|coordinate| {
                self.best_edge(rules, candidate, &coordinate)
                    .map(|(_, edge)| Item::new(coordinate, edge))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> LogicalCoordinate {
        LogicalCoordinate::new(x, y)
    }

    fn find(edges: &[Item<Edge>], x: i32, y: i32) -> Option<Edge> {
        edges.iter().find(|e| e.coordinate == at(x, y)).map(|e| e.item)
    }

    #[test]
    fn test_starting_board() {
        let board = Board::starting(TileType::Grassland);
        assert_eq!(board.len(), 1);
        assert_eq!(
            board.get_tile(&at(0, 0)),
            Some(&Tile::single_tile(TileType::Grassland))
        );
    }

    #[test]
    fn test_frontier_of_single_tile() {
        let board = Board::starting(TileType::Grassland);
        let frontier = board.frontier();
        assert_eq!(frontier.len(), 6);
        for neighbor in at(0, 0).neighbors() {
            assert!(frontier.contains(&neighbor));
        }
    }

    #[test]
    fn test_no_edge_without_neighbors() {
        let board = Board::starting(TileType::Grassland);
        let rules = MatchRules::default();
        let candidate = Tile::single_tile(TileType::Grassland);
        assert_eq!(board.get_edge(&rules, &candidate, &at(5, 5), 0), None);
    }

    #[test]
    fn test_edge_counts_touching_sides() {
        let mut board = Board::starting(TileType::Grassland);
        board.insert(at(1, 0), Tile::single_tile(TileType::Grassland));
        let rules = MatchRules::default();

        let edges = board.edges(&rules, &Tile::single_tile(TileType::Grassland));
        assert_eq!(find(&edges, 1, 1), Some(Edge::new(2, 2)));
        assert_eq!(find(&edges, 2, 0), Some(Edge::new(1, 1)));
    }

    #[test]
    fn test_edge_counts_mismatch() {
        let mut board = Board::starting(TileType::Forest);
        board.insert(at(1, 0), Tile::single_tile(TileType::Grassland));
        let rules = MatchRules::default();

        let edges = board.edges(&rules, &Tile::single_tile(TileType::Grassland));
        assert_eq!(find(&edges, 1, 1), Some(Edge::new(2, 1)));
    }

    #[test]
    fn test_rotation_uses_shifted_side() {
        // Only side 0 is Forest; the cell (1, 0) touches the origin through
        // its West side (direction 4), so rotation 2 brings side 0 into place.
        let board = Board::starting(TileType::Forest);
        let rules = MatchRules::default();
        let candidate = Tile::from_items(&[
            TileType::Forest,
            TileType::Grassland,
            TileType::Grassland,
            TileType::Grassland,
            TileType::Grassland,
            TileType::Grassland,
        ]);

        assert_eq!(board.get_edge(&rules, &candidate, &at(1, 0), 0), Some(Edge::new(1, 0)));
        assert_eq!(board.get_edge(&rules, &candidate, &at(1, 0), 2), Some(Edge::new(1, 1)));
        assert_eq!(board.best_edge(&rules, &candidate, &at(1, 0)), Some((2, Edge::new(1, 1))));
    }

    #[test]
    fn test_exclusive_conflict_blocks_rotation() {
        let board = Board::starting(TileType::River);
        let rules = MatchRules::default();

        assert_eq!(
            board.get_edge(&rules, &Tile::single_tile(TileType::Forest), &at(1, 0), 0),
            None
        );
        assert!(board
            .edges(&rules, &Tile::single_tile(TileType::Forest))
            .is_empty());
        assert_eq!(
            board.get_edge(&rules, &Tile::single_tile(TileType::Lake), &at(1, 0), 0),
            Some(Edge::new(1, 1))
        );
    }

    #[test]
    fn test_best_edge_prefers_lowest_rotation_on_ties() {
        let board = Board::starting(TileType::Grassland);
        let rules = MatchRules::default();
        let candidate = Tile::single_tile(TileType::Grassland);
        assert_eq!(
            board.best_edge(&rules, &candidate, &at(1, 0)),
            Some((0, Edge::new(1, 1)))
        );
    }

    #[test]
    fn test_edges_require_complete_candidate() {
        let board = Board::starting(TileType::Grassland);
        let rules = MatchRules::default();
        let partial = Tile::from_items(&[TileType::Grassland]);
        assert!(board.edges(&rules, &partial).is_empty());
    }
}
