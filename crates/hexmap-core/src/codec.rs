//! Saved game format.
//!
//! ```json
//! {
//!   "offset": { "x": 400.0, "y": 300.0 },
//!   "zoomLevel": 0,
//!   "tiles": [{ "coordinate": { "x": 0, "y": 0 }, "item": ["Grassland", ...] }],
//!   "marks": [{ "x": 1, "y": 0 }]
//! }
//! ```
//!
//! Decoding is strict: anything that does not fit this shape is rejected as a
//! whole. Older saves with numeric tile types, a scalar `zoom` or no `marks`
//! are still accepted.

use crate::board::{Board, Item};
use crate::hex::{LogicalCoordinate, PhysicalCoordinate};
use crate::tile::{Tile, TileType, EDGE_COUNT};
use crate::view::ViewTransform;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a saved game could not be read
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected shape: {0}")]
    Shape(String),

    #[error("unknown tile type {0}")]
    UnknownTileType(String),

    #[error("tile at {0} has unfilled sides")]
    IncompleteTile(LogicalCoordinate),

    #[error("more than one tile at {0}")]
    DuplicateTile(LogicalCoordinate),

    #[error("cell {0} is out of bounds")]
    OutOfBounds(LogicalCoordinate),
}

/// Everything that is persisted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedGame {
    pub board: Board,
    pub marks: BTreeSet<LogicalCoordinate>,
    pub view: ViewTransform,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSave<'a> {
    offset: PhysicalCoordinate,
    zoom_level: i32,
    tiles: Vec<Item<Tile>>,
    marks: Vec<&'a LogicalCoordinate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSave {
    offset: PhysicalCoordinate,
    #[serde(default)]
    zoom_level: Option<i32>,
    #[serde(default)]
    zoom: Option<f64>,
    tiles: Vec<RawItem>,
    #[serde(default)]
    marks: Vec<LogicalCoordinate>,
}

#[derive(Deserialize)]
struct RawItem {
    coordinate: LogicalCoordinate,
    item: Vec<Value>,
}

/// Serialize the persisted parts of a map
pub fn encode(
    board: &Board,
    marks: &BTreeSet<LogicalCoordinate>,
    view: &ViewTransform,
) -> Result<String, CodecError> {
    let wire = WireSave {
        offset: view.offset,
        zoom_level: view.zoom_level,
        tiles: board.items(),
        marks: marks.iter().collect(),
    };
    Ok(serde_json::to_string(&wire)?)
}

impl SavedGame {
    pub fn encode(&self) -> Result<String, CodecError> {
        encode(&self.board, &self.marks, &self.view)
    }

    pub fn decode(data: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(data)?;
        let raw: RawSave =
            serde_json::from_value(value).map_err(|e| CodecError::Shape(e.to_string()))?;

        let view = match (raw.zoom_level, raw.zoom) {
            (Some(level), _) => ViewTransform::new(raw.offset, level),
            (None, Some(zoom)) => ViewTransform::from_legacy_zoom(raw.offset, zoom),
            (None, None) => ViewTransform::new(raw.offset, 0),
        };

        let mut board = Board::new();
        for RawItem { coordinate, item } in raw.tiles {
            if !coordinate.in_bounds() {
                return Err(CodecError::OutOfBounds(coordinate));
            }
            let tile = decode_tile(coordinate, &item)?;
            if board.insert(coordinate, tile).is_some() {
                return Err(CodecError::DuplicateTile(coordinate));
            }
        }

        if let Some(mark) = raw.marks.iter().find(|mark| !mark.in_bounds()) {
            return Err(CodecError::OutOfBounds(*mark));
        }

        // Marks only live on empty cells
        let marks = raw
            .marks
            .into_iter()
            .filter(|mark| !board.is_occupied(mark))
            .collect();

        Ok(Self { board, marks, view })
    }
}

fn decode_tile(coordinate: LogicalCoordinate, item: &[Value]) -> Result<Tile, CodecError> {
    if item.len() != EDGE_COUNT {
        return Err(CodecError::Shape(format!(
            "tile at {coordinate} has {} sides",
            item.len()
        )));
    }
    let mut sides = [TileType::Unknown; EDGE_COUNT];
    for (side, value) in sides.iter_mut().zip(item) {
        *side = decode_tile_type(value)?;
    }
    if sides.iter().any(|t| !t.placeable()) {
        return Err(CodecError::IncompleteTile(coordinate));
    }
    Ok(Tile::from_items(&sides))
}

/// A tile type by variant name or by legacy numeric code
fn decode_tile_type(value: &Value) -> Result<TileType, CodecError> {
    let unknown = || CodecError::UnknownTileType(value.to_string());
    match value {
        Value::String(_) => serde_json::from_value(value.clone()).map_err(|_| unknown()),
        Value::Number(n) => n
            .as_u64()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(|code| TileType::try_from(code).ok())
            .ok_or_else(unknown),
        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::COORDINATE_LIMIT;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample() -> SavedGame {
        let mut board = Board::starting(TileType::Grassland);
        board.insert(
            LogicalCoordinate::new(1, 0),
            Tile::from_items(&[
                TileType::River,
                TileType::Lake,
                TileType::Forest,
                TileType::Field,
                TileType::Town,
                TileType::Railway,
            ]),
        );
        SavedGame {
            board,
            marks: [LogicalCoordinate::new(-1, 1), LogicalCoordinate::new(0, -1)]
                .into_iter()
                .collect(),
            view: ViewTransform::new(PhysicalCoordinate::new(400.0, 300.0), 2),
        }
    }

    #[test]
    fn test_round_trip() {
        let game = sample();
        let decoded = SavedGame::decode(&game.encode().unwrap()).unwrap();
        assert_eq!(decoded, game);
    }

    #[test]
    fn test_encoded_shape() {
        let value: Value = serde_json::from_str(&sample().encode().unwrap()).unwrap();
        assert_eq!(value["zoomLevel"], 2);
        assert_eq!(value["offset"]["x"], 400.0);
        assert_eq!(value["tiles"][0]["coordinate"]["x"], 0);
        assert_eq!(value["tiles"][0]["item"][0], "Grassland");
        assert_eq!(value["tiles"][1]["item"][5], "Railway");
        assert_eq!(value["marks"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            SavedGame::decode("bad json"),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert!(matches!(SavedGame::decode("{}"), Err(CodecError::Shape(_))));
        assert!(matches!(
            SavedGame::decode(r#"{"offset":{"x":0,"y":0}}"#),
            Err(CodecError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_non_numeric_offset() {
        assert!(matches!(
            SavedGame::decode(r#"{"offset":"bad","tiles":[]}"#),
            Err(CodecError::Shape(_))
        ));
        assert!(matches!(
            SavedGame::decode(r#"{"offset":{"x":"1","y":0},"tiles":[]}"#),
            Err(CodecError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_bad_tiles() {
        let short = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":0,"y":0},"item":["Forest","Forest"]}]}"#;
        assert!(matches!(SavedGame::decode(short), Err(CodecError::Shape(_))));

        let unknown = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":0,"y":0},"item":["Forest","Forest","Forest","Forest","Forest","Volcano"]}]}"#;
        assert!(matches!(
            SavedGame::decode(unknown),
            Err(CodecError::UnknownTileType(_))
        ));

        let unfilled = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":0,"y":0},"item":["Forest","Forest","Forest","Forest","Forest","Unknown"]}]}"#;
        assert!(matches!(
            SavedGame::decode(unfilled),
            Err(CodecError::IncompleteTile(_))
        ));

        let bad_coordinate = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":0.5,"y":0},"item":[1,1,1,1,1,1]}]}"#;
        assert!(matches!(
            SavedGame::decode(bad_coordinate),
            Err(CodecError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_tiles() {
        let data = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":0,"y":0},"item":[1,1,1,1,1,1]},
            {"coordinate":{"x":0,"y":0},"item":[2,2,2,2,2,2]}]}"#;
        assert!(matches!(
            SavedGame::decode(data),
            Err(CodecError::DuplicateTile(_))
        ));
    }

    #[test]
    fn test_accepts_legacy_save() {
        let data = r#"{"offset":{"x":10,"y":20},"zoom":144,"tiles":[
            {"coordinate":{"x":0,"y":0},"item":[1,2,3,4,5,8]}]}"#;
        let game = SavedGame::decode(data).unwrap();
        assert_eq!(game.view.zoom_level, 2);
        assert_eq!(game.view.offset, PhysicalCoordinate::new(10.0, 20.0));
        assert!(game.marks.is_empty());
        assert_eq!(
            game.board.get_tile(&LogicalCoordinate::new(0, 0)),
            Some(&Tile::from_items(&[
                TileType::Grassland,
                TileType::Forest,
                TileType::Field,
                TileType::Town,
                TileType::River,
                TileType::WaterStation,
            ]))
        );
    }

    #[test]
    fn test_marks_on_tiles_are_dropped() {
        let data = r#"{"offset":{"x":0,"y":0},"zoomLevel":0,"tiles":[
            {"coordinate":{"x":0,"y":0},"item":[1,1,1,1,1,1]}],
            "marks":[{"x":0,"y":0},{"x":1,"y":0}]}"#;
        let game = SavedGame::decode(data).unwrap();
        assert_eq!(
            game.marks.into_iter().collect::<Vec<_>>(),
            vec![LogicalCoordinate::new(1, 0)]
        );
    }

    #[test]
    fn test_offset_survives_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5_000 {
            let offset = PhysicalCoordinate::new(
                rng.gen_range(-5_000.0..5_000.0),
                rng.gen_range(-5_000.0..5_000.0),
            );
            let game = SavedGame {
                view: ViewTransform::new(offset, rng.gen_range(-12..=12)),
                ..sample()
            };
            let decoded = SavedGame::decode(&game.encode().unwrap()).unwrap();
            assert_eq!(decoded.view.offset.x.to_bits(), offset.x.to_bits());
            assert_eq!(decoded.view.offset.y.to_bits(), offset.y.to_bits());
            assert_eq!(decoded.view, game.view);
        }
    }

    #[test]
    fn test_rejects_cells_out_of_bounds() {
        let tile = r#"{"offset":{"x":0,"y":0},"tiles":[
            {"coordinate":{"x":2147483647,"y":0},"item":[1,1,1,1,1,1]}]}"#;
        assert!(matches!(
            SavedGame::decode(tile),
            Err(CodecError::OutOfBounds(c)) if c == LogicalCoordinate::new(i32::MAX, 0)
        ));

        let mark = r#"{"offset":{"x":0,"y":0},"tiles":[],
            "marks":[{"x":0,"y":-2147483648}]}"#;
        assert!(matches!(
            SavedGame::decode(mark),
            Err(CodecError::OutOfBounds(_))
        ));

        let edge = format!(
            r#"{{"offset":{{"x":0,"y":0}},"tiles":[
            {{"coordinate":{{"x":{COORDINATE_LIMIT},"y":-{COORDINATE_LIMIT}}},"item":[1,1,1,1,1,1]}}]}}"#
        );
        let game = SavedGame::decode(&edge).unwrap();
        assert_eq!(game.board.len(), 1);
    }
}
