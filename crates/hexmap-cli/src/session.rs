//! Runs shell commands against the engine and formats the replies.

use crate::commands::{Command, HELP};
use hexmap_core::{
    CandidateState, LogicalCoordinate, MapEngine, MapError, Tile, TileType, EDGE_COUNT,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Map(#[from] MapError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next command
    Reply(String),
    Quit,
}

/// A command session on one map
#[derive(Debug)]
pub struct Session {
    engine: MapEngine,
}

impl Session {
    pub fn new(engine: MapEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &MapEngine {
        &self.engine
    }

    /// Run one command. Errors leave the map unchanged.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let reply = match command {
            Command::Add(tile_type) => {
                self.engine.add_tile(tile_type)?;
                self.candidate_line()
            }
            Command::Set(index, tile_type) => {
                self.engine.set_tile_edge(index, tile_type)?;
                self.candidate_line()
            }
            Command::Fill(tile_type) => {
                self.engine.fill_tile(tile_type)?;
                self.candidate_line()
            }
            Command::Clear => {
                self.engine.clear_candidate();
                self.candidate_line()
            }
            Command::Rotate(delta) => {
                self.engine.rotate_candidate(delta);
                self.candidate_line()
            }
            Command::UndoTile => {
                self.engine.undo_tile();
                self.candidate_line()
            }
            Command::Place(coordinate) => {
                self.engine.add_candidate(coordinate)?;
                format!("Placed at {coordinate}\n{}", self.candidate_line())
            }
            Command::Remove(coordinate) => {
                if self.engine.get_tile(&coordinate).is_none() {
                    format!("No tile at {coordinate}")
                } else {
                    self.engine.remove_tile(&coordinate);
                    format!("Removed {coordinate}\n{}", self.candidate_line())
                }
            }
            Command::Undo => {
                if self.engine.can_undo_placement() {
                    self.engine.undo_placement();
                    format!("Undone\n{}", self.candidate_line())
                } else {
                    "Nothing to undo".to_string()
                }
            }
            Command::Mark(coordinate) => {
                self.engine.add_mark(coordinate);
                self.mark_line(&coordinate)
            }
            Command::Unmark(coordinate) => {
                self.engine.remove_mark(&coordinate);
                self.mark_line(&coordinate)
            }
            Command::Click(screen) => {
                let coordinate = self.engine.hit_test(screen);
                self.click(coordinate)?
            }
            Command::Edges => self.edges_text(),
            Command::Tiles => self.tiles_text(),
            Command::Show => self.summary(),
            Command::Types => types_text(),
            Command::Export(path) => {
                let data = self.engine.serialize()?;
                std::fs::write(&path, data).map_err(|source| SessionError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "exported map");
                format!("Exported to {}", path.display())
            }
            Command::Import(path) => {
                let data = std::fs::read_to_string(&path).map_err(|source| SessionError::Io {
                    path: path.clone(),
                    source,
                })?;
                self.engine.deserialize(&data)?;
                info!(path = %path.display(), "imported map");
                format!("Imported {} tiles", self.engine.tiles().len())
            }
            Command::Reset => {
                self.engine.reset()?;
                "Reset".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Reply(reply))
    }

    /// A complete candidate is placed on the cell; otherwise an empty cell's
    /// mark is toggled.
    fn click(&mut self, coordinate: LogicalCoordinate) -> Result<String, SessionError> {
        if let Some(tile) = self.engine.get_tile(&coordinate) {
            return Ok(format!("{coordinate}: {tile}"));
        }
        if self.engine.candidate().is_complete() {
            self.engine.add_candidate(coordinate)?;
            return Ok(format!("Placed at {coordinate}\n{}", self.candidate_line()));
        }
        if self.engine.has_mark(&coordinate) {
            self.engine.remove_mark(&coordinate);
        } else {
            self.engine.add_mark(coordinate);
        }
        Ok(self.mark_line(&coordinate))
    }

    fn candidate_line(&self) -> String {
        let candidate = self.engine.candidate();
        let state = match self.engine.candidate_state() {
            CandidateState::Empty => "empty".to_string(),
            CandidateState::Building(n) => format!("{n}/{EDGE_COUNT}"),
            CandidateState::Complete => "complete".to_string(),
        };
        format!("Candidate ({state}): {}", describe(&candidate))
    }

    fn mark_line(&self, coordinate: &LogicalCoordinate) -> String {
        if self.engine.has_mark(coordinate) {
            format!("Marked {coordinate}")
        } else {
            format!("{coordinate} not marked")
        }
    }

    fn edges_text(&self) -> String {
        let mut edges = self.engine.edges();
        if edges.is_empty() {
            return "No open cells for this candidate".to_string();
        }
        // Best matches first
        edges.sort_by(|a, b| {
            (b.item.is_good(), b.item.good)
                .cmp(&(a.item.is_good(), a.item.good))
                .then(a.coordinate.cmp(&b.coordinate))
        });
        let mut text = String::new();
        for edge in &edges {
            let rotation = self
                .engine
                .best_rotation(&edge.coordinate)
                .map_or(0, |(rotation, _)| rotation);
            let _ = writeln!(
                text,
                "{:>8}  {}/{}{}  rotate {}",
                edge.coordinate.to_string(),
                edge.item.good,
                edge.item.all,
                if edge.item.is_good() { " perfect" } else { "" },
                rotation
            );
        }
        text.trim_end().to_string()
    }

    fn tiles_text(&self) -> String {
        let mut text = String::new();
        for tile in self.engine.tiles() {
            let _ = writeln!(text, "{:>8}  {}", tile.coordinate.to_string(), tile.item);
        }
        text.trim_end().to_string()
    }

    fn summary(&self) -> String {
        let engine = &self.engine;
        let marks: Vec<String> = engine.marks().iter().map(|m| m.to_string()).collect();
        let perfect = engine.edges().iter().filter(|e| e.item.is_good()).count();
        let mut text = String::new();
        let _ = writeln!(text, "{}", self.candidate_line());
        let _ = writeln!(text, "Tiles: {}", engine.tiles().len());
        let _ = writeln!(
            text,
            "Open cells: {} ({perfect} perfect)",
            engine.edges().len()
        );
        let _ = writeln!(text, "Marks: {}", marks.join(" "));
        let _ = write!(
            text,
            "Undo: tile {}, placement {}",
            yes_no(engine.can_undo_tile()),
            yes_no(engine.can_undo_placement())
        );
        text
    }
}

fn types_text() -> String {
    format!(
        "Sides: {}\nFill: {}",
        display_names(TileType::normal_types()),
        display_names(TileType::fill_types())
    )
}

fn display_names(types: impl Iterator<Item = TileType>) -> String {
    types
        .map(|t| t.config().display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(tile: &Tile) -> String {
    if tile.is_empty() {
        "-".to_string()
    } else {
        tile.to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
