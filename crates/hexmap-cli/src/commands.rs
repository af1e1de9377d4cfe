//! Shell command syntax.

use hexmap_core::{LogicalCoordinate, PhysicalCoordinate, TileType};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    TileType(#[from] hexmap_core::tile::ParseTileTypeError),

    #[error("Not a number: '{0}'")]
    Number(String),
}

/// One line of shell input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ==================== Candidate ====================
    Add(TileType),
    Set(usize, TileType),
    Fill(TileType),
    Clear,
    Rotate(i32),
    UndoTile,

    // ==================== Board ====================
    Place(LogicalCoordinate),
    Remove(LogicalCoordinate),
    Undo,
    Mark(LogicalCoordinate),
    Unmark(LogicalCoordinate),
    /// Act on the cell under a screen position
    Click(PhysicalCoordinate),

    // ==================== Views ====================
    Edges,
    Tiles,
    Show,
    Types,

    // ==================== Files ====================
    Export(PathBuf),
    Import(PathBuf),
    Reset,

    Help,
    Quit,
}

pub const HELP: &str = "\
Candidate:
  add <type>          choose the next free side
  set <side> <type>   choose side 0-5 (NE, E, SE, SW, W, NW)
  fill <type>         complete the remaining sides
  clear               empty the candidate
  rotate <n>          rotate one step (sign of n gives the direction)
  undo-tile           step back one candidate edit
Board:
  place <x> <y>       place the candidate as it is oriented
  remove <x> <y>      take a tile back into the candidate
  undo                take the last placed tile back
  mark <x> <y>        mark an empty cell
  unmark <x> <y>      remove a mark
  click <sx> <sy>     place or toggle a mark at a screen position
Views:
  edges               frontier cells for the candidate
  tiles               placed tiles
  show                candidate and map summary
  types               tile types for add/set and for fill
Files:
  export <file>       write the map as JSON
  import <file>       replace the map with a JSON file
  reset               start over
  help | quit

Types: grassland, forest, field, town, river, lake, railway, water-station";

fn number<T: FromStr>(word: Option<&str>, usage: &'static str) -> Result<T, CommandError> {
    let word = word.ok_or(CommandError::Usage(usage))?;
    word.parse()
        .map_err(|_| CommandError::Number(word.to_string()))
}

fn tile_type(word: Option<&str>, usage: &'static str) -> Result<TileType, CommandError> {
    Ok(word.ok_or(CommandError::Usage(usage))?.parse()?)
}

fn coordinate<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    usage: &'static str,
) -> Result<LogicalCoordinate, CommandError> {
    let x = number(words.next(), usage)?;
    let y = number(words.next(), usage)?;
    Ok(LogicalCoordinate::new(x, y))
}

fn path(word: Option<&str>, usage: &'static str) -> Result<PathBuf, CommandError> {
    word.map(PathBuf::from).ok_or(CommandError::Usage(usage))
}

/// Parse a line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let command = match name.to_ascii_lowercase().as_str() {
        "add" => Command::Add(tile_type(words.next(), "add <type>")?),
        "set" => {
            let usage = "set <side> <type>";
            let index = number(words.next(), usage)?;
            Command::Set(index, tile_type(words.next(), usage)?)
        }
        "fill" => Command::Fill(tile_type(words.next(), "fill <type>")?),
        "clear" => Command::Clear,
        "rotate" => match words.next() {
            Some(word) => Command::Rotate(number(Some(word), "rotate <n>")?),
            None => Command::Rotate(1),
        },
        "undo-tile" => Command::UndoTile,
        "place" => Command::Place(coordinate(&mut words, "place <x> <y>")?),
        "remove" => Command::Remove(coordinate(&mut words, "remove <x> <y>")?),
        "undo" => Command::Undo,
        "mark" => Command::Mark(coordinate(&mut words, "mark <x> <y>")?),
        "unmark" => Command::Unmark(coordinate(&mut words, "unmark <x> <y>")?),
        "click" => {
            let usage = "click <sx> <sy>";
            let x = number(words.next(), usage)?;
            let y = number(words.next(), usage)?;
            Command::Click(PhysicalCoordinate::new(x, y))
        }
        "edges" => Command::Edges,
        "tiles" => Command::Tiles,
        "show" => Command::Show,
        "types" => Command::Types,
        "export" => Command::Export(path(words.next(), "export <file>")?),
        "import" => Command::Import(path(words.next(), "import <file>")?),
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
