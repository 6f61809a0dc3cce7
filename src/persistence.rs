//! File I/O for puzzle definitions and solution reports.
//!
//! Puzzle files are TOML with one table per position. Every key is optional;
//! a missing key leaves that position unselected.
//!
//! ```toml
//! [left]
//! outside = "sphere"
//! inside = "circle"
//!
//! [middle]
//! outside = "pyramid"
//! inside = "square"
//!
//! [right]
//! outside = "cube"
//! inside = "triangle"
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DissectionError;
use crate::shapes::{Composite, Primitive};
use crate::solver::{Puzzle, Solution};

/// Errors reading a puzzle file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Shape(#[from] DissectionError),
}

/// On-disk form of a puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleFile {
    #[serde(default)]
    pub left: PositionEntry,
    #[serde(default)]
    pub middle: PositionEntry,
    #[serde(default)]
    pub right: PositionEntry,
}

/// Starting composite and selected primitive for one position, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PositionEntry {
    /// Starting composite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside: Option<String>,
    /// Selected primitive, which decides the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside: Option<String>,
}

impl PuzzleFile {
    /// Resolves every name against the shape catalog.
    pub fn to_puzzle(&self) -> Result<Puzzle, ConfigError> {
        let mut puzzle = Puzzle {
            starting: [None; 3],
            selections: [None; 3],
        };
        for (index, entry) in [&self.left, &self.middle, &self.right].into_iter().enumerate() {
            puzzle.starting[index] = entry.outside.as_deref().map(str::parse::<Composite>).transpose()?;
            puzzle.selections[index] = entry.inside.as_deref().map(str::parse::<Primitive>).transpose()?;
        }
        Ok(puzzle)
    }

    /// Builds the on-disk form of a puzzle.
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        let entry = |index: usize| PositionEntry {
            outside: puzzle.starting[index].map(|shape| shape.name().to_lowercase()),
            inside: puzzle.selections[index].map(|primitive| primitive.name().to_lowercase()),
        };
        Self {
            left: entry(0),
            middle: entry(1),
            right: entry(2),
        }
    }
}

/// Parses a puzzle from TOML text.
pub fn parse_puzzle(s: &str) -> Result<Puzzle, ConfigError> {
    let file: PuzzleFile = toml::from_str(s)?;
    file.to_puzzle()
}

/// Loads a puzzle from a TOML file.
pub fn load_puzzle(path: impl AsRef<Path>) -> Result<Puzzle, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_puzzle(&contents)
}

/// Saves a puzzle as TOML.
pub fn save_puzzle(path: impl AsRef<Path>, puzzle: &Puzzle) -> std::io::Result<()> {
    let contents = toml::to_string(&PuzzleFile::from_puzzle(puzzle))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, contents)
}

/// Saves a solution in human-readable text format.
pub fn save_report(path: impl AsRef<Path>, solution: &Solution) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", solution.format_report())?;
    Ok(())
}
