//! Persisted maze format.
//!
//! Canonical form (written by [`MazeGrid::to_file`]):
//!
//! ```json
//! { "version": "2.0", "width": 16, "height": 16,
//!   "mapData": "EFB7...", "start": {"x": 0, "y": 0}, "goals": ["7,7", "8,7"] }
//! ```
//!
//! `mapData` holds one uppercase hex digit per cell in flat-index order.
//! Older files store the walls under `data`, either as a flat array of
//! integers or as an object keyed by stringified index. Both are
//! normalized into the canonical nibble array before anything else runs.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Point;
use crate::grid::MazeGrid;
use crate::walls::Walls;

/// Version string written into new files.
pub const FORMAT_VERSION: &str = "2.0";

/// Largest accepted width or height.
pub const MAX_DIMENSION: i64 = 4096;

/// The on-disk / on-wire shape of a maze.
///
/// Every field is optional at the serde level so that validation can report
/// exactly which one is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LegacyWalls>,
    #[serde(default)]
    pub start: Option<Point>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Wall data written by older versions under the `data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyWalls {
    /// `[15, 14, 5, ...]`
    Flat(Vec<i64>),
    /// `{"0": 15, "1": 14, ...}` from serializing a typed array naively.
    Keyed(HashMap<String, i64>),
}

/// Reasons a persisted maze is rejected. The live grid is never touched.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("malformed maze JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(f) | Self::InvalidField { field: f, .. } => Some(*f),
            Self::Json(_) => None,
        }
    }
}

impl MazeFile {
    /// Parse from JSON text without validating.
    pub fn from_json(s: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate every field and build a fresh grid.
    pub fn validate(&self) -> Result<MazeGrid, LoadError> {
        let width = dimension(self.width, "width")?;
        let height = dimension(self.height, "height")?;
        let len = (width * height) as usize;

        let mut walls = self.decode_walls()?;
        if walls.len() != len {
            log::debug!(
                "wall data has {} cells, expected {len}; normalizing",
                walls.len()
            );
            walls.resize(len, Walls::FULL);
        }

        let in_range = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;

        let start = self.start.unwrap_or(Point::ZERO);
        if !in_range(start) {
            return Err(LoadError::invalid("start", format!("{start} is outside the grid")));
        }

        let mut goals = BTreeSet::new();
        for key in &self.goals {
            let p: Point = key.parse().map_err(|e: String| LoadError::invalid("goals", e))?;
            if !in_range(p) {
                return Err(LoadError::invalid("goals", format!("{p} is outside the grid")));
            }
            if p != start {
                goals.insert(p);
            }
        }

        Ok(MazeGrid::from_parts(width, height, walls, start, goals))
    }

    /// Decode whichever wall encoding is present into nibbles.
    fn decode_walls(&self) -> Result<Vec<Walls>, LoadError> {
        if let Some(hex) = &self.map_data {
            return hex
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    c.to_digit(16)
                        .map(|d| Walls::from_bits(d as u8))
                        .ok_or_else(|| {
                            LoadError::invalid("mapData", format!("non-hex digit {c:?} at {i}"))
                        })
                })
                .collect();
        }
        match &self.data {
            Some(LegacyWalls::Flat(values)) => values
                .iter()
                .enumerate()
                .map(|(i, &v)| nibble(v, i))
                .collect(),
            Some(LegacyWalls::Keyed(map)) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, &v) in map {
                    let i: usize = k
                        .parse()
                        .map_err(|_| LoadError::invalid("data", format!("key {k:?} is not an index")))?;
                    entries.push((i, v));
                }
                entries.sort_unstable_by_key(|&(i, _)| i);
                entries.into_iter().map(|(i, v)| nibble(v, i)).collect()
            }
            None => Err(LoadError::MissingField("mapData")),
        }
    }
}

fn dimension(v: Option<i64>, field: &'static str) -> Result<i32, LoadError> {
    let v = v.ok_or(LoadError::MissingField(field))?;
    if !(1..=MAX_DIMENSION).contains(&v) {
        return Err(LoadError::invalid(field, format!("{v} is not a usable size")));
    }
    Ok(v as i32)
}

fn nibble(v: i64, i: usize) -> Result<Walls, LoadError> {
    if !(0..=15).contains(&v) {
        return Err(LoadError::invalid("data", format!("value {v} at {i} is not a wall nibble")));
    }
    Ok(Walls::from_bits(v as u8))
}

impl MazeGrid {
    /// Canonical persisted form.
    pub fn to_file(&self) -> MazeFile {
        MazeFile {
            version: Some(FORMAT_VERSION.to_string()),
            width: Some(i64::from(self.width())),
            height: Some(i64::from(self.height())),
            map_data: Some(self.walls().iter().map(|w| w.hex()).collect()),
            data: None,
            start: Some(self.start()),
            goals: self.goals().map(Point::key).collect(),
        }
    }

    /// Build a grid from a persisted maze.
    pub fn from_file(file: &MazeFile) -> Result<Self, LoadError> {
        file.validate()
    }

    /// Parse and validate JSON text.
    pub fn from_json(s: &str) -> Result<Self, LoadError> {
        MazeFile::from_json(s)?.validate()
    }

    /// Replace this grid with a persisted maze.
    ///
    /// On error `self` is left exactly as it was.
    pub fn load(&mut self, file: &MazeFile) -> Result<(), LoadError> {
        match file.validate() {
            Ok(grid) => {
                *self = grid;
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected persisted maze: {e}");
                Err(e)
            }
        }
    }
}
