//! The parser of ADOFAI (`.adofai`) chart files.
//!
//! An ADOFAI chart is a JSON document with three parts that matter for conversion:
//!
//! - `settings`: song metadata and the base BPM,
//! - `pathData` (older charts) or `angleData` (newer charts): the direction of every tile,
//! - `actions`: events placed on tiles, such as speed changes and twirls.
//!
//! Files saved by the game are often not strict JSON: they may start with a byte order mark and
//! contain a trailing comma after the last field of an object. [`relax`] repairs exactly these two
//! things before the text reaches `serde_json`. Everything else must be well-formed.

pub mod action;
pub mod path;
pub mod relax;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::{
    action::Action,
    path::{TileAngle, angles_from_data, expand_path_data},
};

/// Song and timing settings of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Song title.
    #[serde(default)]
    pub song: String,
    /// Song artist.
    #[serde(default)]
    pub artist: String,
    /// Chart author.
    #[serde(default)]
    pub author: String,
    /// Base BPM of the first tile.
    pub bpm: f64,
    /// Music offset in milliseconds.
    #[serde(default)]
    pub offset: f64,
    /// Music volume in percentage.
    #[serde(default = "default_volume")]
    pub volume: f64,
}

/// Default music volume, 100%.
#[must_use]
pub const fn default_volume() -> f64 {
    100.0
}

/// A parsed ADOFAI chart.
#[derive(Debug, Clone, PartialEq)]
pub struct AdofaiChart {
    /// Chart settings.
    pub settings: Settings,
    /// Direction of each tile, in play order. Index 0 is the first tile after the start tile.
    pub tiles: Vec<TileAngle>,
    /// Actions in the order they appear in the file.
    pub actions: Vec<Action>,
}

impl AdofaiChart {
    /// Number of tiles that produce a note, i.e. tiles which are not [`TileAngle::Vanish`].
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_vanish()).count()
    }
}

/// An error occurred when parsing an ADOFAI chart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The text is not valid JSON or does not have the expected structure.
    #[error("invalid chart at `{path}`: {source}")]
    Json {
        /// Path of the JSON element where parsing failed.
        path: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Neither `pathData` nor `angleData` exists.
    #[error("chart has neither `pathData` nor `angleData`")]
    MissingPath,
    /// An entry of `angleData` could not be represented exactly.
    #[error("angle of tile {index} is not a finite number")]
    InvalidAngle {
        /// Index of the tile.
        index: usize,
    },
}

impl ParseError {
    /// Line and column (both 1-based) of a JSON error, if known.
    #[must_use]
    pub fn line_column(&self) -> Option<(usize, usize)> {
        match self {
            Self::Json { source, .. } if source.line() > 0 => Some((source.line(), source.column())),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChart {
    path_data: Option<String>,
    angle_data: Option<Vec<f64>>,
    settings: Settings,
    #[serde(default)]
    actions: Vec<Action>,
}

/// Parses ADOFAI chart text.
///
/// When both `pathData` and `angleData` exist, `pathData` is used.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not valid JSON even after [`relax::relax_json`], when
/// `settings` or its `bpm` is missing, or when there is no tile path.
pub fn parse_adofai(source: &str) -> Result<AdofaiChart, ParseError> {
    let relaxed = relax::relax_json(source);
    let mut de = serde_json::Deserializer::from_str(&relaxed);
    let raw: RawChart = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        ParseError::Json {
            path,
            source: err.into_inner(),
        }
    })?;

    let tiles = match (raw.path_data, raw.angle_data) {
        (Some(path_data), _) => expand_path_data(&path_data),
        (None, Some(angle_data)) => angles_from_data(&angle_data)?,
        (None, None) => return Err(ParseError::MissingPath),
    };
    log::debug!(
        "parsed chart `{}` with {} tiles and {} actions",
        raw.settings.song,
        tiles.len(),
        raw.actions.len()
    );

    Ok(AdofaiChart {
        settings: raw.settings,
        tiles,
        actions: raw.actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_data_wins_over_angle_data() {
        let chart = parse_adofai(
            r#"{"pathData": "RU", "angleData": [0, 0, 0], "settings": {"bpm": 120}}"#,
        )
        .unwrap();
        assert_eq!(chart.tiles.len(), 2);
        assert!(chart.actions.is_empty());
        assert_eq!(chart.settings.volume, 100.0);
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = parse_adofai(r#"{"settings": {"bpm": 120}, "actions": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingPath));
    }

    #[test]
    fn missing_bpm_reports_its_path() {
        let err = parse_adofai(r#"{"angleData": [0], "settings": {"song": "x"}}"#).unwrap_err();
        let ParseError::Json { path, .. } = &err else {
            panic!("expected a JSON error, got {err:?}");
        };
        assert_eq!(path, "settings");
        assert!(err.line_column().is_some());
    }

    #[test]
    fn bom_and_trailing_comma_are_tolerated() {
        let source = "\u{feff}{\"angleData\": [0, 90], \"settings\": {\"bpm\": 150, \"song\": \"a\", }}";
        let chart = parse_adofai(source).unwrap();
        assert_eq!(chart.settings.song, "a");
        assert_eq!(chart.note_count(), 2);
    }
}
