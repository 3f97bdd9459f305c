//! Tile directions of the chart path.

use num::BigRational;

use crate::math::{ratio, ratio_from_f64, rem_euclid};

use super::ParseError;

/// Value of `angleData` (and of path code `!`) marking a tile without a direction.
pub const VANISH_SENTINEL: f64 = 999.0;

/// Direction of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileAngle {
    /// Direction in degrees, counter-clockwise from the right, in `[0, 360)`.
    Degrees(BigRational),
    /// A tile whose direction is hidden. It takes a floor but never produces a note.
    Vanish,
}

impl TileAngle {
    /// Creates a tile from degrees, reducing it into `[0, 360)`.
    #[must_use]
    pub fn degrees(value: BigRational) -> Self {
        Self::Degrees(rem_euclid(&value, &ratio(360, 1)))
    }

    /// Whether this is [`TileAngle::Vanish`].
    #[must_use]
    pub const fn is_vanish(&self) -> bool {
        matches!(self, Self::Vanish)
    }

    /// The value as written in `angleData`: the direction, or [`VANISH_SENTINEL`] for a
    /// vanishing tile.
    #[must_use]
    pub fn raw_degrees(&self) -> BigRational {
        match self {
            Self::Degrees(degrees) => degrees.clone(),
            Self::Vanish => ratio(VANISH_SENTINEL as i64, 1),
        }
    }

    /// The direction in degrees, if any.
    #[must_use]
    pub const fn as_degrees(&self) -> Option<&BigRational> {
        match self {
            Self::Degrees(degrees) => Some(degrees),
            Self::Vanish => None,
        }
    }
}

/// Legacy `pathData` codes with a fixed direction.
const PATH_CODES: [(char, i64); 24] = [
    ('R', 0),
    ('p', 15),
    ('J', 30),
    ('E', 45),
    ('T', 60),
    ('o', 75),
    ('U', 90),
    ('q', 105),
    ('G', 120),
    ('Q', 135),
    ('H', 150),
    ('W', 165),
    ('L', 180),
    ('x', 195),
    ('N', 210),
    ('Z', 225),
    ('F', 240),
    ('V', 255),
    ('D', 270),
    ('Y', 285),
    ('B', 300),
    ('C', 315),
    ('M', 330),
    ('A', 345),
];

/// Code of a vanishing tile.
const VANISH_CODE: char = '!';
/// Turns 72° from the previous tile, continuing a pentagon.
const PENTAGON_CODE: char = '5';
/// Turns 360/7° from the previous tile, continuing a heptagon.
const HEPTAGON_CODE: char = '7';

/// Expands a legacy `pathData` string into tile angles.
///
/// Relative codes turn from the last tile that has a direction, or from 0° if there is none yet.
/// Unknown codes are read as 0°.
#[must_use]
pub fn expand_path_data(path_data: &str) -> Vec<TileAngle> {
    let mut tiles = Vec::with_capacity(path_data.len());
    let mut last = ratio(0, 1);
    for code in path_data.chars() {
        let tile = match code {
            VANISH_CODE => TileAngle::Vanish,
            PENTAGON_CODE => TileAngle::degrees(&last + ratio(72, 1)),
            HEPTAGON_CODE => TileAngle::degrees(&last + ratio(360, 7)),
            _ => {
                let degrees = PATH_CODES
                    .iter()
                    .find(|&&(c, _)| c == code)
                    .map_or(0, |&(_, degrees)| degrees);
                if degrees == 0 && code != 'R' {
                    log::trace!("unknown path code `{code}`, read as 0 degrees");
                }
                TileAngle::degrees(ratio(degrees, 1))
            }
        };
        if let Some(degrees) = tile.as_degrees() {
            last = degrees.clone();
        }
        tiles.push(tile);
    }
    tiles
}

/// Converts an `angleData` list into tile angles.
///
/// # Errors
///
/// Returns [`ParseError::InvalidAngle`] for a non-finite entry.
#[allow(clippy::float_cmp)]
pub fn angles_from_data(angle_data: &[f64]) -> Result<Vec<TileAngle>, ParseError> {
    angle_data
        .iter()
        .enumerate()
        .map(|(index, &angle)| {
            if angle == VANISH_SENTINEL {
                return Ok(TileAngle::Vanish);
            }
            ratio_from_f64(angle)
                .map(TileAngle::degrees)
                .ok_or(ParseError::InvalidAngle { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(numer: i64, denom: i64) -> TileAngle {
        TileAngle::Degrees(ratio(numer, denom))
    }

    #[test]
    fn fixed_codes() {
        assert_eq!(
            expand_path_data("RUL!D"),
            vec![deg(0, 1), deg(90, 1), deg(180, 1), TileAngle::Vanish, deg(270, 1)]
        );
        assert_eq!(expand_path_data("pA"), vec![deg(15, 1), deg(345, 1)]);
    }

    #[test]
    fn unknown_code_is_zero() {
        assert_eq!(expand_path_data("?"), vec![deg(0, 1)]);
    }

    #[test]
    fn relative_codes_are_exact() {
        assert_eq!(
            expand_path_data("R555"),
            vec![deg(0, 1), deg(72, 1), deg(144, 1), deg(216, 1)]
        );
        assert_eq!(
            expand_path_data("R77"),
            vec![deg(0, 1), deg(360, 7), deg(720, 7)]
        );
        // Wraps around a full turn.
        assert_eq!(expand_path_data("A5"), vec![deg(345, 1), deg(57, 1)]);
    }

    #[test]
    fn relative_code_skips_vanish() {
        assert_eq!(
            expand_path_data("U!5"),
            vec![deg(90, 1), TileAngle::Vanish, deg(162, 1)]
        );
        assert_eq!(expand_path_data("7"), vec![deg(360, 7)]);
    }

    #[test]
    fn angle_data() {
        assert_eq!(
            angles_from_data(&[0.0, 22.5, 999.0, 360.0, -90.0]).unwrap(),
            vec![
                deg(0, 1),
                deg(45, 2),
                TileAngle::Vanish,
                deg(0, 1),
                deg(270, 1)
            ]
        );
    }
}
