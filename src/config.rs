//! Options for a conversion, collected into one immutable value.

use std::str::FromStr;

use thiserror::Error;

/// How tones (red don / blue ka) are assigned at speed changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToneMode {
    /// Switch to blue when the chart slows down and back to red when it speeds up.
    #[default]
    Auto,
    /// Every speed change starts a red section.
    AlwaysRed,
    /// Every speed change starts a blue section.
    AlwaysBlue,
    /// Every speed change starts a section of a randomly chosen tone.
    Random,
}

/// Error on parsing an unknown [`ToneMode`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tone mode `{0}`, expected one of auto, red, blue, random")]
pub struct UnknownToneMode(pub String);

impl FromStr for ToneMode {
    type Err = UnknownToneMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "speed" => Ok(Self::Auto),
            "red" | "don" => Ok(Self::AlwaysRed),
            "blue" | "ka" | "kat" => Ok(Self::AlwaysBlue),
            "random" => Ok(Self::Random),
            _ => Err(UnknownToneMode(s.to_string())),
        }
    }
}

/// Configuration of the angle-to-beat conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Bar where the first tile lands. The walk starts one beat before this bar.
    pub begin_bar: i64,
    /// Whether speed changes that are not powers of two register real tempo changes. When `false`,
    /// every speed change only alters the scroll speed.
    pub change_bpm: bool,
    /// Tone assignment policy.
    pub tone_mode: ToneMode,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            begin_bar: 0,
            change_bpm: false,
            tone_mode: ToneMode::Auto,
        }
    }
}

impl ConversionConfig {
    /// Beat number the walk starts from, one beat before [`Self::begin_bar`]. Returns `None` if
    /// it does not fit in an `i64`.
    #[must_use]
    pub const fn start_beat(&self) -> Option<i64> {
        match self.begin_bar.checked_mul(4) {
            Some(beat) => beat.checked_sub(1),
            None => None,
        }
    }
}
