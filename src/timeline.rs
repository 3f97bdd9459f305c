//! Conversion of a tile path into an exact timeline.
//!
//! # Order of Processing
//!
//! Each tile is handled in two steps:
//!
//! 1. The sweep from the previous tile is turned into beats, using the direction, planet count and
//!    scroll speed in force *before* this tile's own actions. A pause on the tile lengthens this
//!    sweep.
//! 2. The actions on the tile are applied, in this order: speed change, twirl, planet count
//!    change. They affect the following tiles.
//!
//! A vanishing tile emits no beat but still takes a floor, and its actions are applied as usual.

pub mod beat;
pub mod converter;
pub mod event_index;
pub mod tone;

use num::BigRational;
use thiserror::Error;

use crate::{adofai::AdofaiChart, config::ConversionConfig, math::ratio_from_f64, rng::Rng};

use self::{
    beat::{BeatPosition, TempoSegment},
    converter::BeatTimeConverter,
    event_index::EventIndex,
    tone::ToneMap,
};

/// Result of converting a tile path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// Position of each tile that is not vanishing, in order.
    pub beats: Vec<BeatPosition>,
    /// Tempo track. The first segment starts at [`BeatPosition::origin`] and starts are strictly
    /// increasing.
    pub tempo: Vec<TempoSegment>,
    /// Tone changes keyed by index into `beats`.
    pub tones: ToneMap,
}

/// An error occurred while converting a chart into a timeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// A known action lacks a field it needs, or the field is not a finite number.
    #[error("{event} on floor {floor} has no valid `{field}`")]
    MalformedEvent {
        /// Floor of the action.
        floor: usize,
        /// `eventType` of the action.
        event: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },
    /// The base BPM, or the BPM after a speed change, is not positive.
    #[error("bpm {bpm} {} is not positive", floor_label(.floor))]
    NonPositiveBpm {
        /// Floor of the speed change, or `None` for the base BPM.
        floor: Option<usize>,
        /// The offending BPM.
        bpm: f64,
    },
    /// The beat number of a tile no longer fits in an `i64`.
    #[error("beat position of floor {floor} is out of range")]
    BeatOutOfRange {
        /// Floor of the tile.
        floor: usize,
    },
    /// The start beat of the configured begin bar does not fit in an `i64`.
    #[error("begin bar {begin_bar} is out of range")]
    BeginBarOutOfRange {
        /// The configured begin bar.
        begin_bar: i64,
    },
}

fn floor_label(floor: &Option<usize>) -> String {
    floor.map_or_else(|| "of the chart".to_string(), |floor| format!("on floor {floor}"))
}

/// Converts `chart` into a timeline, using the thread-local random generator for
/// [`crate::config::ToneMode::Random`].
///
/// # Errors
///
/// Returns [`ConversionError`] for malformed actions, non-positive BPMs or beats out of range.
pub fn convert_timeline(
    chart: &AdofaiChart,
    config: &ConversionConfig,
) -> Result<Timeline, ConversionError> {
    convert_timeline_with_rng(chart, config, crate::rng::RandRng::thread_local())
}

/// Converts `chart` into a timeline, drawing random tones from `rng`.
///
/// # Errors
///
/// Returns [`ConversionError`] for malformed actions, non-positive BPMs or beats out of range.
pub fn convert_timeline_with_rng(
    chart: &AdofaiChart,
    config: &ConversionConfig,
    rng: impl Rng,
) -> Result<Timeline, ConversionError> {
    let events = EventIndex::from_actions(&chart.actions)?;
    let base_bpm: BigRational =
        ratio_from_f64(chart.settings.bpm).ok_or(ConversionError::NonPositiveBpm {
            floor: None,
            bpm: chart.settings.bpm,
        })?;
    BeatTimeConverter::new(&events, base_bpm, config, rng)?.convert(&chart.tiles)
}
