//! Actions grouped by kind and indexed by tile.

use std::collections::{BTreeMap, BTreeSet};

use num::BigRational;

use crate::{
    adofai::action::{Action, ActionKind},
    math::{ratio, ratio_from_f64},
};

use super::ConversionError;

/// A speed change, before it is resolved against the running BPM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedChange {
    /// Absolute new BPM.
    Bpm(BigRational),
    /// Factor applied to the BPM of the previous speed change.
    Multiplier(BigRational),
}

/// Number of planets orbiting each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlanetCount {
    /// The usual two planets.
    #[default]
    Two,
    /// Three planets. Each step is 60° shorter.
    Three,
}

impl PlanetCount {
    /// Degrees subtracted from every angular step.
    #[must_use]
    pub fn angle_offset(self) -> BigRational {
        match self {
            Self::Two => ratio(0, 1),
            Self::Three => ratio(60, 1),
        }
    }
}

/// Actions indexed by tile index, which is the floor of the action minus one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIndex {
    /// Speed changes.
    pub speed_changes: BTreeMap<usize, SpeedChange>,
    /// Tiles where the rotation direction flips.
    pub twirls: BTreeSet<usize>,
    /// Extra beats of pauses.
    pub pauses: BTreeMap<usize, BigRational>,
    /// Planet count changes.
    pub planet_changes: BTreeMap<usize, PlanetCount>,
}

impl EventIndex {
    /// Indexes `actions`. On coincident actions of the same kind, the later one wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MalformedEvent`] when a known action lacks a field it needs.
    pub fn from_actions(actions: &[Action]) -> Result<Self, ConversionError> {
        let mut index = Self::default();
        for action in actions {
            let Some(tile) = action.floor.checked_sub(1) else {
                log::debug!("ignoring {:?} on the start tile", action.kind);
                continue;
            };
            let malformed = |event: &'static str, field: &'static str| {
                ConversionError::MalformedEvent {
                    floor: action.floor,
                    event,
                    field,
                }
            };
            match &action.kind {
                ActionKind::SetSpeed {
                    speed_type,
                    beats_per_minute,
                    bpm_multiplier,
                } => {
                    let change = if speed_type.as_deref() == Some("Multiplier") {
                        let factor = bpm_multiplier
                            .and_then(ratio_from_f64)
                            .ok_or_else(|| malformed("SetSpeed", "bpmMultiplier"))?;
                        SpeedChange::Multiplier(factor)
                    } else {
                        let bpm = beats_per_minute
                            .and_then(ratio_from_f64)
                            .ok_or_else(|| malformed("SetSpeed", "beatsPerMinute"))?;
                        SpeedChange::Bpm(bpm)
                    };
                    index.speed_changes.insert(tile, change);
                }
                ActionKind::Twirl => {
                    index.twirls.insert(tile);
                }
                ActionKind::Pause { duration } => {
                    let duration = duration
                        .and_then(ratio_from_f64)
                        .ok_or_else(|| malformed("Pause", "duration"))?;
                    index.pauses.insert(tile, duration);
                }
                ActionKind::MultiPlanet { planets } => {
                    let count = match planets.as_deref() {
                        Some("ThreePlanets") => PlanetCount::Three,
                        Some(_) => PlanetCount::Two,
                        None => return Err(malformed("MultiPlanet", "planets")),
                    };
                    index.planet_changes.insert(tile, count);
                }
                ActionKind::Other => {}
            }
        }
        Ok(index)
    }

    /// Speed change on tile `tile`.
    #[must_use]
    pub fn speed_change_at(&self, tile: usize) -> Option<&SpeedChange> {
        self.speed_changes.get(&tile)
    }

    /// Whether the rotation direction flips on tile `tile`.
    #[must_use]
    pub fn twirls_at(&self, tile: usize) -> bool {
        self.twirls.contains(&tile)
    }

    /// Extra beats of a pause on tile `tile`.
    #[must_use]
    pub fn pause_at(&self, tile: usize) -> Option<&BigRational> {
        self.pauses.get(&tile)
    }

    /// Planet count change on tile `tile`.
    #[must_use]
    pub fn planet_change_at(&self, tile: usize) -> Option<PlanetCount> {
        self.planet_changes.get(&tile).copied()
    }
}
