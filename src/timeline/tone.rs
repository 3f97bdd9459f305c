//! Red/blue tone assignment.
//!
//! Taiko notes come in two tones: red (don) and blue (ka). ADOFAI tiles have no such distinction, so
//! the converter starts a new tone section at speed changes, following a [`ToneMode`].

use num::BigRational;

use crate::{config::ToneMode, rng::Rng};

/// Tone of a taiko note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Red note, don.
    #[default]
    Red,
    /// Blue note, ka.
    Blue,
}

/// Sparse record of tone changes keyed by note index.
///
/// The tone of a note is the tone recorded at the greatest index not exceeding the note's index, or
/// [`Tone::Red`] before the first record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToneMap {
    points: Vec<(usize, Tone)>,
}

impl ToneMap {
    /// Records `tone` from note `index` onward. A record at the same index is replaced.
    ///
    /// Indices are expected in non-decreasing order; an index lower than the last one is inserted
    /// at its sorted place.
    pub fn record(&mut self, index: usize, tone: Tone) {
        match self.points.binary_search_by_key(&index, |&(at, _)| at) {
            Ok(found) => {
                if let Some(point) = self.points.get_mut(found) {
                    point.1 = tone;
                }
            }
            Err(insert_at) => self.points.insert(insert_at, (index, tone)),
        }
    }

    /// Tone in force at note `index`.
    #[must_use]
    pub fn tone_at(&self, index: usize) -> Tone {
        let after = self.points.partition_point(|&(at, _)| at <= index);
        after
            .checked_sub(1)
            .and_then(|last| self.points.get(last))
            .map_or(Tone::Red, |&(_, tone)| tone)
    }

    /// Recorded change points in index order.
    #[must_use]
    pub fn points(&self) -> &[(usize, Tone)] {
        &self.points
    }
}

/// Decides the tone recorded at each speed change.
#[derive(Debug, Clone)]
pub struct ToneAssigner<R> {
    mode: ToneMode,
    current: Tone,
    rng: R,
}

impl<R: Rng> ToneAssigner<R> {
    /// Creates an assigner. `rng` is only used by [`ToneMode::Random`].
    pub const fn new(mode: ToneMode, rng: R) -> Self {
        Self {
            mode,
            current: Tone::Red,
            rng,
        }
    }

    /// Tone to record at a speed change from `old_bpm` to `new_bpm`, or `None` to record nothing.
    ///
    /// In [`ToneMode::Auto`] the tone flips to blue when slowing down and back to red when
    /// speeding up. A change to the same speed never flips it.
    pub fn assign(&mut self, new_bpm: &BigRational, old_bpm: &BigRational) -> Option<Tone> {
        match self.mode {
            ToneMode::Auto => {
                let next = match self.current {
                    Tone::Red if new_bpm < old_bpm => Tone::Blue,
                    Tone::Blue if new_bpm > old_bpm => Tone::Red,
                    _ => return None,
                };
                self.current = next;
                Some(next)
            }
            ToneMode::AlwaysRed => Some(Tone::Red),
            ToneMode::AlwaysBlue => Some(Tone::Blue),
            ToneMode::Random => Some(if self.rng.generate(0..=1) == 0 {
                Tone::Red
            } else {
                Tone::Blue
            }),
        }
    }
}
