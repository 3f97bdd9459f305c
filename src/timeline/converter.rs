//! The walk over the tile path that turns angles into beat positions.
//!
//! A planet sweeping 180° takes one beat. The sweep from tile `i - 1` to tile `i` is
//! `180 + prev - cur` degrees (or `180 - prev + cur` after a twirl), reduced into `(0, 360]`:
//! a sweep of 0° is a full turn. Three planets shorten every sweep by 60°. A pause adds
//! `duration * 180` degrees. All arithmetic is exact, so positions never drift however long the
//! chart is.
//!
//! `prev` is the direction of tile `i - 1`. When that tile vanishes, `prev` is the value of tile
//! `i - 2` as written in the chart turned by 180°, so a vanishing tile before it counts as 999.
//! Tile 0 is preceded by a virtual tile at 0°.

use num::{BigRational, One, Signed, ToPrimitive, Zero};

use crate::{
    adofai::path::TileAngle,
    config::ConversionConfig,
    math::{is_power_of_two, ratio, rem_euclid, split_whole},
    rng::Rng,
};

use super::{
    ConversionError, Timeline,
    beat::{BeatPosition, TempoSegment},
    event_index::{EventIndex, PlanetCount, SpeedChange},
    tone::{ToneAssigner, ToneMap},
};

/// Highest BPM written to the tempo track. Faster tempos are halved and scrolled twice as fast.
const MAX_TEMPO_BPM: i64 = 300;

/// Converts a tile path into beat positions, a tempo track and tone changes.
#[derive(Debug)]
pub struct BeatTimeConverter<'a, R> {
    events: &'a EventIndex,
    change_bpm: bool,
    tones: ToneAssigner<R>,

    /// Fraction of the current beat, in `[0, 1)`.
    fraction: BigRational,
    /// Current whole beat.
    bar: i64,
    reversed: bool,
    planets: PlanetCount,
    /// Scroll speed multiplier relative to the tempo track.
    scroll: BigRational,
    /// BPM of the last speed change, which multipliers and tone decisions refer to.
    baseline_bpm: BigRational,
    /// BPM of the last tempo track entry.
    tempo_bpm: BigRational,
    /// Vanishing tiles seen so far.
    vanished: usize,

    beats: Vec<BeatPosition>,
    tempo: Vec<TempoSegment>,
    tone_map: ToneMap,
}

impl<'a, R: Rng> BeatTimeConverter<'a, R> {
    /// Creates a converter starting at `base_bpm`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NonPositiveBpm`] if `base_bpm` is not positive, and
    /// [`ConversionError::BeginBarOutOfRange`] if the start beat of `config` overflows.
    pub fn new(
        events: &'a EventIndex,
        base_bpm: BigRational,
        config: &ConversionConfig,
        rng: R,
    ) -> Result<Self, ConversionError> {
        if !base_bpm.is_positive() {
            return Err(ConversionError::NonPositiveBpm {
                floor: None,
                bpm: base_bpm.to_f64().unwrap_or(f64::NAN),
            });
        }
        let bar = config
            .start_beat()
            .ok_or(ConversionError::BeginBarOutOfRange {
                begin_bar: config.begin_bar,
            })?;
        Ok(Self {
            events,
            change_bpm: config.change_bpm,
            tones: ToneAssigner::new(config.tone_mode, rng),
            fraction: BigRational::zero(),
            bar,
            reversed: false,
            planets: PlanetCount::Two,
            scroll: BigRational::one(),
            baseline_bpm: base_bpm.clone(),
            tempo_bpm: base_bpm.clone(),
            vanished: 0,
            beats: Vec::new(),
            tempo: vec![TempoSegment {
                start: BeatPosition::origin(),
                bpm: base_bpm,
            }],
            tone_map: ToneMap::default(),
        })
    }

    /// Walks all `tiles` and returns the resulting timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if a speed change resolves to a non-positive BPM or a beat
    /// number leaves the 64-bit range.
    pub fn convert(mut self, tiles: &[TileAngle]) -> Result<Timeline, ConversionError> {
        let full_turn = ratio(360, 1);
        let half_turn = ratio(180, 1);
        // Outgoing direction of the previous tile, and its value as written in the chart.
        let mut prev = BigRational::zero();
        let mut prev_raw = BigRational::zero();

        for (tile, angle) in tiles.iter().enumerate() {
            let outgoing = match angle {
                TileAngle::Degrees(cur) => {
                    let mut sweep = self.sweep(&prev, cur, &full_turn, &half_turn);
                    if let Some(pause) = self.events.pause_at(tile) {
                        sweep += pause * &half_turn;
                    }
                    self.advance(tile, sweep / (&half_turn * &self.scroll))?;
                    cur.clone()
                }
                TileAngle::Vanish => {
                    self.vanished += 1;
                    rem_euclid(&(&prev_raw - &half_turn), &full_turn)
                }
            };
            self.apply_events(tile)?;
            prev = outgoing;
            prev_raw = angle.raw_degrees();
        }

        log::debug!(
            "converted {} tiles into {} beats, {} tempo segments and {} tone changes",
            tiles.len(),
            self.beats.len(),
            self.tempo.len(),
            self.tone_map.points().len()
        );
        Ok(Timeline {
            beats: self.beats,
            tempo: self.tempo,
            tones: self.tone_map,
        })
    }

    /// Degrees swept from direction `prev` to `cur`, in `(0, 360]`.
    fn sweep(
        &self,
        prev: &BigRational,
        cur: &BigRational,
        full_turn: &BigRational,
        half_turn: &BigRational,
    ) -> BigRational {
        let offset = self.planets.angle_offset();
        let raw = if self.reversed {
            half_turn - prev + cur - offset
        } else {
            half_turn + prev - cur - offset
        };
        let sweep = rem_euclid(&raw, full_turn);
        if sweep.is_zero() {
            full_turn.clone()
        } else {
            sweep
        }
    }

    /// Moves forward by `beats` and emits the position of `tile`.
    fn advance(&mut self, tile: usize, beats: BigRational) -> Result<(), ConversionError> {
        self.fraction += beats;
        if self.fraction >= BigRational::one() {
            let (whole, rest) = split_whole(&self.fraction);
            self.bar = whole
                .to_i64()
                .and_then(|whole| self.bar.checked_add(whole))
                .ok_or(ConversionError::BeatOutOfRange { floor: tile + 1 })?;
            self.fraction = rest;
        }
        let position = BeatPosition::from_parts(self.bar, &self.fraction)
            .ok_or(ConversionError::BeatOutOfRange { floor: tile + 1 })?;
        self.beats.push(position);
        Ok(())
    }

    /// Applies the actions on `tile`, which affect the following tiles.
    fn apply_events(&mut self, tile: usize) -> Result<(), ConversionError> {
        let events = self.events;
        if let Some(change) = events.speed_change_at(tile) {
            self.apply_speed_change(tile, change)?;
        }
        if events.twirls_at(tile) {
            self.reversed = !self.reversed;
        }
        if let Some(planets) = events.planet_change_at(tile) {
            self.planets = planets;
        }
        Ok(())
    }

    fn apply_speed_change(
        &mut self,
        tile: usize,
        change: &SpeedChange,
    ) -> Result<(), ConversionError> {
        let new_bpm = match change {
            SpeedChange::Bpm(bpm) => bpm.clone(),
            SpeedChange::Multiplier(factor) => &self.baseline_bpm * factor,
        };
        if !new_bpm.is_positive() {
            return Err(ConversionError::NonPositiveBpm {
                floor: Some(tile + 1),
                bpm: new_bpm.to_f64().unwrap_or(f64::NAN),
            });
        }

        let scroll_only = !self.change_bpm || is_power_of_two(&(&new_bpm / &self.baseline_bpm));
        if scroll_only {
            self.scroll = &new_bpm / &self.tempo_bpm;
            log::trace!("tile {tile}: scroll x{} at {new_bpm} bpm", self.scroll);
        } else {
            let limit = ratio(MAX_TEMPO_BPM, 1);
            let two = ratio(2, 1);
            let mut bpm = new_bpm.clone();
            let mut scroll = BigRational::one();
            while bpm > limit {
                bpm /= &two;
                scroll *= &two;
            }
            log::trace!("tile {tile}: tempo {bpm} bpm, scroll x{scroll}");
            self.scroll = scroll;
            self.push_tempo(bpm.clone());
            self.tempo_bpm = bpm;
        }

        if let Some(tone) = self.tones.assign(&new_bpm, &self.baseline_bpm) {
            self.tone_map
                .record(tile.saturating_sub(self.vanished), tone);
        }
        self.baseline_bpm = new_bpm;
        Ok(())
    }

    /// Starts a tempo segment at the last emitted beat. When that beat is not after the last
    /// segment, the last segment takes the new BPM instead.
    fn push_tempo(&mut self, bpm: BigRational) {
        let start = self.beats.last().cloned().unwrap_or_else(BeatPosition::origin);
        match self.tempo.last_mut() {
            Some(last) if start <= last.start => last.bpm = bpm,
            _ => self.tempo.push(TempoSegment { start, bpm }),
        }
    }
}
