//! The Malody chart (`.mc`) format, taiko mode, and its construction from a [`Timeline`].
//!
//! A Malody chart is a JSON document:
//!
//! ```json
//! {
//!   "meta": { "$ver": 0, "creator": "...", "mode": 5, "song": { "title": "..." }, ... },
//!   "time": [ { "beat": [0, 0, 1], "bpm": 120.0 } ],
//!   "effect": [],
//!   "note": [
//!     { "beat": [0, 0, 1], "sound": "music.ogg", "vol": 100, "offset": 0, "type": 1 },
//!     { "beat": [1, 1, 2], "column": 0, "style": 0 }
//!   ]
//! }
//! ```
//!
//! Beats are `[beat, numerator, denominator]`. The first note is not playable: it tells the player
//! which music file to play and how to align it.

use serde::{Deserialize, Serialize};

use crate::{
    adofai::Settings,
    timeline::{Timeline, beat::BeatPosition, tone::Tone},
};

/// Mode number of taiko charts.
pub const MODE_TAIKO: u32 = 5;

/// Top-level object of a Malody chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalodyChart {
    /// Chart metadata.
    pub meta: Meta,
    /// Tempo changes.
    pub time: Vec<TimeEntry>,
    /// Scroll effects. Always empty in converted charts.
    #[serde(default)]
    pub effect: Vec<serde_json::Value>,
    /// The music note followed by playable notes.
    pub note: Vec<Note>,
}

/// Header metadata of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Format version.
    #[serde(rename = "$ver")]
    pub ver: u32,
    /// Chart author.
    pub creator: String,
    /// Background image file name.
    pub background: String,
    /// Difficulty name.
    pub version: String,
    /// Chart id on the Malody server, 0 if not uploaded.
    pub id: u64,
    /// Game mode, [`MODE_TAIKO`] here.
    pub mode: u32,
    /// Creation time in unix seconds.
    pub time: u64,
    /// Song information.
    pub song: Song,
    /// Mode-specific settings.
    pub mode_ext: ModeExt,
}

/// Song information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Displayed title.
    pub title: String,
    /// Artist.
    pub artist: String,
    /// Song id on the Malody server, 0 if not uploaded.
    pub id: u64,
    /// Title in the original language.
    pub titleorg: String,
}

/// Taiko mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeExt {
    /// Beat where bar lines start.
    pub bar_begin: i64,
}

/// A tempo change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Where the tempo starts.
    pub beat: BeatPosition,
    /// Beats per minute.
    pub bpm: f64,
}

/// A note of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Note {
    /// The music to play.
    Sound(SoundNote),
    /// A note to hit.
    Hit(HitNote),
}

/// Note that starts the music.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundNote {
    /// Position, where the music is aligned to.
    pub beat: BeatPosition,
    /// Music file name, relative to the chart.
    pub sound: String,
    /// Volume in percentage.
    pub vol: u32,
    /// Music offset in milliseconds.
    pub offset: i64,
    /// Sound note type, 1 for the main music.
    #[serde(rename = "type")]
    pub kind: u32,
}

/// Note to hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitNote {
    /// Position.
    pub beat: BeatPosition,
    /// Lane. Taiko charts use a single lane.
    pub column: u32,
    /// Note style, see [`style_of`].
    pub style: u32,
}

/// Taiko note style of `tone`: 0 for a red note, 2 for a blue note.
#[must_use]
pub const fn style_of(tone: Tone) -> u32 {
    match tone {
        Tone::Red => 0,
        Tone::Blue => 2,
    }
}

/// Metadata written into the output chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMetadata {
    /// Displayed title.
    pub title: String,
    /// Title in the original language.
    pub title_org: String,
    /// Artist.
    pub artist: String,
    /// Chart author.
    pub creator: String,
    /// Music file name, as stored next to the chart.
    pub music_file: String,
    /// Music volume in percentage.
    pub volume: f64,
    /// Music offset in milliseconds.
    pub offset: f64,
    /// Creation time in unix seconds.
    pub created_at: u64,
}

impl ChartMetadata {
    /// Metadata taken from the ADOFAI settings, with creation time 0.
    #[must_use]
    pub fn from_settings(settings: &Settings, music_file: impl Into<String>) -> Self {
        Self {
            title: settings.song.clone(),
            title_org: settings.song.clone(),
            artist: settings.artist.clone(),
            creator: settings.author.clone(),
            music_file: music_file.into(),
            volume: settings.volume,
            offset: settings.offset,
            created_at: 0,
        }
    }
}

/// Builds the Malody taiko chart for `timeline`.
#[must_use]
pub fn build_malody(timeline: &Timeline, metadata: &ChartMetadata) -> MalodyChart {
    let sound = Note::Sound(SoundNote {
        beat: BeatPosition::origin(),
        sound: metadata.music_file.clone(),
        vol: metadata.volume.round().max(0.0) as u32,
        offset: metadata.offset.round() as i64,
        kind: 1,
    });
    let hits = timeline.beats.iter().enumerate().map(|(index, beat)| {
        Note::Hit(HitNote {
            beat: beat.clone(),
            column: 0,
            style: style_of(timeline.tones.tone_at(index)),
        })
    });
    let note = std::iter::once(sound).chain(hits).collect();

    let time = timeline
        .tempo
        .iter()
        .map(|segment| TimeEntry {
            beat: segment.start.clone(),
            bpm: segment.bpm_f64(),
        })
        .collect();

    MalodyChart {
        meta: Meta {
            ver: 0,
            creator: metadata.creator.clone(),
            background: String::new(),
            version: String::new(),
            id: 0,
            mode: MODE_TAIKO,
            time: metadata.created_at,
            song: Song {
                title: metadata.title.clone(),
                artist: metadata.artist.clone(),
                id: 0,
                titleorg: metadata.title_org.clone(),
            },
            mode_ext: ModeExt { bar_begin: 0 },
        },
        time,
        effect: Vec::new(),
        note,
    }
}

impl MalodyChart {
    /// Serializes the chart as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a BPM is not finite, which JSON cannot represent.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Playable notes, without the music note.
    pub fn hit_notes(&self) -> impl Iterator<Item = &HitNote> {
        self.note.iter().filter_map(|note| match note {
            Note::Hit(hit) => Some(hit),
            Note::Sound(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        math::ratio,
        timeline::{beat::TempoSegment, tone::ToneMap},
    };

    fn metadata() -> ChartMetadata {
        ChartMetadata {
            title: "Title".into(),
            title_org: "Original".into(),
            artist: "Artist".into(),
            creator: "Creator".into(),
            music_file: "song.ogg".into(),
            volume: 80.0,
            offset: -12.4,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn builds_notes_with_tones() {
        let mut tones = ToneMap::default();
        tones.record(1, Tone::Blue);
        let timeline = Timeline {
            beats: vec![
                BeatPosition::new(0, 0, 1).unwrap(),
                BeatPosition::new(0, 1, 2).unwrap(),
                BeatPosition::new(1, 0, 1).unwrap(),
            ],
            tempo: vec![TempoSegment {
                start: BeatPosition::origin(),
                bpm: ratio(120, 1),
            }],
            tones,
        };
        let chart = build_malody(&timeline, &metadata());

        assert_eq!(chart.note.len(), 4);
        assert_eq!(
            chart.note[0],
            Note::Sound(SoundNote {
                beat: BeatPosition::origin(),
                sound: "song.ogg".into(),
                vol: 80,
                offset: -12,
                kind: 1,
            })
        );
        let styles: Vec<_> = chart.hit_notes().map(|hit| hit.style).collect();
        assert_eq!(styles, vec![0, 2, 2]);
        assert!(chart.hit_notes().all(|hit| hit.column == 0));
        assert_eq!(
            chart.time,
            vec![TimeEntry {
                beat: BeatPosition::origin(),
                bpm: 120.0
            }]
        );
        assert_eq!(chart.meta.mode, MODE_TAIKO);
        assert_eq!(chart.meta.song.titleorg, "Original");
    }

    #[test]
    fn json_layout() {
        let timeline = Timeline {
            beats: vec![BeatPosition::new(2, 1, 4).unwrap()],
            tempo: vec![TempoSegment {
                start: BeatPosition::origin(),
                bpm: ratio(375, 2),
            }],
            tones: ToneMap::default(),
        };
        let json = build_malody(&timeline, &metadata()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "meta": {
                    "$ver": 0,
                    "creator": "Creator",
                    "background": "",
                    "version": "",
                    "id": 0,
                    "mode": 5,
                    "time": 1_700_000_000u64,
                    "song": { "title": "Title", "artist": "Artist", "id": 0, "titleorg": "Original" },
                    "mode_ext": { "bar_begin": 0 }
                },
                "time": [ { "beat": [0, 0, 1], "bpm": 187.5 } ],
                "effect": [],
                "note": [
                    { "beat": [0, 0, 1], "sound": "song.ogg", "vol": 80, "offset": -12, "type": 1 },
                    { "beat": [2, 1, 4], "column": 0, "style": 0 }
                ]
            })
        );
        let parsed: MalodyChart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.hit_notes().count(), 1);
    }
}
