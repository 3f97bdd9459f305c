//! Converter from ADOFAI angle-path charts into Malody taiko charts.
//!
//! An ADOFAI chart is a path of tiles, each pointing in some direction. The time between two tiles
//! is the angle the planet sweeps from one tile to the next: a half turn (180°) is one beat. This
//! crate walks that path with exact rational arithmetic and produces a Malody chart in taiko mode,
//! where every tile becomes a note on a single drum lane.
//!
//! The conversion consists of these phases:
//!
//! - [`adofai`] parses the chart text into tile angles and raw actions,
//! - [`timeline`] indexes the actions by floor, converts angles into beat positions and derives
//!   the tempo track and the red/blue tone changes,
//! - [`malody`] builds the output chart structure,
//! - [`package`] writes the `.mcz` archive with the chart and its music file.
//!
//! [`convert`] runs all phases at once and is what front ends should call.
//!
//! # Example
//!
//! ```rust
//! use adofai_taiko::{adofai::parse_adofai, config::ConversionConfig, timeline::convert_timeline};
//!
//! let source = r#"{
//!     "angleData": [0, 0, 0, 0],
//!     "settings": { "song": "Test", "artist": "Someone", "author": "Me", "bpm": 100 },
//!     "actions": []
//! }"#;
//! let chart = parse_adofai(source).unwrap();
//! let timeline = convert_timeline(&chart, &ConversionConfig::default()).unwrap();
//! assert_eq!(timeline.beats.len(), 4);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adofai;
pub mod config;
pub mod convert;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod error;
pub mod malody;
pub mod math;
pub mod package;
pub mod rng;
pub mod timeline;

pub use self::error::{ConvertError, Result};
