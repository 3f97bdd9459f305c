//! The whole conversion, from a chart file on disk to a `.mcz` archive.
//!
//! This is the boundary of the crate: it checks that every input is present, runs the phases in
//! order and reports failures as [`ConvertError`], whose [`ConvertError::user_message`] is what a
//! front end shows.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    adofai::{Settings, parse_adofai},
    config::ConversionConfig,
    error::{ConvertError, MissingInputError, Result},
    malody::{ChartMetadata, MalodyChart, build_malody},
    package::{PackagingError, write_mcz},
    rng::{RandRng, Rng},
    timeline::convert_timeline_with_rng,
};

/// Values which replace the ones in the chart settings. `None` keeps the chart's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataOverrides {
    /// Displayed title.
    pub title: Option<String>,
    /// Title in the original language.
    pub title_org: Option<String>,
    /// Artist.
    pub artist: Option<String>,
    /// Chart author.
    pub creator: Option<String>,
    /// Base BPM of the first tile.
    pub bpm: Option<f64>,
    /// Music offset in milliseconds.
    pub offset: Option<f64>,
    /// Music volume in percentage.
    pub volume: Option<f64>,
}

impl MetadataOverrides {
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(bpm) = self.bpm {
            settings.bpm = bpm;
        }
        if let Some(offset) = self.offset {
            settings.offset = offset;
        }
        if let Some(volume) = self.volume {
            settings.volume = volume;
        }
    }

    fn apply_to_metadata(&self, metadata: &mut ChartMetadata) {
        let replace = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                target.clone_from(value);
            }
        };
        replace(&mut metadata.title, &self.title);
        replace(&mut metadata.title_org, &self.title_org);
        replace(&mut metadata.artist, &self.artist);
        replace(&mut metadata.creator, &self.creator);
    }
}

/// Everything a conversion needs, as collected by a front end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionRequest {
    /// The ADOFAI chart to convert.
    pub chart: Option<PathBuf>,
    /// The music file to pack with the chart.
    pub music: Option<PathBuf>,
    /// Where to write the archive. Defaults to the chart path with the `mcz` extension.
    pub output: Option<PathBuf>,
    /// Conversion options.
    pub config: ConversionConfig,
    /// Metadata replacing the chart's own.
    pub overrides: MetadataOverrides,
}

impl ConversionRequest {
    /// The chart and music paths.
    ///
    /// # Errors
    ///
    /// Returns [`MissingInputError`] for the first input which is not given.
    pub fn inputs(&self) -> Result<(&Path, &Path), MissingInputError> {
        let chart = self.chart.as_deref().ok_or(MissingInputError::Chart)?;
        let music = self.music.as_deref().ok_or(MissingInputError::Music)?;
        Ok((chart, music))
    }

    /// Where the archive for the chart at `chart` is written.
    #[must_use]
    pub fn output_path(&self, chart: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| chart.with_extension("mcz"))
    }
}

/// Converts chart text into a Malody chart.
///
/// `music_file` is the file name the chart refers to, and `created_at` is the creation time in
/// unix seconds written into the chart.
///
/// # Errors
///
/// Returns [`ConvertError::Parse`] or [`ConvertError::Conversion`].
pub fn convert_source(
    source: &str,
    music_file: &str,
    request: &ConversionRequest,
    created_at: u64,
    rng: impl Rng,
) -> Result<MalodyChart> {
    let mut chart = parse_adofai(source)?;
    request.overrides.apply_to_settings(&mut chart.settings);

    let timeline = convert_timeline_with_rng(&chart, &request.config, rng)?;
    log::debug!(
        "converted {} tiles into {} notes and {} tempo entries",
        chart.tiles.len(),
        timeline.beats.len(),
        timeline.tempo.len()
    );

    let mut metadata = ChartMetadata::from_settings(&chart.settings, music_file);
    metadata.created_at = created_at;
    request.overrides.apply_to_metadata(&mut metadata);
    Ok(build_malody(&timeline, &metadata))
}

/// Reads and converts the chart of `request`, without writing anything.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] before touching any file if the chart or music is not
/// given, and any error of [`convert_source`] or of reading the chart.
pub fn build_chart(request: &ConversionRequest) -> Result<MalodyChart> {
    let (chart_path, music_path) = request.inputs()?;
    let music_file = music_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PackagingError::MusicWithoutName {
            path: music_path.to_path_buf(),
        })?;
    let source = fs::read_to_string(chart_path).map_err(|source| ConvertError::ReadChart {
        path: chart_path.to_path_buf(),
        source,
    })?;
    log::info!("converting `{}`", chart_path.display());
    convert_source(
        &source,
        &music_file,
        request,
        unix_now(),
        RandRng::thread_local(),
    )
}

/// Converts the chart of `request` and packs it with the music. Returns the archive path.
///
/// # Errors
///
/// Returns any error of [`build_chart`], [`ConvertError::Serialize`] or
/// [`ConvertError::Packaging`].
pub fn run(request: &ConversionRequest) -> Result<PathBuf> {
    let chart = build_chart(request)?;
    let (chart_path, music_path) = request.inputs()?;
    let archive = request.output_path(chart_path);
    let json = chart.to_json().map_err(ConvertError::Serialize)?;
    write_mcz(&archive, &json, music_path)?;
    log::info!(
        "wrote {} notes to `{}`",
        chart.hit_notes().count(),
        archive.display()
    );
    Ok(archive)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
