//! Command line front end of the converter.

use std::{path::PathBuf, process::ExitCode};

use adofai_taiko::{
    ConvertError,
    config::{ConversionConfig, ToneMode},
    convert::{ConversionRequest, MetadataOverrides, build_chart, run},
};
use clap::Parser;

/// Converts an ADOFAI chart into a Malody taiko chart packed with its music.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// ADOFAI chart file
    #[arg(value_name = "CHART")]
    chart: Option<PathBuf>,

    /// Music file to pack with the chart
    #[arg(short, long, value_name = "FILE")]
    music: Option<PathBuf>,

    /// Archive to write, defaults to the chart path with the `mcz` extension
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Bar where the first tile lands
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    begin_bar: i64,

    /// Register speed changes that are not powers of two as tempo changes
    #[arg(long)]
    change_bpm: bool,

    /// Tone of the sections started by speed changes: auto, red, blue or random
    #[arg(long, default_value = "auto", value_name = "MODE")]
    tone: ToneMode,

    /// Song title, defaults to the chart's
    #[arg(long)]
    title: Option<String>,

    /// Song title in the original language, defaults to the chart's title
    #[arg(long)]
    title_org: Option<String>,

    /// Artist, defaults to the chart's
    #[arg(long)]
    artist: Option<String>,

    /// Chart author, defaults to the chart's
    #[arg(long)]
    creator: Option<String>,

    /// Base BPM, defaults to the chart's
    #[arg(long)]
    bpm: Option<f64>,

    /// Music offset in milliseconds, defaults to the chart's
    #[arg(long, allow_negative_numbers = true, value_name = "MILLISECONDS")]
    offset: Option<f64>,

    /// Music volume in percentage, defaults to the chart's
    #[arg(long)]
    volume: Option<f64>,

    /// Print the Malody chart to stdout instead of writing an archive
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn into_request(self) -> (ConversionRequest, bool) {
        let request = ConversionRequest {
            chart: self.chart,
            music: self.music,
            output: self.output,
            config: ConversionConfig {
                begin_bar: self.begin_bar,
                change_bpm: self.change_bpm,
                tone_mode: self.tone,
            },
            overrides: MetadataOverrides {
                title: self.title,
                title_org: self.title_org,
                artist: self.artist,
                creator: self.creator,
                bpm: self.bpm,
                offset: self.offset,
                volume: self.volume,
            },
        };
        (request, self.json)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let (request, json) = Cli::parse().into_request();

    let result = if json {
        build_chart(&request).and_then(|chart| {
            let text = chart.to_json().map_err(ConvertError::Serialize)?;
            println!("{text}");
            Ok(())
        })
    } else {
        run(&request).map(|archive| println!("{}", archive.display()))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&request, &err);
            ExitCode::FAILURE
        }
    }
}

fn report(request: &ConversionRequest, err: &ConvertError) {
    log::debug!("conversion failed: {err:?}");
    #[cfg(feature = "diagnostics")]
    if let (ConvertError::Parse(parse_err), Some(chart)) = (err, &request.chart)
        && let Ok(source) = std::fs::read_to_string(chart)
    {
        let name = chart.display().to_string();
        adofai_taiko::diagnostics::emit_parse_error(&name, &source, parse_err);
    }
    #[cfg(not(feature = "diagnostics"))]
    let _ = request;
    eprintln!("error: {}", err.user_message());
}
