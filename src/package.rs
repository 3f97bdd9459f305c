//! Packing a chart and its music into a Malody `.mcz` archive.
//!
//! An `.mcz` file is a zip archive. This writer stores exactly two entries: the chart text and the
//! music file, both at the archive root under their own names. The chart text is written from
//! memory and the music is streamed from its source, so no temporary files are created. If writing
//! fails, the incomplete archive is removed.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use zip::{CompressionMethod, ZipWriter, result::ZipError, write::SimpleFileOptions};

/// An error occurred while writing an archive.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackagingError {
    /// The music file does not exist or cannot be read.
    #[error("cannot read music file `{}`, check that it exists: {source}", path.display())]
    MusicUnreadable {
        /// Path of the music file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The music path has no file name to store it under.
    #[error("music path `{}` has no file name", path.display())]
    MusicWithoutName {
        /// Path of the music file.
        path: PathBuf,
    },
    /// The archive cannot be written.
    #[error("cannot write archive `{}`, check the free storage space: {source}", path.display())]
    ArchiveUnwritable {
        /// Path of the archive.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The zip encoder failed.
    #[error("cannot encode archive `{}`: {source}", path.display())]
    Zip {
        /// Path of the archive.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: ZipError,
    },
}

/// Chart name stored in the archive for the archive at `archive`: its stem with the `.mc`
/// extension.
#[must_use]
pub fn chart_entry_name(archive: &Path) -> String {
    let stem = archive
        .file_stem()
        .map_or_else(|| "chart".into(), |stem| stem.to_string_lossy());
    format!("{stem}.mc")
}

/// Writes an `.mcz` archive at `archive` containing `chart_json` (named after the archive, see
/// [`chart_entry_name`]) and the file at `music`.
///
/// # Errors
///
/// Returns [`PackagingError`] if the music cannot be read or the archive cannot be written. In
/// both cases no archive is left at `archive`.
pub fn write_mcz(archive: &Path, chart_json: &str, music: &Path) -> Result<(), PackagingError> {
    let music_name = music
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PackagingError::MusicWithoutName {
            path: music.to_path_buf(),
        })?;
    let music_file = File::open(music).map_err(|source| PackagingError::MusicUnreadable {
        path: music.to_path_buf(),
        source,
    })?;

    let file = File::create(archive).map_err(|source| PackagingError::ArchiveUnwritable {
        path: archive.to_path_buf(),
        source,
    })?;
    let result = write_entries(file, archive, chart_json, &music_name, music_file);
    if result.is_err()
        && let Err(err) = fs::remove_file(archive)
    {
        log::warn!(
            "cannot remove incomplete archive `{}`: {err}",
            archive.display()
        );
    }
    result
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn write_entries(
    file: File,
    archive: &Path,
    chart_json: &str,
    music_name: &str,
    music_file: File,
) -> Result<(), PackagingError> {
    let unwritable = |source: io::Error| PackagingError::ArchiveUnwritable {
        path: archive.to_path_buf(),
        source,
    };
    let zip_error = |source: ZipError| PackagingError::Zip {
        path: archive.to_path_buf(),
        source,
    };

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let chart_name = chart_entry_name(archive);
    zip.start_file(chart_name.as_str(), entry_options())
        .map_err(zip_error)?;
    zip.write_all(chart_json.as_bytes()).map_err(unwritable)?;
    log::debug!("stored `{chart_name}` ({} bytes)", chart_json.len());

    zip.start_file(music_name, entry_options()).map_err(zip_error)?;
    let copied = io::copy(&mut BufReader::new(music_file), &mut zip).map_err(unwritable)?;
    log::debug!("stored `{music_name}` ({copied} bytes)");

    let mut writer = zip.finish().map_err(zip_error)?;
    writer.flush().map_err(unwritable)?;
    Ok(())
}
