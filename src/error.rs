//! Errors of a whole conversion, as seen by a front end.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{adofai::ParseError, package::PackagingError, timeline::ConversionError};

/// An input the user has not supplied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum MissingInputError {
    /// No chart file was given.
    #[error("no chart selected")]
    Chart,
    /// No music file was given.
    #[error("no music selected")]
    Music,
}

/// Any error which stops a conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The chart file cannot be read.
    #[error("cannot read chart `{}`: {source}", path.display())]
    ReadChart {
        /// Path of the chart.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The chart text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A required input is missing.
    #[error(transparent)]
    MissingInput(#[from] MissingInputError),
    /// The chart cannot be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The converted chart cannot be serialized.
    #[error("cannot serialize chart: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The archive cannot be written.
    #[error(transparent)]
    Packaging(#[from] PackagingError),
}

impl ConvertError {
    /// A message suitable for showing to the user who started the conversion.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ReadChart { .. } => format!("{self}. Check that the chart file exists."),
            Self::Parse(err) => match err.line_column() {
                Some((line, column)) => {
                    format!("The chart could not be read at line {line}, column {column}: {err}")
                }
                None => format!("The chart could not be read: {err}"),
            },
            Self::MissingInput(MissingInputError::Chart) => "Please select a chart file.".into(),
            Self::MissingInput(MissingInputError::Music) => "Please select a music file.".into(),
            Self::Conversion(err) => format!("The chart could not be converted: {err}"),
            Self::Serialize(err) => format!("The converted chart could not be written: {err}"),
            Self::Packaging(err) => format!("Packaging failed: {err}"),
        }
    }
}

/// Result of a conversion.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
