//! Fancy diagnostics of chart parse errors using `ariadne`.
//!
//! `serde_json` reports where it failed as a line and a column. This module turns that position
//! into a byte span and renders it against the chart text.
//!
//! The position refers to the text after [`relax_json`], so the report shows that text. It differs
//! from the file only around repaired trailing commas.
//!
//! # Usage Example
//!
//! ```rust
//! use adofai_taiko::{adofai::parse_adofai, diagnostics::emit_parse_error};
//!
//! let source = "{\"angleData\": [0, 90,, 180], \"settings\": {\"bpm\": 120}}";
//! if let Err(err) = parse_adofai(source) {
//!     emit_parse_error("level.adofai", source, &err);
//! }
//! ```

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::adofai::{ParseError, relax::relax_json};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use adofai_taiko::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("level.adofai", "{}");
/// assert_eq!(source.name(), "level.adofai");
/// assert_eq!(source.text(), "{}");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Byte span of the character at 1-based `line` and `column`, clamped to the text.
    ///
    /// Columns count bytes, as `serde_json` does.
    #[must_use]
    pub fn span_at(&self, line: usize, column: usize) -> Range<usize> {
        let line_start: usize = self
            .text
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let start = (line_start + column.saturating_sub(1)).min(self.text.len());
        let end = self
            .text
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(start, |c| start + c.len_utf8());
        start..end
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Converts the error to a report against `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

impl ToAriadne for ParseError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let (range, label) = match (self, self.line_column()) {
            (Self::Json { source, .. }, Some((line, column))) => {
                (src.span_at(line, column), source.to_string())
            }
            (Self::InvalidAngle { .. }, _) => (0..0, "in `angleData`".to_string()),
            _ => (0..0, "in this chart".to_string()),
        };
        build_report(src, ReportKind::Error, range, &self.to_string(), label, Color::Red)
    }
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_config(Config::new().with_index_type(IndexType::Byte))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

/// Renders `err` against the chart text `source` to standard error.
pub fn emit_parse_error(name: &str, source: &str, err: &ParseError) {
    let relaxed = relax_json(source);
    let simple = SimpleSource::new(name, &relaxed);
    let report = err.to_report(&simple);
    if let Err(print_err) = report.print((name.to_string(), Source::from(&*relaxed))) {
        log::warn!("cannot print diagnostic: {print_err}");
    }
}

/// Builds the report of `err` without printing it.
#[must_use]
pub fn parse_error_report<'a>(
    name: &'a str,
    relaxed_source: &'a str,
    err: &ParseError,
) -> Report<'a, (String, Range<usize>)> {
    err.to_report(&SimpleSource::new(name, relaxed_source))
}
