#![cfg(feature = "diagnostics")]

use adofai_taiko::{
    adofai::{ParseError, parse_adofai, relax::relax_json},
    diagnostics::{SimpleSource, emit_parse_error, parse_error_report},
};

#[test]
fn broken_chart_points_at_the_extra_comma() {
    let source = include_str!("files/broken.adofai");
    let err = parse_adofai(source).unwrap_err();
    let Some((line, column)) = err.line_column() else {
        panic!("expected a positioned error, got {err:?}");
    };
    let relaxed = relax_json(source);
    let span = SimpleSource::new("broken.adofai", &relaxed).span_at(line, column);
    assert_eq!(&relaxed[span], ",");

    let _report = parse_error_report("broken.adofai", &relaxed, &err);
    emit_parse_error("broken.adofai", source, &err);
}

#[test]
fn errors_without_position_still_render() {
    let source = r#"{"settings": {"bpm": 120}}"#;
    let err = parse_adofai(source).unwrap_err();
    assert!(matches!(err, ParseError::MissingPath));
    assert_eq!(err.line_column(), None);
    emit_parse_error("empty.adofai", source, &err);
}
