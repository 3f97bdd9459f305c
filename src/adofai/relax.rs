//! Narrow pre-parse normalization of chart text.
//!
//! The game writes objects such as `{"bpm": 100, "song": "x", }`, which strict JSON rejects. This
//! module removes a leading byte order mark and a comma between a closing string quote and a
//! closing brace. It is a heuristic over raw text, not an error-tolerant JSON parser: a trailing
//! comma after a number or inside an array is left alone and still fails to parse.

use std::borrow::Cow;

const BOM: char = '\u{feff}';

/// Returns `source` without a byte order mark and with `" , }` sequences rewritten as `" }`.
#[must_use]
pub fn relax_json(source: &str) -> Cow<'_, str> {
    let source = source.strip_prefix(BOM).unwrap_or(source);
    if !source.contains(',') {
        return Cow::Borrowed(source);
    }

    let mut out = String::new();
    let mut copied_until = 0;
    for (quote, _) in source.match_indices('"') {
        if quote < copied_until {
            continue;
        }
        let Some(brace_end) = trailing_comma_end(&source[quote + 1..]) else {
            continue;
        };
        out.push_str(&source[copied_until..quote]);
        out.push_str("\" }");
        copied_until = quote + 1 + brace_end;
    }

    if copied_until == 0 {
        return Cow::Borrowed(source);
    }
    out.push_str(&source[copied_until..]);
    Cow::Owned(out)
}

/// If `rest` starts with `\s*,\s*}`, returns the byte length of that match.
fn trailing_comma_end(rest: &str) -> Option<usize> {
    let after_space = rest.trim_start();
    let after_comma = after_space.strip_prefix(',')?;
    let after_space = after_comma.trim_start();
    after_space.strip_prefix('}')?;
    Some(rest.len() - after_space.len() + '}'.len_utf8())
}
