//! Keyword highlighting for matched cells
//!
//! Splits a cell's text into plain and matched segments so each presentation
//! layer can decide how a match looks. Matching is literal, global, and
//! case-insensitive; the search term is escaped before compilation so regex
//! metacharacters in user input (`A.B`, `C++`, `[x]`) match only themselves.

use regex::RegexBuilder;
use serde_json::Value;

use crate::response::cell_text;

/// One run of cell text, either inside or outside a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

/// Split a cell value into highlight segments for a search term
///
/// Concatenating the returned segments always reproduces the stringified
/// value exactly; only the `is_match` flags carry information.
pub fn highlight(value: &Value, term: &str) -> Vec<Segment> {
    highlight_text(&cell_text(value), term)
}

/// Split plain text into highlight segments for a search term
///
/// An empty term yields a single unmarked segment.
pub fn highlight_text(text: &str, term: &str) -> Vec<Segment> {
    if term.is_empty() {
        return vec![Segment {
            text: text.to_string(),
            is_match: false,
        }];
    }

    // regex::escape guarantees the pattern is a valid literal, but fall back
    // to unhighlighted text rather than panic if compilation ever fails
    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => {
            return vec![Segment {
                text: text.to_string(),
                is_match: false,
            }];
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() > last {
            segments.push(Segment {
                text: text[last..m.start()].to_string(),
                is_match: false,
            });
        }
        segments.push(Segment {
            text: m.as_str().to_string(),
            is_match: true,
        });
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment {
            text: text[last..].to_string(),
            is_match: false,
        });
    }

    segments
}

/// Render segments for a terminal, marking matches with reverse video
pub fn render_ansi(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.is_match {
            out.push_str("\x1b[7m");
            out.push_str(&segment.text);
            out.push_str("\x1b[27m");
        } else {
            out.push_str(&segment.text);
        }
    }
    out
}
