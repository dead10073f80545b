//! Literal text → `num` / `literal` segments
//!
//! A two-state scanner: while in [`State::Literal`] it looks for the start of
//! a numeric token, in [`State::Number`] it consumes `-?digits(.digits)?`.

use crate::log::trace;
use crate::session::Session;
use crate::types::ensure_finite;

use super::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Accumulating non-numeric text since `start`
    Literal { start: usize },
    /// Inside a numeric token that began at `start`
    Number { start: usize, seen_dot: bool },
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Strip a leading `,[[...` and a trailing `...]],`
fn strip_outer_brackets(text: &str) -> &str {
    let lead = text.strip_prefix(',').unwrap_or(text);
    let text = if lead.starts_with('[') {
        lead.trim_start_matches('[')
    } else {
        text
    };

    let trail = text.strip_suffix(',').unwrap_or(text);
    if trail.ends_with(']') {
        trail.trim_end_matches(']')
    } else {
        text
    }
}

/// Whether a numeric token starts at `i`, given that unconsumed text begins
/// at `floor`.
fn number_starts_at(bytes: &[u8], i: usize, floor: usize) -> bool {
    match bytes[i] {
        b'-' => bytes.get(i + 1).is_some_and(u8::is_ascii_digit),
        b if b.is_ascii_digit() => i == floor || !is_word(bytes[i - 1]),
        _ => false,
    }
}

fn push_literal(out: &mut Vec<Segment>, session: &mut Session, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(Segment::literal(session, text));
    }
}

/// Value of a scanned token, `None` when it overflows `f64`
fn scan_value(text: &str) -> Option<f64> {
    let value: f64 = text
        .parse()
        .unwrap_or_else(|_| unreachable!("scanner accepted non-numeric token {text:?}"));
    let finite = ensure_finite(value).ok();
    if finite.is_none() {
        trace!(digits = text.len(), "numeric token overflows, keeping it as literal");
    }
    finite
}

/// Split literal text into numbers and the literal text between them.
///
/// Segment order follows the source; every numeric token appears exactly once.
pub fn tokenize(session: &mut Session, text: &str) -> Vec<Segment> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let src = strip_outer_brackets(&compact);
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut state = State::Literal { start: 0 };
    let mut i = 0;

    while i < bytes.len() {
        match state {
            State::Literal { start } => {
                if number_starts_at(bytes, i, start) {
                    push_literal(&mut out, session, &src[start..i]);
                    state = State::Number {
                        start: i,
                        seen_dot: false,
                    };
                }
                i += 1;
            }
            State::Number { start, seen_dot } => {
                let b = bytes[i];
                let fraction_follows = !seen_dot
                    && b == b'.'
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
                if b.is_ascii_digit() {
                    i += 1;
                } else if fraction_follows {
                    state = State::Number {
                        start,
                        seen_dot: true,
                    };
                    i += 1;
                } else if let Some(value) = scan_value(&src[start..i]) {
                    out.push(Segment::num(session, value));
                    // re-examine this byte as the first of a literal run
                    state = State::Literal { start: i };
                } else {
                    // the digits become the head of the next literal
                    state = State::Literal { start };
                }
            }
        }
    }

    match state {
        State::Literal { start } => push_literal(&mut out, session, &src[start..]),
        State::Number { start, .. } => match scan_value(&src[start..]) {
            Some(value) => out.push(Segment::num(session, value)),
            None => push_literal(&mut out, session, &src[start..]),
        },
    }

    trace!(input = text, segments = out.len(), "tokenized literal");
    out
}
