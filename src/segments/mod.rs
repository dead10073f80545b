//! Segment pipeline - incremental parsing of in-progress coordinate text
//!
//! The editor keeps a list of [`Segment`]s. Committing a literal tokenizes it,
//! splices the tokens in its place and folds the whole list bottom-up:
//! numbers → tuples → polygon rings → multigons. Every operation returns a new
//! list and leaves its input untouched.

mod fold;
mod tokenize;

use std::fmt;

use crate::log::debug;
use crate::session::{SegmentKey, Session};
use crate::shapes::Shape;
use crate::types::{CoordPair, Ring, write_ring, write_rings};

pub use fold::{fold_multigons, fold_rings, fold_tuples, reduce};
pub use tokenize::tokenize;

/// Payload of a segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentValue {
    /// Unparsed or rejected text, editable
    Literal(String),
    /// A single number
    Num(f64),
    /// Two numbers joined by the pair separator
    Tuple(CoordPair),
    /// Three or more adjacent tuples
    Polygon(Ring),
    /// One or more adjacent polygons
    Multigon(Vec<Ring>),
}

/// One typed fragment of in-progress coordinate text
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub key: SegmentKey,
    pub value: SegmentValue,
}

impl Segment {
    pub fn literal(session: &mut Session, text: impl Into<String>) -> Self {
        Segment {
            key: session.segment_key(),
            value: SegmentValue::Literal(text.into()),
        }
    }

    pub fn num(session: &mut Session, value: f64) -> Self {
        Segment {
            key: session.segment_key(),
            value: SegmentValue::Num(value),
        }
    }

    pub fn tuple(session: &mut Session, pt: CoordPair) -> Self {
        Segment {
            key: session.segment_key(),
            value: SegmentValue::Tuple(pt),
        }
    }

    pub fn polygon(session: &mut Session, ring: Ring) -> Self {
        Segment {
            key: session.segment_key(),
            value: SegmentValue::Polygon(ring),
        }
    }

    pub fn multigon(session: &mut Session, rings: Vec<Ring>) -> Self {
        Segment {
            key: session.segment_key(),
            value: SegmentValue::Multigon(rings),
        }
    }

    /// Literal text, if this segment is still editable
    pub fn as_literal(&self) -> Option<&str> {
        match &self.value {
            SegmentValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.value, SegmentValue::Literal(_))
    }

    /// Whether [`shapes_from_segments`] would produce a shape for this segment
    pub fn is_extractable(&self) -> bool {
        matches!(
            self.value,
            SegmentValue::Tuple(_) | SegmentValue::Polygon(_) | SegmentValue::Multigon(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self.value {
            SegmentValue::Literal(_) => "literal",
            SegmentValue::Num(_) => "num",
            SegmentValue::Tuple(_) => "tuple",
            SegmentValue::Polygon(_) => "polygon",
            SegmentValue::Multigon(_) => "multigon",
        }
    }
}

/// Machine-readable encoding of the value; literals print verbatim
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            SegmentValue::Literal(s) => f.write_str(s),
            SegmentValue::Num(n) => write!(f, "{n}"),
            SegmentValue::Tuple(pt) => write!(f, "{pt}"),
            SegmentValue::Polygon(ring) => write_ring(f, ring),
            SegmentValue::Multigon(rings) => write_rings(f, rings),
        }
    }
}

/// The starting state: one empty literal
pub fn initial_segments(session: &mut Session) -> Vec<Segment> {
    vec![Segment::literal(session, "")]
}

/// Tokenize the literal with `key` and fold the whole list.
///
/// A missing key or a non-literal segment leaves the list as it was.
pub fn parse(session: &mut Session, segments: &[Segment], key: SegmentKey) -> Vec<Segment> {
    let Some(idx) = segments.iter().position(|s| s.key == key) else {
        return segments.to_vec();
    };
    let Some(text) = segments[idx].as_literal() else {
        return segments.to_vec();
    };

    let tokens = tokenize(session, text);
    debug!(%key, tokens = tokens.len(), "parsing literal segment");

    let mut spliced = Vec::with_capacity(segments.len() + tokens.len());
    spliced.extend_from_slice(&segments[..idx]);
    spliced.extend(tokens);
    spliced.extend_from_slice(&segments[idx + 1..]);

    reduce(session, spliced)
}

/// Materialize every tuple, polygon and multigon as a shape.
///
/// `color` overrides the palette for every produced shape.
pub fn shapes_from_segments(
    session: &mut Session,
    segments: &[Segment],
    color: Option<&str>,
) -> Vec<Shape> {
    segments
        .iter()
        .filter_map(|seg| match &seg.value {
            SegmentValue::Tuple(pt) => Some(Shape::Mark(session.create_mark(*pt, color))),
            SegmentValue::Polygon(ring) => {
                Some(Shape::Poly(session.create_poly(vec![ring.clone()], color)))
            }
            SegmentValue::Multigon(rings) => {
                Some(Shape::Poly(session.create_poly(rings.clone(), color)))
            }
            SegmentValue::Literal(_) | SegmentValue::Num(_) => None,
        })
        .collect()
}

/// Whether any segment would become a shape; allocates nothing.
pub fn has_extractable_shapes(segments: &[Segment]) -> bool {
    segments.iter().any(Segment::is_extractable)
}

/// Replace the text of the literal with `key`.
pub fn update_literal(segments: &[Segment], key: SegmentKey, text: &str) -> Vec<Segment> {
    segments
        .iter()
        .map(|seg| match &seg.value {
            SegmentValue::Literal(_) if seg.key == key => Segment {
                key,
                value: SegmentValue::Literal(text.to_string()),
            },
            _ => seg.clone(),
        })
        .collect()
}

/// Turn a folded segment back into an editable literal holding its encoding.
pub fn allow_edit(segments: &[Segment], key: SegmentKey) -> Vec<Segment> {
    segments
        .iter()
        .map(|seg| {
            if seg.key != key || seg.is_literal() {
                return seg.clone();
            }
            Segment {
                key,
                value: SegmentValue::Literal(seg.to_string()),
            }
        })
        .collect()
}

/// Drop the segment with `key`; nothing is re-folded.
pub fn remove_segment(segments: &[Segment], key: SegmentKey) -> Vec<Segment> {
    segments.iter().filter(|s| s.key != key).cloned().collect()
}
