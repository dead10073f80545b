//! Bottom-up reduction passes over a segment list
//!
//! Each fold is one left-to-right pass with a window of at most two segments
//! behind and one ahead. No pass backtracks, so reducing a list is linear.

use crate::defaults::{MIN_RING_POINTS, PAIR_SEPARATOR, POINT_SEPARATOR, POLYGON_SEPARATOR};
use crate::log::{debug, trace};
use crate::session::Session;
use crate::types::{CoordPair, Ring};

use super::{Segment, SegmentValue, initial_segments};

/// `num`, `,`, `num` at the end of the output so far.
///
/// Looking at the output rather than the input keeps an already folded tuple
/// from lending its second number to the next pair: `1,2,3` is `[1,2] , 3`.
/// Non-finite numbers never pair up.
fn pair_at_end(out: &[Segment]) -> Option<CoordPair> {
    let [.., first, sep, second] = out else {
        return None;
    };
    match (&first.value, sep.as_literal(), &second.value) {
        (SegmentValue::Num(lat), Some(PAIR_SEPARATOR), SegmentValue::Num(lng)) => {
            CoordPair::try_new(*lat, *lng).ok()
        }
        _ => None,
    }
}

/// Strip bracket noise from literals at either end of the list
fn trim_boundary_literals(out: &mut Vec<Segment>) {
    let drop_first = match out.first_mut() {
        Some(Segment {
            value: SegmentValue::Literal(text),
            ..
        }) => {
            let s = text.as_str();
            let trimmed = s.strip_prefix(',').unwrap_or(s).trim_start_matches('[');
            *text = trimmed.to_string();
            text.is_empty()
        }
        _ => false,
    };
    if drop_first {
        out.remove(0);
    }

    let drop_last = match out.last_mut() {
        Some(Segment {
            value: SegmentValue::Literal(text),
            ..
        }) => {
            let s = text.as_str();
            let trimmed = s.strip_suffix(',').unwrap_or(s).trim_end_matches(']');
            *text = trimmed.to_string();
            text.is_empty()
        }
        _ => false,
    };
    if drop_last {
        out.pop();
    }
}

/// Fold `num , num` into tuples and drop leftover point separators.
///
/// The result may be empty; [`reduce`] substitutes the initial state then.
pub fn fold_tuples(session: &mut Session, segments: Vec<Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        out.push(seg);
        if let Some(pt) = pair_at_end(&out) {
            out.truncate(out.len() - 3);
            out.push(Segment::tuple(session, pt));
        }
    }

    out.retain(|s| s.as_literal() != Some(POINT_SEPARATOR));
    trim_boundary_literals(&mut out);
    out
}

fn is_tuple(seg: Option<&Segment>) -> bool {
    matches!(
        seg,
        Some(Segment {
            value: SegmentValue::Tuple(_),
            ..
        })
    )
}

fn is_polygon(seg: Option<&Segment>) -> bool {
    matches!(
        seg,
        Some(Segment {
            value: SegmentValue::Polygon(_),
            ..
        })
    )
}

/// Fold runs of at least [`MIN_RING_POINTS`] tuples into polygons.
///
/// The literal right after a folded run is the ring separator and is consumed.
/// Empty literals are removed.
pub fn fold_rings(session: &mut Session, segments: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    let mut run: Vec<Segment> = Vec::new();
    let mut consume_separator = false;
    let mut iter = segments.into_iter().peekable();

    while let Some(seg) = iter.next() {
        if std::mem::take(&mut consume_separator) && seg.is_literal() {
            if seg.as_literal() != Some(POLYGON_SEPARATOR) {
                trace!(separator = %seg, "consumed irregular ring separator");
            }
            continue;
        }
        if !matches!(seg.value, SegmentValue::Tuple(_)) {
            out.push(seg);
            continue;
        }

        run.push(seg);
        if is_tuple(iter.peek()) {
            continue;
        }

        if run.len() >= MIN_RING_POINTS {
            let ring: Ring = run
                .drain(..)
                .filter_map(|s| match s.value {
                    SegmentValue::Tuple(pt) => Some(pt),
                    _ => None,
                })
                .collect();
            debug!(points = ring.len(), "folded tuples into polygon");
            out.push(Segment::polygon(session, ring));
            consume_separator = true;
        } else {
            out.append(&mut run);
        }
    }

    out.retain(|s| s.as_literal() != Some(""));
    out
}

/// Fold every run of adjacent polygons, even a run of one, into a multigon.
pub fn fold_multigons(session: &mut Session, segments: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    let mut rings: Vec<Ring> = Vec::new();
    let mut iter = segments.into_iter().peekable();

    while let Some(seg) = iter.next() {
        let ring = match seg.value {
            SegmentValue::Polygon(ring) => ring,
            value => {
                out.push(Segment {
                    key: seg.key,
                    value,
                });
                continue;
            }
        };

        rings.push(ring);
        if !is_polygon(iter.peek()) {
            debug!(rings = rings.len(), "folded polygons into multigon");
            out.push(Segment::multigon(session, std::mem::take(&mut rings)));
        }
    }

    out
}

/// Run the three folds in order, falling back to the initial state whenever a
/// pass leaves nothing.
pub fn reduce(session: &mut Session, segments: Vec<Segment>) -> Vec<Segment> {
    let tuples = fold_tuples(session, segments);
    if tuples.is_empty() {
        return initial_segments(session);
    }
    let rings = fold_rings(session, tuples);
    if rings.is_empty() {
        return initial_segments(session);
    }
    let multigons = fold_multigons(session, rings);
    if multigons.is_empty() {
        return initial_segments(session);
    }
    multigons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::tokenize;

    fn encode(segs: &[Segment]) -> Vec<String> {
        segs.iter().map(ToString::to_string).collect()
    }

    fn kinds(segs: &[Segment]) -> Vec<&'static str> {
        segs.iter().map(Segment::kind).collect()
    }

    fn tuples_of(session: &mut Session, text: &str) -> Vec<Segment> {
        let tokens = tokenize(session, text);
        fold_tuples(session, tokens)
    }

    #[test]
    fn tuple_fold_preserves_order() {
        let mut session = Session::new();
        let out = tuples_of(&mut session, "[1,2],[3,4],[5,6]");
        assert_eq!(encode(&out), ["[1,2]", "[3,4]", "[5,6]"]);
        assert_eq!(kinds(&out), ["tuple", "tuple", "tuple"]);
    }

    #[test]
    fn ring_fold_keeps_point_order() {
        let mut session = Session::new();
        let tuples = tuples_of(&mut session, "[1,2],[3,4],[5,6]");
        let out = fold_rings(&mut session, tuples);
        assert_eq!(kinds(&out), ["polygon"]);
        assert_eq!(
            out[0].value,
            SegmentValue::Polygon(vec![
                CoordPair::new(1.0, 2.0),
                CoordPair::new(3.0, 4.0),
                CoordPair::new(5.0, 6.0),
            ])
        );
    }

    #[test]
    fn two_points_stay_tuples() {
        let mut session = Session::new();
        let tokens = tokenize(&mut session, "[1,2],[3,4]");
        let out = reduce(&mut session, tokens);
        assert_eq!(kinds(&out), ["tuple", "tuple"]);
    }

    #[test]
    fn numbers_are_not_consumed_twice() {
        let mut session = Session::new();
        let out = tuples_of(&mut session, "1,2,3");
        assert_eq!(encode(&out), ["[1,2]", ",", "3"]);
    }

    #[test]
    fn non_finite_numbers_do_not_pair() {
        let mut session = Session::new();
        let segs = vec![
            Segment::num(&mut session, f64::INFINITY),
            Segment::literal(&mut session, ","),
            Segment::num(&mut session, 2.0),
        ];
        let out = fold_tuples(&mut session, segs.clone());
        assert_eq!(out, segs);
    }

    #[test]
    fn overflowing_coordinate_is_not_folded() {
        let mut session = Session::new();
        let huge = format!("1{}", "0".repeat(400));
        let tokens = tokenize(&mut session, &format!("[{huge},2],[3,4]"));
        let out = reduce(&mut session, tokens);
        assert_eq!(kinds(&out), ["literal", "num", "tuple"]);
        assert_eq!(encode(&out)[2], "[3,4]");
    }

    #[test]
    fn boundary_literals_lose_bracket_noise() {
        let mut session = Session::new();
        let segs = vec![
            Segment::literal(&mut session, ",[[abc"),
            Segment::num(&mut session, 1.0),
            Segment::literal(&mut session, "x]],"),
        ];
        let out = fold_tuples(&mut session, segs);
        assert_eq!(encode(&out), ["abc", "1", "x"]);

        let segs = vec![
            Segment::literal(&mut session, "[["),
            Segment::num(&mut session, 1.0),
            Segment::literal(&mut session, "]"),
        ];
        assert_eq!(encode(&fold_tuples(&mut session, segs)), ["1"]);
    }

    #[test]
    fn tuple_fold_can_come_up_empty() {
        let mut session = Session::new();
        let segs = vec![Segment::literal(&mut session, "],[")];
        assert!(fold_tuples(&mut session, segs).is_empty());

        let segs = vec![Segment::literal(&mut session, "],[")];
        let out = reduce(&mut session, segs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_literal(), Some(""));
    }

    #[test]
    fn ring_separator_is_consumed() {
        let mut session = Session::new();
        let text = "[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]";
        let tuples = tuples_of(&mut session, text);
        assert!(tuples.iter().any(|s| s.as_literal() == Some("]],[[")));
        let out = fold_rings(&mut session, tuples);
        assert_eq!(kinds(&out), ["polygon", "polygon"]);
    }

    #[test]
    fn literal_after_short_run_survives() {
        let mut session = Session::new();
        let segs = vec![
            Segment::tuple(&mut session, CoordPair::new(1.0, 2.0)),
            Segment::literal(&mut session, "keep"),
            Segment::tuple(&mut session, CoordPair::new(3.0, 4.0)),
        ];
        let out = fold_rings(&mut session, segs.clone());
        assert_eq!(out, segs);
    }

    #[test]
    fn single_polygon_becomes_multigon() {
        let mut session = Session::new();
        let ring = vec![CoordPair::new(0.0, 0.0); 3];
        let segs = vec![Segment::polygon(&mut session, ring.clone())];
        let out = fold_multigons(&mut session, segs);
        assert_eq!(kinds(&out), ["multigon"]);
        assert_eq!(out[0].value, SegmentValue::Multigon(vec![ring]));
    }

    #[test]
    fn multigon_runs_break_on_other_segments() {
        let mut session = Session::new();
        let ring = vec![CoordPair::new(0.0, 0.0); 3];
        let segs = vec![
            Segment::polygon(&mut session, ring.clone()),
            Segment::polygon(&mut session, ring.clone()),
            Segment::literal(&mut session, "x"),
            Segment::polygon(&mut session, ring.clone()),
        ];
        let out = fold_multigons(&mut session, segs);
        assert_eq!(kinds(&out), ["multigon", "literal", "multigon"]);
        assert_eq!(out[0].value, SegmentValue::Multigon(vec![ring.clone(), ring]));
    }

    #[test]
    fn folds_are_idempotent() {
        let mut session = Session::new();
        let text = "[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]] junk [1,2],[3,4]";
        let tuples = tuples_of(&mut session, text);

        let rings = fold_rings(&mut session, tuples);
        assert_eq!(fold_rings(&mut session, rings.clone()), rings);

        let multigons = fold_multigons(&mut session, rings);
        assert_eq!(fold_multigons(&mut session, multigons.clone()), multigons);
        assert_eq!(fold_rings(&mut session, multigons.clone()), multigons);
    }

    #[test]
    fn reduce_builds_two_ring_multigon() {
        let mut session = Session::new();
        let text = "[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]";
        let tokens = tokenize(&mut session, text);
        let out = reduce(&mut session, tokens);
        assert_eq!(kinds(&out), ["multigon"]);
        assert_eq!(
            encode(&out),
            ["[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]"]
        );
    }
}
