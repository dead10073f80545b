use polyscribe::segments::{self, Segment};
use polyscribe::{CoordPair, Ring, Session, Shape, ShapeOps, Sketch, shape_from_str};

/// One line per segment: kind, then its machine encoding
fn render(segs: &[Segment]) -> String {
    segs.iter()
        .map(|s| format!("{} {}", s.kind(), s))
        .collect::<Vec<_>>()
        .join("\n")
}

fn commit(session: &mut Session, text: &str) -> Vec<Segment> {
    let start = segments::initial_segments(session);
    let key = start[0].key;
    let edited = segments::update_literal(&start, key, text);
    segments::parse(session, &edited, key)
}

fn ring_text(ring: &[CoordPair]) -> String {
    ring.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn polygon_then_stray_point() {
    let mut session = Session::new();
    let out = commit(&mut session, "[[[1,2],[3,4],[5,6]]] junk [7,8]");
    insta::assert_snapshot!(render(&out), @r"
    multigon [[[1,2],[3,4],[5,6]]]
    tuple [7,8]
    ");
}

#[test]
fn digits_glued_to_words_are_not_numbers() {
    let mut session = Session::new();
    let out = commit(&mut session, "hello 1, 2 world");
    insta::assert_snapshot!(render(&out), @r"
    literal hello1,
    num 2
    literal world
    ");
}

#[test]
fn two_points_are_not_a_polygon() {
    let mut session = Session::new();
    let out = commit(&mut session, "[1,2],[3,4]");
    insta::assert_snapshot!(render(&out), @r"
    tuple [1,2]
    tuple [3,4]
    ");
}

#[test]
fn adjacent_rings_share_one_multigon() {
    let mut session = Session::new();
    let out = commit(
        &mut session,
        "[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]",
    );
    insta::assert_snapshot!(render(&out), @"multigon [[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]");
}

#[test]
fn reducing_twice_changes_nothing() {
    let mut session = Session::new();
    let once = commit(&mut session, "[[[1,2],[3,4],[5,6]]] junk [7,8], 9");
    let again = segments::reduce(&mut session, once.clone());
    assert_eq!(again, once);
}

#[test]
fn rings_round_trip_through_text() {
    let rings: Vec<Ring> = vec![
        vec![
            CoordPair::new(-1.5, 2.25),
            CoordPair::new(3.0, -4.125),
            CoordPair::new(0.5, 0.75),
        ],
        vec![
            CoordPair::new(38.8979, -77.0333),
            CoordPair::new(39.0149, -77.0444),
            CoordPair::new(38.9252, -77.3163),
            CoordPair::new(39.1301, -77.6019),
        ],
        vec![CoordPair::new(0.0, 0.0), CoordPair::new(10.0, 0.0), CoordPair::new(0.0, 10.0)],
    ];

    for ring in rings {
        let mut session = Session::new();
        let text = ring_text(&ring);
        let folded = commit(&mut session, &text);
        let shapes = segments::shapes_from_segments(&mut session, &folded, None);
        assert_eq!(shapes.len(), 1, "{text}");
        assert_eq!(shapes[0].rings(), vec![ring], "{text}");
    }
}

#[test]
fn multi_ring_text_round_trips() {
    let first = vec![CoordPair::new(1.0, 2.0), CoordPair::new(3.0, 4.0), CoordPair::new(5.0, 6.0)];
    let second = vec![
        CoordPair::new(-7.5, 8.0),
        CoordPair::new(9.0, -10.25),
        CoordPair::new(11.0, 12.0),
    ];
    let text = format!("[[{}],[{}]]", ring_text(&first), ring_text(&second));

    let mut session = Session::new();
    let folded = commit(&mut session, &text);
    let shapes = segments::shapes_from_segments(&mut session, &folded, None);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].rings(), vec![first, second]);
}

#[test]
fn coercer_prefers_point_then_rings_then_ring() {
    let mut session = Session::new();
    let cases = [
        ("38.8979 -77.0333", "marker1 [38.8979,-77.0333]"),
        ("1 2", "marker2 [1,2]"),
        ("[[1,2],[3,4],[5,6]]", "polygon1 [[[1,2],[3,4],[5,6]]]"),
        ("[[[1,2],[3,4],[5,6]]]", "polygon2 [[[1,2],[3,4],[5,6]]]"),
        ("1,2],[3,4],[5,6", "polygon3 [[[1,2],[3,4],[5,6]]]"),
    ];
    for (text, expected) in cases {
        let shape = shape_from_str(&mut session, text).expect(text);
        assert_eq!(format!("{} {}", shape.key(), shape), expected, "{text}");
    }
    assert!(shape_from_str(&mut session, "not coordinates").is_none());
}

#[test]
fn coerced_coordinates_are_rounded() {
    let mut session = Session::new();
    let shape = shape_from_str(&mut session, "[1.23456789, -9.87654321]").expect("point");
    insta::assert_snapshot!(shape.to_string(), @"[1.2346,-9.8765]");

    let shape = shape_from_str(&mut session, "[38.89793333, -77.03331111]").expect("point");
    insta::assert_snapshot!(shape.to_string(), @"[38.8979,-77.0333]");
}

#[test]
fn consecutive_shapes_never_share_a_color() {
    let mut session = Session::new();
    let folded = commit(&mut session, "[1,2] [3,4] [5,6],[7,8],[9,10] 11,12");
    let shapes = segments::shapes_from_segments(&mut session, &folded, None);
    assert!(shapes.len() > 1);
    for pair in shapes.windows(2) {
        assert_ne!(pair[0].color(), pair[1].color());
    }
}

#[test]
fn keys_are_unique_across_both_pipelines() {
    let mut session = Session::new();
    let mut keys = Vec::new();
    for text in ["[1,2]", "[[1,2],[3,4],[5,6]]", "[7,8]"] {
        keys.push(shape_from_str(&mut session, text).expect(text).key().to_string());
        let folded = commit(&mut session, text);
        for shape in segments::shapes_from_segments(&mut session, &folded, None) {
            keys.push(shape.key().to_string());
        }
    }
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), keys.len(), "{keys:?}");
}

#[test]
fn sketch_turns_text_into_shapes() {
    let mut sketch = Sketch::new();
    let key = sketch.segments()[0].key;
    sketch.update_literal(key, "[1,2],[3,4],[5,6] and [7,8]");
    assert!(!sketch.has_proposed_shapes());

    sketch.commit(key);
    assert!(sketch.has_proposed_shapes());
    assert_eq!(sketch.add_from_segments(false), 2);

    let summary: Vec<String> = sketch
        .shapes()
        .iter()
        .map(|s| format!("{} {}", s.key(), s))
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    polygon1 [[[1,2],[3,4],[5,6]]]
    marker1 [7,8]
    ");

    // segments are back to a single empty literal
    assert_eq!(sketch.segments().len(), 1);
    assert_eq!(sketch.segments()[0].as_literal(), Some(""));
    assert_eq!(sketch.log().next(), Some("added 2 shape(s) from text"));
}

#[test]
fn sketch_splits_the_default_multi_polygon() {
    let mut sketch = Sketch::with_default_shapes();
    let kinds: Vec<&str> = sketch.shapes().iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, ["marker", "polygon", "polygon"]);

    let multi = sketch.shapes()[2].key().to_string();
    let parts = sketch.split(&multi).expect("two rings");
    assert_eq!(parts.len(), 2);
    assert!(sketch.shape(&multi).is_none());
    assert!(parts.iter().all(|k| {
        matches!(sketch.shape(k), Some(Shape::Poly(p)) if p.polygons.len() == 1)
    }));
}
