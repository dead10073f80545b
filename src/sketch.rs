//! Sketch - owns the editing session, the segment list and the shape list
//!
//! This is the single mutable slot a UI drives. Every method maps to one
//! discrete user action; the parsing functions it calls stay pure.

use std::collections::VecDeque;

use glam::DVec2;

use crate::coerce::shape_from_str;
use crate::defaults::DEFAULT_SHAPES;
use crate::errors::{ConfigError, ShapeError};
use crate::log::debug;
use crate::segments::{self, Segment};
use crate::session::{Options, SegmentKey, Session};
use crate::shapes::{Shape, ShapeOps};
use crate::types::{Bounds, CoordPair};

/// Editing state for one user
#[derive(Debug, Clone)]
pub struct Sketch {
    session: Session,
    segments: Vec<Segment>,
    shapes: Vec<Shape>,
    log: VecDeque<String>,
    log_capacity: usize,
}

impl Default for Sketch {
    fn default() -> Self {
        let mut session = Session::new();
        let segments = segments::initial_segments(&mut session);
        Sketch {
            session,
            segments,
            shapes: Vec::new(),
            log: VecDeque::new(),
            log_capacity: Options::default().log_capacity,
        }
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &Options) -> Result<Self, ConfigError> {
        let mut session = Session::with_options(options)?;
        let segments = segments::initial_segments(&mut session);
        Ok(Sketch {
            session,
            segments,
            shapes: Vec::new(),
            log: VecDeque::new(),
            log_capacity: options.log_capacity,
        })
    }

    /// A sketch seeded with the built-in sample shapes
    pub fn with_default_shapes() -> Self {
        let mut sketch = Sketch::new();
        for text in DEFAULT_SHAPES {
            sketch.add_from_str(text);
        }
        sketch
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, key: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.key() == key)
    }

    /// Recent action messages, newest first
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    fn record(&mut self, message: String) {
        debug!(%message, "sketch action");
        self.log.push_front(message);
        self.log.truncate(self.log_capacity);
    }

    // ------------------------------------------------------------------------
    // Segment editing
    // ------------------------------------------------------------------------

    pub fn update_literal(&mut self, key: SegmentKey, text: &str) {
        self.segments = segments::update_literal(&self.segments, key, text);
    }

    /// Commit the literal with `key`: tokenize it and fold the list
    pub fn commit(&mut self, key: SegmentKey) {
        self.segments = segments::parse(&mut self.session, &self.segments, key);
    }

    pub fn allow_edit(&mut self, key: SegmentKey) {
        self.segments = segments::allow_edit(&self.segments, key);
    }

    /// Remove a segment; the last remaining segment cannot be removed
    pub fn remove_segment(&mut self, key: SegmentKey) {
        if self.segments.len() > 1 {
            self.segments = segments::remove_segment(&self.segments, key);
        }
    }

    pub fn reset_segments(&mut self) {
        self.segments = segments::initial_segments(&mut self.session);
    }

    pub fn has_proposed_shapes(&self) -> bool {
        segments::has_extractable_shapes(&self.segments)
    }

    /// Turn the proposed shapes into real ones, replacing or appending.
    ///
    /// The segments are reset afterwards. Returns how many shapes were added.
    pub fn add_from_segments(&mut self, replace: bool) -> usize {
        let new_shapes = segments::shapes_from_segments(&mut self.session, &self.segments, None);
        let added = new_shapes.len();
        if replace {
            self.shapes = new_shapes;
        } else {
            self.shapes.extend(new_shapes);
        }
        self.reset_segments();
        let verb = if replace { "replaced all with" } else { "added" };
        self.record(format!("{verb} {added} shape(s) from text"));
        added
    }

    /// Coerce one string into a shape and append it
    pub fn add_from_str(&mut self, text: &str) -> Option<String> {
        let Some(shape) = shape_from_str(&mut self.session, text) else {
            self.record(format!("could not read a shape from {text:?}"));
            return None;
        };
        let key = shape.key().to_string();
        self.record(format!("added {key}: {shape}"));
        self.shapes.push(shape);
        Some(key)
    }

    // ------------------------------------------------------------------------
    // Shape editing
    // ------------------------------------------------------------------------

    fn position(&self, key: &str) -> Result<usize, ShapeError> {
        self.shapes
            .iter()
            .position(|s| s.key() == key)
            .ok_or_else(|| ShapeError::UnknownShape {
                key: key.to_string(),
            })
    }

    fn wrong_kind(shape: &Shape, expected: &'static str) -> ShapeError {
        ShapeError::WrongKind {
            key: shape.key().to_string(),
            expected,
            found: shape.kind(),
        }
    }

    /// Give a shape a palette color different from its current one
    pub fn recolor(&mut self, key: &str) -> Result<(), ShapeError> {
        let idx = self.position(key)?;
        let color = self.session.change_color(self.shapes[idx].color());
        self.shapes[idx].set_color(color);
        self.record(format!("recolored {key}"));
        Ok(())
    }

    /// Replace a multi-ring polygon with one polygon per ring
    pub fn split(&mut self, key: &str) -> Result<Vec<String>, ShapeError> {
        let idx = self.position(key)?;
        let poly = match &self.shapes[idx] {
            Shape::Poly(p) if p.polygons.len() > 1 => p.clone(),
            Shape::Poly(p) => {
                return Err(ShapeError::NotSplittable {
                    key: key.to_string(),
                    rings: p.polygons.len(),
                });
            }
            other => return Err(Self::wrong_kind(other, "polygon")),
        };

        self.shapes.remove(idx);
        let mut keys = Vec::with_capacity(poly.polygons.len());
        for ring in poly.polygons {
            let part = self.session.create_poly(vec![ring], None);
            keys.push(part.key.clone());
            self.shapes.push(Shape::Poly(part));
        }
        self.record(format!("split {key} into {}", keys.join(", ")));
        Ok(keys)
    }

    /// Append a copy moved by `offset` degrees (`x` = lat, `y` = lng)
    pub fn copy(&mut self, key: &str, offset: DVec2) -> Result<String, ShapeError> {
        let idx = self.position(key)?;
        let copy = match &self.shapes[idx] {
            Shape::Mark(m) => Shape::Mark(self.session.create_mark(m.pt.offset(offset), None)),
            Shape::Poly(p) => {
                let rings = p
                    .polygons
                    .iter()
                    .map(|ring| ring.iter().map(|pt| pt.offset(offset)).collect())
                    .collect();
                Shape::Poly(self.session.create_poly(rings, None))
            }
        };
        let new_key = copy.key().to_string();
        self.shapes.push(copy);
        self.record(format!("copied {key} to {new_key}"));
        Ok(new_key)
    }

    /// Drop a marker at a new position
    pub fn move_mark(&mut self, key: &str, pt: CoordPair) -> Result<(), ShapeError> {
        let idx = self.position(key)?;
        match &mut self.shapes[idx] {
            Shape::Mark(m) => m.pt = pt.rounded(),
            other => return Err(Self::wrong_kind(other, "marker")),
        }
        Ok(())
    }

    /// Drag a whole polygon so that `anchor` ends up at `pt`
    pub fn move_poly(
        &mut self,
        key: &str,
        anchor: CoordPair,
        pt: CoordPair,
    ) -> Result<(), ShapeError> {
        let idx = self.position(key)?;
        match &mut self.shapes[idx] {
            poly @ Shape::Poly(_) => poly.translate(pt.to_dvec2() - anchor.to_dvec2()),
            other => return Err(Self::wrong_kind(other, "polygon")),
        }
        Ok(())
    }

    /// Move a single polygon vertex
    pub fn adjust_vertex(
        &mut self,
        key: &str,
        ring: usize,
        index: usize,
        pt: CoordPair,
    ) -> Result<(), ShapeError> {
        let idx = self.position(key)?;
        let poly = match &mut self.shapes[idx] {
            Shape::Poly(p) => p,
            other => return Err(Self::wrong_kind(other, "polygon")),
        };
        let vertex = poly
            .polygons
            .get_mut(ring)
            .and_then(|r| r.get_mut(index))
            .ok_or_else(|| ShapeError::VertexOutOfRange {
                key: key.to_string(),
                ring,
                index,
            })?;
        *vertex = pt.rounded();
        Ok(())
    }

    pub fn remove_shape(&mut self, key: &str) -> Result<(), ShapeError> {
        let idx = self.position(key)?;
        self.shapes.remove(idx);
        self.record(format!("deleted {key}"));
        Ok(())
    }

    /// Box around every shape, for re-fitting a view
    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes
            .iter()
            .filter_map(ShapeOps::bounds)
            .reduce(Bounds::union)
    }
}
