//! Shape records consumed by renderers
//!
//! Each shape kind is its own type that knows how to:
//! - Report its identity and color
//! - Translate itself by a delta
//! - Compute its bounding box
//!
//! [`Shape`] dispatches to the kinds through [`ShapeOps`].

use std::fmt;

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::types::{Bounds, CoordPair, Ring, write_rings};

/// Common behavior for all shapes
#[enum_dispatch]
pub trait ShapeOps {
    /// Unique key (`marker1`, `polygon3`, ...)
    fn key(&self) -> &str;

    /// Stroke/fill color as a CSS color string
    fn color(&self) -> &str;

    fn set_color(&mut self, color: String);

    /// Short kind name used in messages
    fn kind(&self) -> &'static str;

    /// Move every point by `delta`, rounding the results
    fn translate(&mut self, delta: DVec2);

    /// Bounding box of all points
    fn bounds(&self) -> Option<Bounds>;

    /// Total number of points across all rings
    fn point_count(&self) -> usize;
}

/// A single-point shape
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub key: String,
    pub color: String,
    pub pt: CoordPair,
}

impl ShapeOps for Mark {
    fn key(&self) -> &str {
        &self.key
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn set_color(&mut self, color: String) {
        self.color = color;
    }

    fn kind(&self) -> &'static str {
        "marker"
    }

    fn translate(&mut self, delta: DVec2) {
        self.pt = self.pt.offset(delta);
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::from_point(self.pt))
    }

    fn point_count(&self) -> usize {
        1
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pt)
    }
}

/// A polygon made of one or more rings
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    pub key: String,
    pub color: String,
    pub polygons: Vec<Ring>,
}

impl ShapeOps for Poly {
    fn key(&self) -> &str {
        &self.key
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn set_color(&mut self, color: String) {
        self.color = color;
    }

    fn kind(&self) -> &'static str {
        "polygon"
    }

    fn translate(&mut self, delta: DVec2) {
        for ring in &mut self.polygons {
            for pt in ring.iter_mut() {
                *pt = pt.offset(delta);
            }
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.polygons.iter().flatten())
    }

    fn point_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rings(f, &self.polygons)
    }
}

/// Any shape a renderer can draw
#[enum_dispatch(ShapeOps)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Mark(Mark),
    Poly(Poly),
}

impl Shape {
    pub fn as_mark(&self) -> Option<&Mark> {
        match self {
            Shape::Mark(m) => Some(m),
            Shape::Poly(_) => None,
        }
    }

    pub fn as_poly(&self) -> Option<&Poly> {
        match self {
            Shape::Poly(p) => Some(p),
            Shape::Mark(_) => None,
        }
    }

    /// Every ring of this shape; a mark is reported as a one-point ring
    pub fn rings(&self) -> Vec<Ring> {
        match self {
            Shape::Mark(m) => vec![vec![m.pt]],
            Shape::Poly(p) => p.polygons.clone(),
        }
    }
}

/// Formats the coordinate data only (`[lat,lng]` or `[[[lat,lng],...]]`)
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Mark(m) => fmt::Display::fmt(m, f),
            Shape::Poly(p) => fmt::Display::fmt(p, f),
        }
    }
}
