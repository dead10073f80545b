//! Coordinate primitives shared by segments and shapes.
//!
//! A [`CoordPair`] is a `[lat, lng]` pair of finite numbers. Values typed by
//! the user are stored verbatim; values that come out of arithmetic go through
//! [`CoordPair::rounded`] first.

use std::fmt;

use glam::{DVec2, dvec2};
use thiserror::Error;

use crate::defaults::PRECISION;

/// A coordinate component that is not a finite number
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    #[error("coordinate component is NaN")]
    NaN,
    #[error("coordinate component overflows to infinity")]
    Infinite,
}

/// Pass `val` through when it can sit in a [`CoordPair`]
pub(crate) fn ensure_finite(val: f64) -> Result<f64, NumericError> {
    match val {
        v if v.is_nan() => Err(NumericError::NaN),
        v if v.is_infinite() => Err(NumericError::Infinite),
        v => Ok(v),
    }
}

/// Round a number to `precision` decimal places.
#[inline]
pub fn round_to(val: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    let rounded = (val * factor).round() / factor;
    // normalize -0
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// A `[lat, lng]` coordinate pair
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CoordPair {
    pub lat: f64,
    pub lng: f64,
}

impl CoordPair {
    /// Create a pair without validation (for values already known to be finite)
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        CoordPair { lat, lng }
    }

    /// Create a pair only from finite components
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, NumericError> {
        Ok(CoordPair {
            lat: ensure_finite(lat)?,
            lng: ensure_finite(lng)?,
        })
    }

    /// This pair rounded to [`PRECISION`] decimal places.
    #[inline]
    pub fn rounded(self) -> Self {
        CoordPair {
            lat: round_to(self.lat, PRECISION),
            lng: round_to(self.lng, PRECISION),
        }
    }

    /// Translate by `delta` (x = lat, y = lng) and round the result.
    #[inline]
    pub fn offset(self, delta: DVec2) -> Self {
        CoordPair::from(self.to_dvec2() + delta).rounded()
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.lat, self.lng)
    }
}

impl From<DVec2> for CoordPair {
    fn from(v: DVec2) -> Self {
        CoordPair { lat: v.x, lng: v.y }
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lat, self.lng)
    }
}

/// An ordered ring of points (closing edge implied)
pub type Ring = Vec<CoordPair>;

/// Write a ring as `[[lat,lng],...]`
pub(crate) fn write_ring(f: &mut fmt::Formatter<'_>, ring: &[CoordPair]) -> fmt::Result {
    write!(f, "[")?;
    for (i, pt) in ring.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{pt}")?;
    }
    write!(f, "]")
}

/// Write a list of rings as `[[[lat,lng],...],...]`
pub(crate) fn write_rings(f: &mut fmt::Formatter<'_>, rings: &[Ring]) -> fmt::Result {
    write!(f, "[")?;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write_ring(f, ring)?;
    }
    write!(f, "]")
}

/// Axis-aligned bounding box in `(lat, lng)` space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// A box covering a single point
    pub fn from_point(pt: CoordPair) -> Self {
        let v = pt.to_dvec2();
        Bounds { min: v, max: v }
    }

    /// Bounds of a set of points, `None` when empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a CoordPair>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = Bounds::from_point(*iter.next()?);
        Some(iter.fold(first, |b, pt| b.include(*pt)))
    }

    /// Grow to include a point
    pub fn include(self, pt: CoordPair) -> Self {
        let v = pt.to_dvec2();
        Bounds {
            min: self.min.min(v),
            max: self.max.max(v),
        }
    }

    /// Smallest box containing both
    pub fn union(self, other: Bounds) -> Self {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// South-west corner
    pub fn south_west(&self) -> CoordPair {
        self.min.into()
    }

    /// North-east corner
    pub fn north_east(&self) -> CoordPair {
        self.max.into()
    }
}
