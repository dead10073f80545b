//! Session state - the counters every allocating operation draws from
//!
//! Segment keys, shape keys and the color cursor all live here instead of in
//! globals, so two sessions never interfere with each other. Every function
//! that creates a segment or a shape takes `&mut Session`.

use std::fmt;

use crate::defaults::{LOG_CAPACITY, NICE_COLORS};
use crate::errors::ConfigError;
use crate::shapes::{Mark, Poly};
use crate::types::{CoordPair, Ring};

/// Runtime configuration for a [`Session`] / [`Sketch`](crate::Sketch)
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Colors cycled for shapes created without an explicit color
    pub palette: Vec<String>,
    /// Maximum number of messages kept in a sketch log
    pub log_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            palette: NICE_COLORS.iter().map(|c| c.to_string()).collect(),
            log_capacity: LOG_CAPACITY,
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        Ok(())
    }
}

/// Identity of a segment, stable across re-renders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey(pub u64);

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter state for one editing session
#[derive(Debug, Clone)]
pub struct Session {
    next_segment: u64,
    next_marker: u64,
    next_polygon: u64,
    color_cursor: usize,
    palette: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            next_segment: 1,
            next_marker: 1,
            next_polygon: 1,
            color_cursor: 0,
            palette: Options::default().palette,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a custom palette
    pub fn with_options(options: &Options) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Session {
            palette: options.palette.clone(),
            ..Session::default()
        })
    }

    /// Allocate the next segment key
    pub fn segment_key(&mut self) -> SegmentKey {
        let key = SegmentKey(self.next_segment);
        self.next_segment += 1;
        key
    }

    fn marker_key(&mut self) -> String {
        let key = format!("marker{}", self.next_marker);
        self.next_marker += 1;
        key
    }

    fn polygon_key(&mut self) -> String {
        let key = format!("polygon{}", self.next_polygon);
        self.next_polygon += 1;
        key
    }

    /// Next palette color; the cursor advances on every call
    pub fn next_color(&mut self) -> String {
        let color = self.palette[self.color_cursor % self.palette.len()].clone();
        self.color_cursor = self.color_cursor.wrapping_add(1);
        color
    }

    /// A palette color guaranteed to differ from `old` (when the palette allows it)
    pub fn change_color(&mut self, old: &str) -> String {
        let next = self.next_color();
        if next == old { self.next_color() } else { next }
    }

    fn pick_color(&mut self, color: Option<&str>) -> String {
        match color {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => self.next_color(),
        }
    }

    /// Create a point shape with a fresh key
    pub fn create_mark(&mut self, pt: CoordPair, color: Option<&str>) -> Mark {
        Mark {
            key: self.marker_key(),
            color: self.pick_color(color),
            pt,
        }
    }

    /// Create a polygon shape with a fresh key
    pub fn create_poly(&mut self, polygons: Vec<Ring>, color: Option<&str>) -> Poly {
        Poly {
            key: self.polygon_key(),
            color: self.pick_color(color),
            polygons,
        }
    }
}
