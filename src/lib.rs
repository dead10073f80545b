//! # polyscribe
//!
//! Turn loosely formatted coordinate text into points, polygons and
//! multi-polygons.
//!
//! Two pipelines end at the same [`Shape`] model:
//!
//! - the **segment pipeline** ([`segments`]) tokenizes the text of an editable
//!   literal and folds the pieces bottom-up: numbers → tuples → polygon rings
//!   → multigons. Reducible segments become shapes on demand.
//! - the **direct coercer** ([`coerce`]) repairs one string and parses it
//!   straight into a single shape.
//!
//! All key and color counters live in a [`Session`]; [`Sketch`] bundles a
//! session with the segment list, the shape list and an action log.
//!
//! ## Example
//! ```rust
//! use polyscribe::{Session, ShapeOps, segments};
//!
//! let mut session = Session::new();
//! let start = segments::initial_segments(&mut session);
//! let key = start[0].key;
//! let edited = segments::update_literal(&start, key, "[1,2],[3,4],[5,6]");
//! let folded = segments::parse(&mut session, &edited, key);
//! assert_eq!(folded[0].kind(), "multigon");
//!
//! let shapes = segments::shapes_from_segments(&mut session, &folded, None);
//! assert_eq!(shapes[0].key(), "polygon1");
//! ```

use pest_derive::Parser;

pub mod coerce;
pub mod defaults;
pub mod errors;
pub mod log;
pub mod segments;
pub mod session;
pub mod shapes;
pub mod sketch;
pub mod types;

pub use coerce::{shape_from_str, try_shape_from_str};
pub use errors::{CoerceError, ConfigError, ShapeError};
pub use segments::{Segment, SegmentValue};
pub use session::{Options, SegmentKey, Session};
pub use shapes::{Mark, Poly, Shape, ShapeOps};
pub use sketch::Sketch;
pub use types::{Bounds, CoordPair, NumericError, Ring};

/// Grammar for the JSON-like literal the coercer parses after repair
#[derive(Parser)]
#[grammar = "coords.pest"]
pub struct CoordParser;
