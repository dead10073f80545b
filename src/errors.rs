//! Error types with rich diagnostics using miette
//!
//! Parsing and folding never fail; these types exist for the diagnostic
//! coercer entry point, for sketch operations that target a missing shape and
//! for rejected configuration.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Coercion Errors
// ============================================================================

/// Why a single string could not be turned into a shape
#[derive(Error, Diagnostic, Debug)]
pub enum CoerceError {
    #[error("not a coordinate literal: {message}")]
    #[diagnostic(
        code(polyscribe::coerce::unparseable),
        help("write a point as `lat, lng` or a polygon as `[lat,lng],[lat,lng],[lat,lng]`")
    )]
    Unparseable {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parsing stopped here")]
        span: SourceSpan,
    },

    #[error("value does not describe a point or a polygon")]
    #[diagnostic(
        code(polyscribe::coerce::not_a_shape),
        help("a polygon ring needs at least 3 points of 2 finite numbers each")
    )]
    NotAShape {
        #[source_code]
        src: NamedSource<String>,
        #[label("this value")]
        span: SourceSpan,
    },
}

// ============================================================================
// Shape Errors
// ============================================================================

/// Errors from sketch operations on existing shapes
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum ShapeError {
    #[error("no shape with key {key}")]
    #[diagnostic(code(polyscribe::shape::unknown))]
    UnknownShape { key: String },

    #[error("shape {key} is a {found}, expected a {expected}")]
    #[diagnostic(code(polyscribe::shape::wrong_kind))]
    WrongKind {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("shape {key} has {rings} ring(s), nothing to split")]
    #[diagnostic(
        code(polyscribe::shape::not_splittable),
        help("only polygons with more than one ring can be split")
    )]
    NotSplittable { key: String, rings: usize },

    #[error("shape {key} has no vertex {index} in ring {ring}")]
    #[diagnostic(code(polyscribe::shape::vertex_out_of_range))]
    VertexOutOfRange {
        key: String,
        ring: usize,
        index: usize,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Rejected [`Options`](crate::Options)
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum ConfigError {
    #[error("color palette is empty")]
    #[diagnostic(code(polyscribe::config::empty_palette))]
    EmptyPalette,

    #[error("log capacity must be at least 1")]
    #[diagnostic(code(polyscribe::config::zero_log_capacity))]
    ZeroLogCapacity,
}
