//! Direct coercion of a single free-form string into one shape
//!
//! The text first goes through an ordered list of repair rules, then is parsed
//! with the `coords.pest` grammar into a [`serde_json::Value`]. A failed parse
//! is retried once with the whole text wrapped in brackets. The parsed value
//! is classified as a point, a multi-ring polygon or a single ring, in that
//! order.

use std::sync::LazyLock;

use miette::NamedSource;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use regex_lite::Regex;
use serde_json::{Map, Value};

use crate::defaults::MIN_RING_POINTS;
use crate::errors::CoerceError;
use crate::log::{debug, trace};
use crate::session::Session;
use crate::shapes::Shape;
use crate::types::{CoordPair, Ring, ensure_finite};
use crate::{CoordParser, Rule};

/// One textual fix-up applied before parsing
struct RepairRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
    /// Reapply until the text stops changing
    until_stable: bool,
}

impl RepairRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        RepairRule {
            name,
            pattern: Regex::new(pattern).expect("repair patterns are valid"),
            replacement,
            until_stable: false,
        }
    }

    fn until_stable(mut self) -> Self {
        self.until_stable = true;
        self
    }

    fn apply(&self, text: &str) -> String {
        let mut current = self.pattern.replace_all(text, self.replacement).into_owned();
        while self.until_stable {
            let next = self.pattern.replace_all(&current, self.replacement);
            if next == current {
                break;
            }
            current = next.into_owned();
        }
        current
    }
}

static REPAIR_RULES: LazyLock<Vec<RepairRule>> = LazyLock::new(|| {
    vec![
        // "38.9 -77.0" -> "38.9,-77.0"
        RepairRule::new("number-gap", r"([-\d.]+)\s+([-\d.]+)", "${1},${2}").until_stable(),
        RepairRule::new("whitespace", r"\s+", ""),
        RepairRule::new("edge-comma", r"^,|,$", ""),
        RepairRule::new("comma-before-close", r",\]", "]"),
        RepairRule::new("leading-number", r"^([-\d.]+)", "[${1}"),
        RepairRule::new("trailing-number", r"([-\d.]+)$", "${1}]"),
    ]
});

/// Apply every repair rule in order.
pub fn repair(text: &str) -> String {
    REPAIR_RULES.iter().fold(text.to_string(), |acc, rule| {
        let next = rule.apply(&acc);
        if next != acc {
            trace!(rule = rule.name, before = %acc, after = %next, "repair rule applied");
        }
        next
    })
}

// ============================================================================
// Parsed values
// ============================================================================

struct ParseFailure {
    message: String,
    offset: usize,
}

/// Parse with the grammar, building a [`serde_json::Value`] document
fn parse_value(text: &str) -> Result<Value, ParseFailure> {
    let mut pairs = CoordParser::parse(Rule::document, text).map_err(|e| ParseFailure {
        message: e.variant.message().into_owned(),
        offset: match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((start, _)) => start,
        },
    })?;
    match pairs.next() {
        Some(pair) => build_value(pair),
        None => Err(ParseFailure {
            message: "empty document".to_string(),
            offset: 0,
        }),
    }
}

/// Decode a string or number token; serde_json owns escapes and float parsing
fn decode_scalar(pair: &Pair<Rule>) -> Result<Value, ParseFailure> {
    serde_json::from_str(pair.as_str()).map_err(|err| ParseFailure {
        message: err.to_string(),
        offset: pair.as_span().start(),
    })
}

fn build_value(pair: Pair<Rule>) -> Result<Value, ParseFailure> {
    match pair.as_rule() {
        Rule::object => {
            let mut members = Map::new();
            for member in pair.into_inner() {
                let mut inner = member.into_inner();
                let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                    unreachable!("grammar members are `string : value`");
                };
                let Value::String(key) = decode_scalar(&key)? else {
                    unreachable!("string token decoded to a non-string");
                };
                // later duplicates win
                members.insert(key, build_value(value)?);
            }
            Ok(Value::Object(members))
        }
        Rule::array => pair
            .into_inner()
            .map(build_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Rule::string | Rule::number => decode_scalar(&pair),
        Rule::boolean => Ok(Value::Bool(pair.as_str() == "true")),
        Rule::null => Ok(Value::Null),
        rule => unreachable!("{rule:?} is not a value rule"),
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Coerce a string component the way a lenient number cast would
fn coerce_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() { Some(0.0) } else { t.parse().ok() }
}

fn component(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => coerce_number(s)?,
        _ => return None,
    };
    ensure_finite(n).ok()
}

fn as_point(v: &Value) -> Option<CoordPair> {
    match v {
        Value::Array(items) if items.len() == 2 => {
            Some(CoordPair::new(component(&items[0])?, component(&items[1])?))
        }
        Value::Object(members) => {
            let lat = component(members.get("lat")?)?;
            let lng = component(members.get("lng")?)?;
            Some(CoordPair::new(lat, lng))
        }
        _ => None,
    }
}

fn as_ring(v: &Value) -> Option<Ring> {
    match v {
        Value::Array(items) if items.len() >= MIN_RING_POINTS => items
            .iter()
            .map(|item| as_point(item).map(CoordPair::rounded))
            .collect(),
        _ => None,
    }
}

fn as_rings(v: &Value) -> Option<Vec<Ring>> {
    match v {
        Value::Array(items) if !items.is_empty() => items.iter().map(as_ring).collect(),
        _ => None,
    }
}

/// Geometry recognized in a parsed value, before any key is allocated
#[derive(Debug, Clone, PartialEq)]
enum Coerced {
    Point(CoordPair),
    Rings(Vec<Ring>),
}

fn classify(v: &Value) -> Option<Coerced> {
    if let Some(pt) = as_point(v) {
        return Some(Coerced::Point(pt.rounded()));
    }
    if let Some(rings) = as_rings(v) {
        return Some(Coerced::Rings(rings));
    }
    as_ring(v).map(|ring| Coerced::Rings(vec![ring]))
}

fn coerce(text: &str) -> Result<Coerced, CoerceError> {
    let fixed = repair(text);
    let value = match parse_value(&fixed) {
        Ok(value) => value,
        Err(first) => {
            trace!(text = %fixed, "retrying wrapped in brackets");
            parse_value(&format!("[{fixed}]")).map_err(|_| {
                let offset = first.offset.min(fixed.len());
                let len = usize::from(offset < fixed.len());
                CoerceError::Unparseable {
                    message: first.message,
                    src: NamedSource::new("<input>", fixed.clone()),
                    span: (offset, len).into(),
                }
            })?
        }
    };

    classify(&value).ok_or_else(|| CoerceError::NotAShape {
        src: NamedSource::new("<input>", fixed.clone()),
        span: (0, fixed.len()).into(),
    })
}

/// Turn one free-form string into a shape, explaining any failure.
pub fn try_shape_from_str(session: &mut Session, text: &str) -> Result<Shape, CoerceError> {
    let shape = match coerce(text)? {
        Coerced::Point(pt) => Shape::Mark(session.create_mark(pt, None)),
        Coerced::Rings(rings) => Shape::Poly(session.create_poly(rings, None)),
    };
    debug!(key = %crate::ShapeOps::key(&shape), "coerced shape from text");
    Ok(shape)
}

/// Turn one free-form string into a shape, or `None` when it describes none.
pub fn shape_from_str(session: &mut Session, text: &str) -> Option<Shape> {
    try_shape_from_str(session, text).ok()
}
