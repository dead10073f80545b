//! Fixed values shared by the parsers, the shape factory and the sketch.

/// Decimal places kept for coordinates that come out of arithmetic or coercion
pub const PRECISION: i32 = 4;

/// Fewest consecutive points the ring fold turns into a polygon
pub const MIN_RING_POINTS: usize = 3;

/// Literal between the two numbers of a coordinate pair
pub const PAIR_SEPARATOR: &str = ",";

/// Literal between two coordinate pairs of one ring
pub const POINT_SEPARATOR: &str = "],[";

/// Literal between two rings of one multi-polygon
pub const POLYGON_SEPARATOR: &str = "]],[[";

/// How many action messages a sketch keeps
pub const LOG_CAPACITY: usize = 20;

/// Palette cycled when a shape is created without an explicit color
pub const NICE_COLORS: [&str; 10] = [
    "#ff4136", "#3d9970", "#39cccc", "#85144b", "#2ecc40", "#b10dc9", "#ff851b", "#0074d9",
    "#aaaaaa", "#001f3f",
];

/// Shapes a fresh sketch can be seeded with
pub const DEFAULT_SHAPES: [&str; 3] = [
    "[38.8979, -77.0333]",
    "[[[39.0149,-77.0444],[38.9252,-77.3163],[39.1301,-77.6019],[39.181,-77.0911]]]",
    "[[[38.9434,-76.9867],[38.9423,-76.8796],[38.8322,-76.9867]],[[38.922,-77.1845],[38.8376,-77.0251],[38.8344,-77.168]]]",
];
