//! Hex coordinate system using an offset (staggered row) layout.
//!
//! This module provides the coordinate types for the board:
//! - `LogicalCoordinate`: Integer cell address `(x, y)` on the hex grid
//! - `PhysicalCoordinate`: Point in continuous 2D space (unit = hex circumradius)
//! - `Direction`: The six neighbor directions, clockwise from north-east
//!
//! Cells are pointy-top hexagons. Odd rows sit half a cell to the left of
//! even rows, so which six offsets reach the neighbors depends on row parity.
//! Hit-testing goes through axial coordinates so that cube rounding can pick
//! the cell whose hexagonal footprint contains a point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// `sqrt(3)`, the distance between the centres of two adjacent unit hexes.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

const HALF_SQRT_3: f64 = SQRT_3 / 2.0;

/// Vertical distance between the centres of two consecutive rows.
pub const ROW_PITCH: f64 = 1.5;

/// Largest `|x|` and `|y|` of a cell that can hold a tile or a mark.
/// Hit-testing clamps to this range.
pub const COORDINATE_LIMIT: i32 = 1 << 29;

/// Corners of a unit hex, clockwise starting from the top vertex.
const UNIT_VERTICES: [(f64, f64); 6] = [
    (0.0, -1.0),
    (HALF_SQRT_3, -0.5),
    (HALF_SQRT_3, 0.5),
    (0.0, 1.0),
    (-HALF_SQRT_3, 0.5),
    (-HALF_SQRT_3, -0.5),
];

/// Direction of a neighboring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Top-right neighbor (index 0)
    NorthEast,
    /// Right neighbor (index 1)
    East,
    /// Bottom-right neighbor (index 2)
    SouthEast,
    /// Bottom-left neighbor (index 3)
    SouthWest,
    /// Left neighbor (index 4)
    West,
    /// Top-left neighbor (index 5)
    NorthWest,
}

impl Direction {
    /// All directions in clockwise order starting from NorthEast
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Position of this direction in [`Direction::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, wrapping modulo 6
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The direction a neighbor uses to look back at us
    pub fn opposite(self) -> Self {
        Self::from_index(opposite_direction(self.index()))
    }
}

/// Index form of [`Direction::opposite`].
pub const fn opposite_direction(direction: usize) -> usize {
    (direction + 3) % 6
}

/// Logical coordinate of a hex cell.
///
/// `y` is the row, `x` the position inside the row. Rows with odd `y` are
/// shifted half a cell to the left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct LogicalCoordinate {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl LogicalCoordinate {
    /// Create a new logical coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Stable board key, `"x,y"`
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Whether both components are within [`COORDINATE_LIMIT`]
    pub fn in_bounds(&self) -> bool {
        let range = -COORDINATE_LIMIT..=COORDINATE_LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }

    fn is_odd_row(&self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// The six neighboring cells in clockwise order starting from NorthEast
    pub fn neighbors(&self) -> [LogicalCoordinate; 6] {
        Direction::ALL.map(|direction| self.neighbor(direction))
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: Direction) -> LogicalCoordinate {
        // Diagonal neighbors of an odd row are one column further left.
        let shift = if self.is_odd_row() { -1 } else { 0 };
        // Saturates at the i32 extremes, far outside COORDINATE_LIMIT
        let step = |dx: i32, dy: i32| {
            LogicalCoordinate::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
        };
        match direction {
            Direction::NorthEast => step(1 + shift, -1),
            Direction::East => step(1, 0),
            Direction::SouthEast => step(1 + shift, 1),
            Direction::SouthWest => step(shift, 1),
            Direction::West => step(-1, 0),
            Direction::NorthWest => step(shift, -1),
        }
    }

    /// Convert to axial `(q, r)` coordinates
    fn to_axial(self) -> (i64, i64) {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        (x - (y + y.rem_euclid(2)) / 2, y)
    }

    /// Convert from axial `(q, r)` coordinates, clamped to [`COORDINATE_LIMIT`]
    fn from_axial(q: i64, r: i64) -> Self {
        let x = q.saturating_add(r.div_euclid(2) + r.rem_euclid(2));
        Self::new(clamp_component(x), clamp_component(r))
    }

    /// Centre of this cell in physical space
    pub fn to_physical(&self) -> PhysicalCoordinate {
        let parity = self.y.rem_euclid(2);
        PhysicalCoordinate::new(
            (f64::from(self.x) * 2.0 - f64::from(parity)) * HALF_SQRT_3,
            f64::from(self.y) * ROW_PITCH,
        )
    }

    /// The cell whose hexagon contains `point`.
    ///
    /// Points on a shared edge or vertex are resolved by cube rounding:
    /// each axis is rounded half away from zero, then the axis with the
    /// strictly largest rounding error is recomputed from the other two.
    /// Points beyond the grid's bounds land on the nearest in-bounds row or
    /// column.
    pub fn from_physical(point: PhysicalCoordinate) -> Self {
        let q = SQRT_3 / 3.0 * point.x - point.y / 3.0;
        let r = 2.0 / 3.0 * point.y;
        let (q, r) = axial_round(q, r);
        Self::from_axial(q, r)
    }

    /// Distance to another cell (in hex steps)
    pub fn distance_to(&self, other: &LogicalCoordinate) -> u32 {
        let (q1, r1) = self.to_axial();
        let (q2, r2) = other.to_axial();
        let dq = (q1 - q2).abs();
        let dr = (r1 - r2).abs();
        let ds = ((-q1 - r1) - (-q2 - r2)).abs();
        u32::try_from((dq + dr + ds) / 2).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for LogicalCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

fn clamp_component(value: i64) -> i32 {
    let limit = i64::from(COORDINATE_LIMIT);
    value.clamp(-limit, limit) as i32
}

/// Round fractional axial coordinates to the nearest hex
fn axial_round(q: f64, r: f64) -> (i64, i64) {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    // `as` saturates, and maps NaN to 0
    (rq as i64, rr as i64)
}

/// A point in continuous 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PhysicalCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PhysicalCoordinate {
    /// Create a new physical coordinate
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &PhysicalCoordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for PhysicalCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PhysicalCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PhysicalCoordinate {
    type Output = Self;

    fn mul(self, value: f64) -> Self {
        Self::new(self.x * value, self.y * value)
    }
}

impl Div<f64> for PhysicalCoordinate {
    type Output = Self;

    fn div(self, value: f64) -> Self {
        Self::new(self.x / value, self.y / value)
    }
}

/// Embed a logical cell into physical space (centre of the hex).
pub fn logical_to_screen(coordinate: LogicalCoordinate) -> PhysicalCoordinate {
    coordinate.to_physical()
}

/// Hit-test a physical point against the grid.
pub fn screen_to_logical(point: PhysicalCoordinate) -> LogicalCoordinate {
    LogicalCoordinate::from_physical(point)
}

/// Corners of a hex with the given centre and circumradius, clockwise from the top.
pub fn hexagon_vertices(center: PhysicalCoordinate, radius: f64) -> [PhysicalCoordinate; 6] {
    UNIT_VERTICES.map(|(x, y)| PhysicalCoordinate::new(x, y) * radius + center)
}

/// Midpoints of the six sides of a unit hex, in [`Direction`] order.
pub fn hexagon_edge_midpoints() -> [PhysicalCoordinate; 6] {
    let corners = hexagon_vertices(PhysicalCoordinate::default(), 1.0);
    std::array::from_fn(|i| (corners[i] + corners[(i + 1) % 6]) / 2.0)
}

/// Whether a hex centred at `center` can overlap a viewport of `size`.
pub fn is_visible(size: PhysicalCoordinate, center: PhysicalCoordinate, radius: f64) -> bool {
    let half_width = radius * HALF_SQRT_3;
    center.x > -half_width
        && center.x < size.x + half_width
        && center.y > -radius
        && center.y < size.y + radius
}
