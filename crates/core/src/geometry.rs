//! Integer grid geometry - points, quarter turns, exact rotation.
//!
//! Coordinates are y-down: row 0 is the top of the map and larger `y` is closer
//! to the floor. All rotation happens on integers so repeated turns never drift.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Number of clockwise 90° steps, always in 0..4.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    pub const ZERO: Self = Self(0);
    pub const ALL: [QuarterTurns; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Reduce any step count mod 4.
    pub fn new(steps: u32) -> Self {
        Self((steps % 4) as u8)
    }

    /// Angle in degrees. Anything that is not a multiple of 90 is a caller bug.
    pub fn from_degrees(degrees: u32) -> Self {
        assert!(
            degrees % 90 == 0,
            "rotation angle must be a multiple of 90 degrees, got {degrees}"
        );
        Self::new(degrees / 90)
    }

    #[inline]
    pub fn steps(self) -> u32 {
        self.0 as u32
    }

    pub fn degrees(self) -> u32 {
        self.steps() * 90
    }

    pub fn cw(self) -> Self {
        Self::new(self.steps() + 1)
    }

    pub fn ccw(self) -> Self {
        Self::new(self.steps() + 3)
    }
}

/// Rotate `points` clockwise around `origin`, `times` quarter turns.
pub fn rotate_right(points: &[Point], origin: Point, times: u32) -> Vec<Point> {
    points
        .iter()
        .map(|&p| rotate_point_right(p, origin, times))
        .collect()
}

/// Counter-clockwise counterpart of [`rotate_right`].
pub fn rotate_left(points: &[Point], origin: Point, times: u32) -> Vec<Point> {
    rotate_right(points, origin, (4 - times % 4) % 4)
}

#[inline]
pub fn rotate_point_right(point: Point, origin: Point, times: u32) -> Point {
    let mut rel = point - origin;
    for _ in 0..times % 4 {
        // (dx, dy) -> (-dy, dx) is clockwise when y grows downward
        rel = Point::new(-rel.y, rel.x);
    }
    origin + rel
}

pub fn translate(points: &[Point], dx: i32, dy: i32) -> Vec<Point> {
    points.iter().map(|p| p.offset(dx, dy)).collect()
}

/// Inclusive bounding box of a point set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for p in &points[1..] {
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// Translate to the bounding-box corner and sort, so two point sets compare by shape only.
pub fn normalized(points: &[Point]) -> Vec<Point> {
    let Some(b) = Bounds::of(points) else {
        return Vec::new();
    };
    let mut out = translate(points, -b.min_x, -b.min_y);
    out.sort();
    out
}
