//! Candidate placements: every (turn, column) pair the live piece can be dropped from.

use cascade_core::geometry::translate;
use cascade_core::{Bounds, GameMap, Piece, Point, QuarterTurns};
use cascade_engine::MotionPlan;

/// One evaluated placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub turns: QuarterTurns,
    /// Absolute map column of the rotated shape's left edge.
    pub column: i32,
    /// Resting points after the virtual drop.
    pub dropped: Vec<Point>,
    pub score: f64,
    pub plan: MotionPlan,
}

const SPAWN_ONLY: [QuarterTurns; 1] = [QuarterTurns::ZERO];

/// Turns worth searching. Symmetric pieces only need the spawn orientation.
pub fn angles(piece: &Piece) -> &'static [QuarterTurns] {
    if piece.is_rotationally_symmetric() {
        &SPAWN_ONLY
    } else {
        &QuarterTurns::ALL
    }
}

/// The piece turned in place, with its bounding box.
#[derive(Clone, Debug)]
pub struct Orientation {
    pub turns: QuarterTurns,
    pub points: Vec<Point>,
    pub bounds: Bounds,
}

impl Orientation {
    pub fn of(piece: &Piece, turns: QuarterTurns) -> Option<Self> {
        let points = piece.rotated_points(turns.steps());
        let bounds = Bounds::of(&points)?;
        Some(Self {
            turns,
            points,
            bounds,
        })
    }

    /// Left-edge columns that keep the shape inside the interior.
    pub fn columns(&self, map: &GameMap) -> std::ops::RangeInclusive<i32> {
        let b = map.bucket();
        b.left..=b.right - self.bounds.width() + 1
    }

    /// Points shifted so the left edge sits on `column`.
    pub fn at_column(&self, column: i32) -> Vec<Point> {
        translate(&self.points, column - self.bounds.min_x, 0)
    }

    /// Motion from the spawn orientation to this one at `column`.
    pub fn plan(&self, column: i32, initial_move_down: u32) -> MotionPlan {
        MotionPlan::new(initial_move_down, self.turns, self.bounds.min_x - column)
    }
}

/// Start cells for `column`, dropped to rest. None if the start cells are taken.
pub fn drop_at(map: &GameMap, orientation: &Orientation, column: i32) -> Option<Vec<Point>> {
    let start = orientation.at_column(column);
    if !map.can_place(&start) {
        return None;
    }
    Some(map.virtual_drop(&start))
}

/// Every orientation worth searching.
pub fn orientations(piece: &Piece) -> Vec<Orientation> {
    angles(piece)
        .iter()
        .filter_map(|&turns| Orientation::of(piece, turns))
        .collect()
}
