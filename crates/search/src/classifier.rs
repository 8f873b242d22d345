//! Bucket-shape classification for the side-slide placement.
//!
//! A classifier splits the interior into a left and right half and answers two
//! questions per half: does every column have a floor, and which floor column
//! lies nearest the centre.

use std::ops::RangeInclusive;

use cascade_core::{CellState, GameMap, PieceType, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Column ranges of the two halves, plus the columns between them (if any).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Sides {
    pub left: RangeInclusive<i32>,
    pub right: RangeInclusive<i32>,
}

impl Sides {
    pub fn columns(&self, side: Side) -> RangeInclusive<i32> {
        match side {
            Side::Left => self.left.clone(),
            Side::Right => self.right.clone(),
        }
    }
}

pub trait BucketClassifier: Send + Sync {
    /// None means the bucket has no halves to tell apart.
    fn sides(&self, map: &GameMap) -> Option<Sides>;

    fn bottomless_columns(&self, map: &GameMap, side: Side) -> usize {
        self.sides(map).map_or(0, |s| {
            s.columns(side)
                .filter(|&x| map.column_is_bottomless(x))
                .count()
        })
    }

    fn is_side_complete(&self, map: &GameMap, side: Side) -> bool {
        self.bottomless_columns(map, side) == 0
    }

    /// Floor-bearing column closest to the centre on `side`.
    fn nearest_floor_column(&self, map: &GameMap, side: Side) -> Option<i32> {
        let sides = self.sides(map)?;
        let mut columns = sides.columns(side);
        match side {
            Side::Left => columns.rev().find(|&x| !map.column_is_bottomless(x)),
            Side::Right => columns.find(|&x| !map.column_is_bottomless(x)),
        }
    }
}

/// Rectangular buckets: one undivided interior, always complete.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatBucket;

impl BucketClassifier for FlatBucket {
    fn sides(&self, _map: &GameMap) -> Option<Sides> {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum SplitRule {
    /// Halves lie either side of the solid obstruction; midpoint when there is none.
    #[default]
    Obstruction,
    /// Halves meet at the interior midpoint.
    Midpoint,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CenteredBucket {
    pub split: SplitRule,
}

impl CenteredBucket {
    pub fn new(split: SplitRule) -> Self {
        Self { split }
    }
}

/// Leftmost and rightmost interior columns holding a fixed bucket cell.
fn obstruction_span(map: &GameMap) -> Option<(i32, i32)> {
    let b = map.bucket();
    let solid = |x: i32| {
        (b.top..=b.bottom).any(|y| {
            map.cell_state(Point::new(x, y)) == CellState::Blocked(PieceType::Bucket)
        })
    };
    let first = (b.left..=b.right).find(|&x| solid(x))?;
    let last = (b.left..=b.right).rev().find(|&x| solid(x)).unwrap_or(first);
    Some((first, last))
}

fn midpoint_sides(map: &GameMap) -> Sides {
    let b = map.bucket();
    let mid = b.center_x();
    Sides {
        left: b.left..=mid,
        right: mid + 1..=b.right,
    }
}

impl BucketClassifier for CenteredBucket {
    fn sides(&self, map: &GameMap) -> Option<Sides> {
        let b = map.bucket();
        let sides = match self.split {
            SplitRule::Midpoint => midpoint_sides(map),
            SplitRule::Obstruction => match obstruction_span(map) {
                Some((first, last)) => Sides {
                    left: b.left..=first - 1,
                    right: last + 1..=b.right,
                },
                None => midpoint_sides(map),
            },
        };
        Some(sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::BucketShape;

    fn centered() -> GameMap {
        GameMap::new(8, 8, 3, BucketShape::Centered {
            block_width: 2,
            block_height: 2,
        })
    }

    #[test]
    fn test_flat_is_complete() {
        let map = GameMap::new(10, 20, 4, BucketShape::Rectangular);
        assert!(FlatBucket.is_side_complete(&map, Side::Left));
        assert!(FlatBucket.is_side_complete(&map, Side::Right));
        assert_eq!(FlatBucket.nearest_floor_column(&map, Side::Left), None);
    }

    #[test]
    fn test_obstruction_split() {
        let map = centered();
        let sides = CenteredBucket::new(SplitRule::Obstruction)
            .sides(&map)
            .expect("centered bucket has sides");
        // obstruction occupies columns 4 and 5
        assert_eq!(sides.left, 1..=3);
        assert_eq!(sides.right, 6..=8);
    }

    #[test]
    fn test_midpoint_split() {
        let map = centered();
        let sides = CenteredBucket::new(SplitRule::Midpoint)
            .sides(&map)
            .expect("centered bucket has sides");
        assert_eq!(sides.left, 1..=4);
        assert_eq!(sides.right, 5..=8);
    }

    #[test]
    fn test_empty_centered_sides_incomplete() {
        let map = centered();
        let c = CenteredBucket::new(SplitRule::Obstruction);
        assert!(!c.is_side_complete(&map, Side::Left));
        assert_eq!(c.bottomless_columns(&map, Side::Left), 3);
        assert_eq!(c.nearest_floor_column(&map, Side::Left), None);
        let mid = CenteredBucket::new(SplitRule::Midpoint);
        assert_eq!(mid.bottomless_columns(&map, Side::Left), 3);
        assert_eq!(mid.nearest_floor_column(&map, Side::Left), Some(4));
        assert_eq!(mid.nearest_floor_column(&map, Side::Right), Some(5));
    }

    #[test]
    fn test_floor_column_after_landing() {
        let mut map = centered();
        let b = *map.bucket();
        map.merge_points(&[Point::new(2, b.bottom)], None);
        let c = CenteredBucket::new(SplitRule::Obstruction);
        assert_eq!(c.bottomless_columns(&map, Side::Left), 2);
        assert_eq!(c.nearest_floor_column(&map, Side::Left), Some(2));
    }

    #[test]
    fn test_nearest_floor_column_faces_the_centre() {
        let mut map = centered();
        let b = *map.bucket();
        map.merge_points(
            &[Point::new(1, b.bottom), Point::new(3, b.bottom), Point::new(6, b.bottom), Point::new(8, b.bottom)],
            None,
        );
        let c = CenteredBucket::new(SplitRule::Obstruction);
        assert_eq!(c.nearest_floor_column(&map, Side::Left), Some(3));
        assert_eq!(c.nearest_floor_column(&map, Side::Right), Some(6));
    }
}
