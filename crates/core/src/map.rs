//! Occupancy grid - one `OccupantId` per cell, row-major, y-down.
//!
//! The map is larger than the bucket: spawn rows sit above the interior, walls
//! (or invisible walls) flank it and a rectangular bucket has a floor row under it.
//! Only the interior takes part in row clears and gap analysis.

use std::fmt;
use std::ops::Index;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::Point;
use crate::occupant::{OccupantId, PieceType};
use crate::piece::{Piece, Shape};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum BucketShape {
    /// Walls on both sides and a floor.
    #[default]
    Rectangular,
    /// Square interior with no floor and a solid obstruction in the middle.
    Centered { block_width: u32, block_height: u32 },
}

/// Inclusive interior bounds of the bucket, in map coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Bucket {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Bucket {
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// Lowest playable row.
    #[inline]
    pub fn floor_row(&self) -> i32 {
        self.bottom
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.left + (self.width() - 1) / 2
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        (self.left..=self.right).contains(&p.x) && (self.top..=self.bottom).contains(&p.y)
    }

    /// Rows above the floor, 0 on the floor row.
    #[inline]
    pub fn level_of(&self, row: i32) -> i32 {
        self.floor_row() - row
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Blocked(PieceType),
    OutOfBounds,
}

/// Result of the column connectivity scan.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GapCount {
    /// Empty cells covered by something solid in the same column.
    pub unreachable: u32,
    /// Empty cells with a clear vertical path to the bucket top.
    pub reachable: u32,
    pub blocked: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClearedRow {
    /// Row index before this collapse started.
    pub row: i32,
    /// Every cell came from a single merged piece.
    pub homogeneous: bool,
}

#[derive(Clone, Debug)]
pub struct GameMap {
    width: i32,
    height: i32,
    cells: Vec<OccupantId>,
    bucket: Bucket,
    shape: BucketShape,
    types: FxHashMap<OccupantId, PieceType>,
    shapes: FxHashMap<OccupantId, Shape>,
    next_id: u32,
}

impl GameMap {
    /// Lay out a bucket `interior_width` × `interior_height` with `spawn_rows` above it.
    pub fn new(
        interior_width: u32,
        interior_height: u32,
        spawn_rows: u32,
        shape: BucketShape,
    ) -> Self {
        debug_assert!(interior_width > 0 && interior_height > 0);
        let iw = interior_width as i32;
        let ih = interior_height as i32;
        let top = spawn_rows as i32;
        let width = iw + 2;
        let height = top + ih + 1;
        let bucket = Bucket {
            left: 1,
            right: iw,
            top,
            bottom: top + ih - 1,
        };

        let mut map = Self {
            width,
            height,
            cells: vec![OccupantId::EXTERIOR; (width * height) as usize],
            bucket,
            shape,
            types: OccupantId::RESERVED.into_iter().collect(),
            shapes: FxHashMap::default(),
            next_id: OccupantId::FIRST_DYNAMIC,
        };

        for y in bucket.top..=bucket.bottom {
            for x in bucket.left..=bucket.right {
                map.set_occupant(Point::new(x, y), OccupantId::BACKGROUND);
            }
        }

        match shape {
            BucketShape::Rectangular => {
                for y in 0..height {
                    let wall = if y < top {
                        OccupantId::INVISIBLE_BUCKET
                    } else {
                        OccupantId::BUCKET
                    };
                    map.set_occupant(Point::new(0, y), wall);
                    map.set_occupant(Point::new(width - 1, y), wall);
                }
                for x in 0..width {
                    map.set_occupant(Point::new(x, bucket.bottom + 1), OccupantId::BUCKET);
                }
            }
            BucketShape::Centered {
                block_width,
                block_height,
            } => {
                for y in 0..height {
                    map.set_occupant(Point::new(0, y), OccupantId::INVISIBLE_BUCKET);
                    map.set_occupant(Point::new(width - 1, y), OccupantId::INVISIBLE_BUCKET);
                }
                let bw = (block_width as i32).min(iw);
                let bh = (block_height as i32).min(ih);
                let x0 = bucket.left + (iw - bw) / 2;
                let y0 = bucket.top + (ih - bh) / 2;
                for y in y0..y0 + bh {
                    for x in x0..x0 + bw {
                        map.set_occupant(Point::new(x, y), OccupantId::BUCKET);
                    }
                }
            }
        }

        map
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    #[inline]
    pub fn bucket_shape(&self) -> BucketShape {
        self.shape
    }

    #[inline]
    pub fn in_map(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn index_of(&self, p: Point) -> Option<usize> {
        if self.in_map(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Occupant of a cell. Out-of-map reads are a caller bug; release builds see exterior.
    #[inline]
    pub fn occupant_at(&self, p: Point) -> OccupantId {
        debug_assert!(self.in_map(p), "occupant_at out of bounds: {p:?}");
        match self.index_of(p) {
            Some(i) => self.cells[i],
            None => OccupantId::EXTERIOR,
        }
    }

    /// Out-of-map writes assert in debug builds and are dropped in release.
    #[inline]
    pub fn set_occupant(&mut self, p: Point, id: OccupantId) {
        debug_assert!(self.in_map(p), "set_occupant out of bounds: {p:?}");
        if let Some(i) = self.index_of(p) {
            self.cells[i] = id;
        }
    }

    pub fn piece_type(&self, id: OccupantId) -> Option<PieceType> {
        self.types.get(&id).copied()
    }

    pub fn shape_of(&self, id: OccupantId) -> Option<Shape> {
        self.shapes.get(&id).copied()
    }

    /// Record (or retype) an id in the side table.
    pub fn register(&mut self, id: OccupantId, piece_type: PieceType) {
        self.types.insert(id, piece_type);
    }

    pub fn mint_id(&mut self, piece_type: PieceType) -> OccupantId {
        let id = OccupantId(self.next_id);
        self.next_id += 1;
        self.types.insert(id, piece_type);
        id
    }

    pub fn known_ids(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_occupied_type(&self, id: OccupantId) -> bool {
        self.piece_type(id).is_some_and(PieceType::is_occupied)
    }

    pub fn cell_state(&self, p: Point) -> CellState {
        let Some(i) = self.index_of(p) else {
            return CellState::OutOfBounds;
        };
        // an id missing from the side table is mid-mutation; never walk through it
        match self.piece_type(self.cells[i]) {
            Some(t) if t.is_passable() => CellState::Empty,
            Some(t) => CellState::Blocked(t),
            None => CellState::Blocked(PieceType::Unreachable),
        }
    }

    #[inline]
    pub fn is_empty_at(&self, p: Point) -> bool {
        self.cell_state(p) == CellState::Empty
    }

    #[inline]
    fn is_occupied_at(&self, p: Point) -> bool {
        self.index_of(p)
            .is_some_and(|i| self.is_occupied_type(self.cells[i]))
    }

    #[inline]
    fn is_retired_at(&self, p: Point) -> bool {
        self.index_of(p).is_some_and(|i| {
            self.piece_type(self.cells[i]) == Some(PieceType::RetiredGamePiece)
        })
    }

    #[inline]
    fn is_fixed_at(&self, p: Point) -> bool {
        self.index_of(p).is_some_and(|i| {
            matches!(
                self.piece_type(self.cells[i]),
                Some(PieceType::Bucket | PieceType::InvisibleBucket)
            )
        })
    }

    pub fn can_place(&self, points: &[Point]) -> bool {
        points.iter().all(|&p| self.is_empty_at(p))
    }

    /// Write a piece into the grid as retired blocks under its own id.
    pub fn merge_piece(&mut self, piece: &Piece) -> OccupantId {
        let id = piece.id();
        self.register(id, PieceType::RetiredGamePiece);
        self.shapes.insert(id, piece.shape());
        for p in piece.locations_as_points() {
            if self.in_map(p) {
                self.set_occupant(p, id);
            }
        }
        id
    }

    /// Merge a bare point set as one retired object.
    pub fn merge_points(&mut self, points: &[Point], shape: Option<Shape>) -> OccupantId {
        let id = self.mint_id(PieceType::RetiredGamePiece);
        if let Some(shape) = shape {
            self.shapes.insert(id, shape);
        }
        for &p in points {
            if self.in_map(p) {
                self.set_occupant(p, id);
            }
        }
        id
    }

    /// Clear one interior cell back to background.
    pub fn clear_cell(&mut self, p: Point) {
        if self.bucket.contains(p) && !self.is_fixed_at(p) {
            self.set_occupant(p, OccupantId::BACKGROUND);
        }
    }

    /// Every interior cell solid, with at least one retired block among them.
    pub fn is_row_full(&self, y: i32) -> bool {
        let b = self.bucket;
        (b.left..=b.right).all(|x| self.is_occupied_at(Point::new(x, y)))
            && (b.left..=b.right).any(|x| self.is_retired_at(Point::new(x, y)))
    }

    /// All retired cells in the row share one id. Fixed cells do not count.
    fn is_row_homogeneous(&self, y: i32) -> bool {
        let mut ids = (self.bucket.left..=self.bucket.right)
            .map(|x| Point::new(x, y))
            .filter(|&p| self.is_retired_at(p))
            .map(|p| self.occupant_at(p));
        match ids.next() {
            Some(first) => ids.all(|id| id == first),
            None => false,
        }
    }

    /// Remove row `y` and let the cells above fall one row. Fixed cells never
    /// move, and cells resting on a fixed cell stay where they are.
    fn collapse_row(&mut self, y: i32) {
        let b = self.bucket;
        for x in b.left..=b.right {
            if self.is_fixed_at(Point::new(x, y)) {
                continue;
            }
            let mut yy = y;
            loop {
                let dst = Point::new(x, yy);
                if yy == b.top {
                    self.set_occupant(dst, OccupantId::BACKGROUND);
                    break;
                }
                let src = Point::new(x, yy - 1);
                if self.is_fixed_at(src) {
                    self.set_occupant(dst, OccupantId::BACKGROUND);
                    break;
                }
                let id = self.occupant_at(src);
                self.set_occupant(dst, id);
                yy -= 1;
            }
        }
    }

    /// Collapse every full row, bottom-up, rescanning a row after it collapses.
    pub fn collapse_full_rows(&mut self) -> Vec<ClearedRow> {
        let mut cleared = Vec::new();
        let mut y = self.bucket.bottom;
        while y >= self.bucket.top {
            if self.is_row_full(y) {
                let row = ClearedRow {
                    row: y - cleared.len() as i32,
                    homogeneous: self.is_row_homogeneous(y),
                };
                trace!(row = row.row, homogeneous = row.homogeneous, "row collapsed");
                cleared.push(row);
                self.collapse_row(y);
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// True if any row collapsed.
    pub fn drop_bottom_most_full_row(&mut self) -> bool {
        !self.collapse_full_rows().is_empty()
    }

    /// Column connectivity scan, treating `extra` as occupied without touching the grid.
    pub fn unreachable_point_count(&self, extra: &[Point]) -> GapCount {
        let mut count = GapCount::default();
        let b = self.bucket;
        for x in b.left..=b.right {
            let mut covered = false;
            for y in b.top..=b.bottom {
                let p = Point::new(x, y);
                if self.is_occupied_at(p) || extra.contains(&p) {
                    count.blocked += 1;
                    covered = true;
                } else if covered {
                    count.unreachable += 1;
                } else {
                    count.reachable += 1;
                }
            }
        }
        count
    }

    /// No solid cell anywhere from the bucket top to the bottom of the map.
    pub fn column_is_bottomless(&self, x: i32) -> bool {
        (self.bucket.top..self.height).all(|y| !self.is_occupied_at(Point::new(x, y)))
    }

    /// Passable span of the top interior row around the centre column.
    pub fn top_row_entry(&self) -> (i32, i32) {
        let b = self.bucket;
        let center = b.center_x();
        if !self.is_empty_at(Point::new(center, b.top)) {
            return (b.left, b.right);
        }
        let mut left = center;
        while left > b.left && self.is_empty_at(Point::new(left - 1, b.top)) {
            left -= 1;
        }
        let mut right = center;
        while right < b.right && self.is_empty_at(Point::new(right + 1, b.top)) {
            right += 1;
        }
        (left, right)
    }

    /// First solid row scanning down column `x` from the bucket top, or `bottom + 1`.
    pub fn surface_row(&self, x: i32) -> i32 {
        let b = self.bucket;
        (b.top..=b.bottom)
            .find(|&y| self.is_occupied_at(Point::new(x, y)))
            .unwrap_or(b.bottom + 1)
    }

    /// `surface_row` for every interior column, left to right.
    pub fn top_profile(&self) -> Vec<i32> {
        (self.bucket.left..=self.bucket.right)
            .map(|x| self.surface_row(x))
            .collect()
    }

    /// Top-most and bottom-most solid interior rows of a column.
    pub fn column_extent(&self, x: i32) -> Option<(i32, i32)> {
        let b = self.bucket;
        let mut solid = (b.top..=b.bottom).filter(|&y| self.is_occupied_at(Point::new(x, y)));
        let first = solid.next()?;
        let last = solid.last().unwrap_or(first);
        Some((first, last))
    }

    /// Slide `points` down until the next step would hit something. Never mutates.
    pub fn virtual_drop(&self, points: &[Point]) -> Vec<Point> {
        let mut current: Vec<Point> = points.to_vec();
        if current.is_empty() {
            return current;
        }
        loop {
            let next: Vec<Point> = current.iter().map(|p| p.offset(0, 1)).collect();
            if !self.can_place(&next) {
                return current;
            }
            current = next;
        }
    }

    /// Retired cells inside the interior.
    pub fn retired_count(&self) -> usize {
        let b = self.bucket;
        (b.top..=b.bottom)
            .flat_map(|y| (b.left..=b.right).map(move |x| Point::new(x, y)))
            .filter(|&p| self.is_retired_at(p))
            .count()
    }

    /// Turn a square interior a quarter turn about its centre.
    pub fn rotate_interior(&mut self, clockwise: bool) -> bool {
        let b = self.bucket;
        let n = b.width();
        if n != b.height() {
            return false;
        }
        let snapshot: Vec<OccupantId> = (0..n)
            .flat_map(|ly| (0..n).map(move |lx| (lx, ly)))
            .map(|(lx, ly)| self.occupant_at(Point::new(b.left + lx, b.top + ly)))
            .collect();
        for ly in 0..n {
            for lx in 0..n {
                let (tx, ty) = if clockwise {
                    (n - 1 - ly, lx)
                } else {
                    (ly, n - 1 - lx)
                };
                let id = snapshot[(ly * n + lx) as usize];
                self.set_occupant(Point::new(b.left + tx, b.top + ty), id);
            }
        }
        true
    }

    /// Drop side-table entries for ids no longer in the grid. Returns how many went.
    pub fn purge_stale_ids(&mut self, exclude: &[OccupantId]) -> usize {
        let live: FxHashSet<OccupantId> = self.cells.iter().copied().collect();
        let before = self.types.len();
        self.types
            .retain(|id, _| id.is_reserved() || live.contains(id) || exclude.contains(id));
        self.shapes
            .retain(|id, _| live.contains(id) || exclude.contains(id));
        before - self.types.len()
    }
}

impl Index<Point> for GameMap {
    type Output = OccupantId;

    fn index(&self, p: Point) -> &OccupantId {
        debug_assert!(self.in_map(p), "index out of bounds: {p:?}");
        match self.index_of(p) {
            Some(i) => &self.cells[i],
            None => &OccupantId::EXTERIOR,
        }
    }
}

impl fmt::Display for GameMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let glyph = match self.cell_state(Point::new(x, y)) {
                    CellState::Blocked(PieceType::RetiredGamePiece) => "[]",
                    CellState::Blocked(PieceType::InvisibleBucket) => "::",
                    CellState::Blocked(_) => "##",
                    _ => "  ",
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> GameMap {
        GameMap::new(10, 20, 4, BucketShape::Rectangular)
    }

    fn fill_row(map: &mut GameMap, y: i32, skip: &[i32]) {
        let b = *map.bucket();
        for x in (b.left..=b.right).filter(|x| !skip.contains(x)) {
            map.merge_points(&[Point::new(x, y)], None);
        }
    }

    #[test]
    fn test_layout() {
        let map = rect();
        let b = *map.bucket();
        assert_eq!((b.left, b.right, b.top, b.bottom), (1, 10, 4, 23));
        assert_eq!((map.width(), map.height()), (12, 25));
        assert!(map.is_empty_at(Point::new(5, 10)));
        assert!(map.is_empty_at(Point::new(5, 0)));
        assert_eq!(
            map.cell_state(Point::new(0, 10)),
            CellState::Blocked(PieceType::Bucket)
        );
        assert_eq!(
            map.cell_state(Point::new(0, 1)),
            CellState::Blocked(PieceType::InvisibleBucket)
        );
        assert_eq!(
            map.cell_state(Point::new(5, 24)),
            CellState::Blocked(PieceType::Bucket)
        );
        assert_eq!(map.cell_state(Point::new(-1, 3)), CellState::OutOfBounds);
    }

    #[test]
    fn test_subscript_matches_occupant_at() {
        let map = rect();
        let p = Point::new(0, 12);
        assert_eq!(map[p], map.occupant_at(p));
        assert_eq!(map[p], OccupantId::BUCKET);
    }

    #[test]
    fn test_merge_piece_retires_blocks() {
        let mut map = rect();
        let id = map.mint_id(PieceType::GamePiece);
        let piece = Piece::spawn(id, Shape::O, Point::new(1, 22));
        map.merge_piece(&piece);
        assert_eq!(map.piece_type(id), Some(PieceType::RetiredGamePiece));
        assert_eq!(map.shape_of(id), Some(Shape::O));
        for p in piece.locations_as_points() {
            assert_eq!(map[p], id);
            assert!(!map.is_empty_at(p));
        }
        assert_eq!(map.retired_count(), 4);
    }

    #[test]
    fn test_collapse_single_row() {
        let mut map = rect();
        fill_row(&mut map, 23, &[]);
        map.merge_points(&[Point::new(5, 22)], None);
        let cleared = map.collapse_full_rows();
        assert_eq!(cleared, vec![ClearedRow { row: 23, homogeneous: false }]);
        assert!(!map.is_empty_at(Point::new(5, 23)));
        assert_eq!(map.retired_count(), 1);
    }

    #[test]
    fn test_collapse_reports_original_rows() {
        let mut map = rect();
        fill_row(&mut map, 23, &[]);
        fill_row(&mut map, 22, &[]);
        fill_row(&mut map, 21, &[3]);
        fill_row(&mut map, 20, &[]);
        let cleared = map.collapse_full_rows();
        let rows: Vec<i32> = cleared.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![23, 22, 20]);
        // the partial row fell three rows onto the floor
        assert!(map.is_empty_at(Point::new(3, 23)));
        assert!(!map.is_empty_at(Point::new(4, 23)));
        assert_eq!(map.retired_count(), 9);
    }

    #[test]
    fn test_no_full_row() {
        let mut map = rect();
        fill_row(&mut map, 23, &[1]);
        assert!(!map.drop_bottom_most_full_row());
        assert_eq!(map.retired_count(), 9);
    }

    #[test]
    fn test_homogeneous_row() {
        let mut map = GameMap::new(4, 6, 2, BucketShape::Rectangular);
        let id = map.mint_id(PieceType::GamePiece);
        let piece = Piece::spawn(id, Shape::I, Point::new(1, 7));
        map.merge_piece(&piece);
        let cleared = map.collapse_full_rows();
        assert_eq!(cleared, vec![ClearedRow { row: 7, homogeneous: true }]);
    }

    #[test]
    fn test_gap_count_empty_bucket() {
        let map = rect();
        let gaps = map.unreachable_point_count(&[]);
        assert_eq!(gaps.unreachable, 0);
        assert_eq!(gaps.blocked, 0);
        assert_eq!(gaps.reachable, 200);
    }

    #[test]
    fn test_gap_count_overhang() {
        let mut map = rect();
        map.merge_points(&[Point::new(4, 20)], None);
        let gaps = map.unreachable_point_count(&[]);
        assert_eq!(gaps.unreachable, 3);
        assert_eq!(gaps.blocked, 1);
    }

    #[test]
    fn test_gap_count_hypothetical_does_not_mutate() {
        let map = rect();
        let before = map.clone();
        let gaps = map.unreachable_point_count(&[Point::new(2, 21)]);
        assert_eq!(gaps.unreachable, 2);
        assert_eq!(map.cells, before.cells);
    }

    #[test]
    fn test_virtual_drop_lands_on_floor_and_stack() {
        let mut map = rect();
        let pts = vec![Point::new(3, 0), Point::new(4, 0)];
        assert_eq!(
            map.virtual_drop(&pts),
            vec![Point::new(3, 23), Point::new(4, 23)]
        );
        map.merge_points(&[Point::new(4, 23)], None);
        assert_eq!(
            map.virtual_drop(&pts),
            vec![Point::new(3, 22), Point::new(4, 22)]
        );
    }

    #[test]
    fn test_top_profile() {
        let mut map = rect();
        map.merge_points(&[Point::new(1, 19), Point::new(1, 23)], None);
        let profile = map.top_profile();
        assert_eq!(profile[0], 19);
        assert_eq!(profile[1], 24);
        assert_eq!(map.column_extent(1), Some((19, 23)));
        assert_eq!(map.column_extent(2), None);
    }

    #[test]
    fn test_centered_bucket_bottomless_columns() {
        let map = GameMap::new(8, 8, 3, BucketShape::Centered {
            block_width: 2,
            block_height: 2,
        });
        let b = *map.bucket();
        assert!(map.column_is_bottomless(b.left));
        assert!(map.column_is_bottomless(b.right));
        assert!(!map.column_is_bottomless(b.left + 3));
        assert!(!map.column_is_bottomless(b.left + 4));
        assert_eq!(map.top_row_entry(), (b.left, b.right));
    }

    #[test]
    fn test_rectangular_never_bottomless() {
        let map = rect();
        let b = *map.bucket();
        assert!((b.left..=b.right).all(|x| !map.column_is_bottomless(x)));
    }

    #[test]
    fn test_top_row_entry_narrows() {
        let mut map = rect();
        let b = *map.bucket();
        map.merge_points(&[Point::new(3, b.top), Point::new(8, b.top)], None);
        assert_eq!(map.top_row_entry(), (4, 7));
    }

    fn centered() -> GameMap {
        GameMap::new(8, 8, 3, BucketShape::Centered {
            block_width: 2,
            block_height: 2,
        })
    }

    #[test]
    fn test_row_through_obstruction_clears() {
        let mut map = centered();
        let b = *map.bucket();
        // obstruction covers columns 4..=5 on rows 6..=7
        let y = 6;
        let gaps: Vec<Point> = (b.left..=b.right)
            .map(|x| Point::new(x, y))
            .filter(|&p| map.is_empty_at(p))
            .collect();
        assert_eq!(gaps.len(), 6);
        let id = map.merge_points(&gaps, None);
        map.merge_points(&[Point::new(2, 5), Point::new(4, 5)], None);
        assert!(map.is_row_full(y));

        let cleared = map.collapse_full_rows();
        assert_eq!(cleared, vec![ClearedRow { row: y, homogeneous: true }]);
        assert_eq!(map[Point::new(4, 6)], OccupantId::BUCKET);
        assert_eq!(map[Point::new(5, 7)], OccupantId::BUCKET);
        // column 2 falls into the cleared row, column 4 rests on the obstruction
        assert!(!map.is_empty_at(Point::new(2, 6)));
        assert!(map.is_empty_at(Point::new(2, 5)));
        assert!(!map.is_empty_at(Point::new(4, 5)));
        assert!(map.is_empty_at(Point::new(1, 6)));
        assert!((b.left..=b.right).all(|x| map[Point::new(x, y)] != id));
        assert_eq!(map.retired_count(), 2);
    }

    #[test]
    fn test_obstruction_alone_is_not_full() {
        let mut map = centered();
        assert!(!map.is_row_full(6));
        assert!(map.collapse_full_rows().is_empty());
        assert_eq!(map[Point::new(4, 6)], OccupantId::BUCKET);
    }

    #[test]
    fn test_rotate_interior() {
        let mut map = GameMap::new(4, 4, 2, BucketShape::Rectangular);
        let b = *map.bucket();
        let id = map.merge_points(&[Point::new(b.left, b.top)], None);
        assert!(map.rotate_interior(true));
        assert_eq!(map[Point::new(b.right, b.top)], id);
        assert!(map.rotate_interior(false));
        assert_eq!(map[Point::new(b.left, b.top)], id);
        assert!(!rect().rotate_interior(true));
    }

    #[test]
    fn test_purge_stale_ids() {
        let mut map = rect();
        let gone = map.mint_id(PieceType::GamePiece);
        let live = map.mint_id(PieceType::GamePiece);
        let kept = map.merge_points(&[Point::new(2, 23)], None);
        let removed = map.purge_stale_ids(&[live]);
        assert_eq!(removed, 1);
        assert_eq!(map.piece_type(gone), None);
        assert_eq!(map.piece_type(live), Some(PieceType::GamePiece));
        assert_eq!(map.piece_type(kept), Some(PieceType::RetiredGamePiece));
        assert_eq!(map.piece_type(OccupantId::UNREACHABLE), Some(PieceType::Unreachable));
    }

    #[test]
    fn test_clone_is_independent() {
        let map = rect();
        let mut copy = map.clone();
        copy.merge_points(&[Point::new(2, 23)], None);
        assert_eq!(map.retired_count(), 0);
        assert_eq!(copy.retired_count(), 1);
    }
}
