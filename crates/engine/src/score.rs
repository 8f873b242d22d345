//! Running game score and the rules that feed it.

use cascade_core::{Bucket, GameMap, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const BLOCK_POINTS: i64 = 1;
pub const ON_BOTTOM_POINTS: i64 = 100;
pub const LOCATION_MULTIPLIER: i64 = 4;
pub const GAP_DELTA_MULTIPLIER: i64 = 10;
pub const GAP_ADJUSTMENT: i64 = 5;
pub const ROW_DELETED_MULTIPLIER: i64 = 1000;
pub const ROW_DELETED_LOCATION_BONUS: i64 = 20;
pub const HOMOGENEOUS_ROW_MULTIPLIER: i64 = 5000;
pub const MAP_MEAN_COLUMN_DELTA: i64 = 2;
pub const PIECE_OUT_OF_BOUNDS: i64 = 3000;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum ScoreRule {
    RowCollapse,
    MapCondition,
    GapDelta,
    GapCount,
    PieceBlockCount,
    PieceBlockLocation,
    /// Placement search only - blocks left above the bucket top.
    PieceOutOfBounds,
}

impl ScoreRule {
    pub const ALL: [ScoreRule; 7] = [
        ScoreRule::RowCollapse,
        ScoreRule::MapCondition,
        ScoreRule::GapDelta,
        ScoreRule::GapCount,
        ScoreRule::PieceBlockCount,
        ScoreRule::PieceBlockLocation,
        ScoreRule::PieceOutOfBounds,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Bit-set of enabled rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct ScoreRules(u8);

impl ScoreRules {
    pub const EMPTY: Self = Self(0);

    pub fn all() -> Self {
        ScoreRule::ALL.into_iter().collect()
    }

    /// Rules for the live game score.
    pub fn game() -> Self {
        [
            ScoreRule::RowCollapse,
            ScoreRule::MapCondition,
            ScoreRule::GapDelta,
            ScoreRule::PieceBlockCount,
            ScoreRule::PieceBlockLocation,
        ]
        .into_iter()
        .collect()
    }

    /// Rules for ranking hypothetical placements.
    pub fn placement() -> Self {
        [
            ScoreRule::RowCollapse,
            ScoreRule::GapDelta,
            ScoreRule::GapCount,
            ScoreRule::PieceBlockLocation,
            ScoreRule::PieceOutOfBounds,
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn contains(self, rule: ScoreRule) -> bool {
        self.0 & rule.bit() != 0
    }

    pub fn with(self, rule: ScoreRule) -> Self {
        Self(self.0 | rule.bit())
    }

    pub fn without(self, rule: ScoreRule) -> Self {
        Self(self.0 & !rule.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = ScoreRule> {
        ScoreRule::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<ScoreRule> for ScoreRules {
    fn from_iter<I: IntoIterator<Item = ScoreRule>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Integer score accumulator. Each event method returns the delta it applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scorer {
    score: i64,
    previous: i64,
    rules: ScoreRules,
    allow_negative: bool,
}

impl Scorer {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            score: 0,
            previous: 0,
            rules,
            allow_negative: true,
        }
    }

    pub fn with_allow_negative(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    #[inline]
    pub fn rules(&self) -> ScoreRules {
        self.rules
    }

    pub fn set_rules(&mut self, rules: ScoreRules) {
        self.rules = rules;
    }

    /// Displayed score: the accumulator, or 0 when negative totals are disallowed.
    pub fn current(&self) -> i64 {
        if !self.allow_negative && self.score < 0 {
            0
        } else {
            self.score
        }
    }

    /// Accumulator without clamping.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.score
    }

    /// Accumulator before the most recent mutation.
    #[inline]
    pub fn previous(&self) -> i64 {
        self.previous
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.previous = 0;
    }

    fn apply(&mut self, reason: &'static str, delta: i64) -> i64 {
        self.previous = self.score;
        self.score += delta;
        debug!(reason, delta, total = self.score, "score adjusted");
        delta
    }

    pub fn adjust_score(&mut self, delta: i64) -> i64 {
        self.apply("adjust", delta)
    }

    pub fn add_piece_block_count(&mut self, blocks: usize) -> i64 {
        if !self.rules.contains(ScoreRule::PieceBlockCount) {
            return 0;
        }
        self.apply("piece_block_count", blocks as i64 * BLOCK_POINTS)
    }

    /// Reward blocks for resting low; optionally punish blocks outside the bucket rows.
    pub fn score_locations(&mut self, points: &[Point], bucket: &Bucket) -> i64 {
        let mut delta = 0;
        if self.rules.contains(ScoreRule::PieceBlockLocation) {
            let height = bucket.height() as i64;
            for p in points.iter().filter(|p| p.y <= bucket.floor_row()) {
                if p.y == bucket.floor_row() {
                    delta += ON_BOTTOM_POINTS;
                }
                let level = (bucket.level_of(p.y) as i64).clamp(0, height);
                delta += (height - level) * LOCATION_MULTIPLIER / height;
            }
        }
        if self.rules.contains(ScoreRule::PieceOutOfBounds) {
            let out = points
                .iter()
                .filter(|p| p.y < bucket.top || p.y > bucket.bottom)
                .count() as i64;
            delta -= out * PIECE_OUT_OF_BOUNDS;
        }
        if delta == 0 {
            return 0;
        }
        self.apply("locations", delta)
    }

    /// Fewer gaps than before is positive; the absolute count is a separate penalty.
    pub fn gap_delta(&mut self, old_count: u32, new_count: u32) -> i64 {
        let mut delta = 0;
        if self.rules.contains(ScoreRule::GapDelta) {
            delta += (old_count as i64 - new_count as i64) * GAP_DELTA_MULTIPLIER;
        }
        if self.rules.contains(ScoreRule::GapCount) {
            delta -= new_count as i64 * GAP_ADJUSTMENT;
        }
        if delta == 0 {
            return 0;
        }
        self.apply("gaps", delta)
    }

    /// Rows in clearance order. Each row's bonus compounds onto the ones before it,
    /// so clearing several rows at once pays more than clearing them one by one.
    pub fn score_cleared_rows(&mut self, rows: &[i32], homogeneous: usize, bucket: &Bucket) -> i64 {
        if !self.rules.contains(ScoreRule::RowCollapse) || rows.is_empty() {
            return 0;
        }
        let height = bucket.height() as i64;
        let mut running = 0i64;
        let mut delta = 0i64;
        for (i, &row) in rows.iter().enumerate() {
            let level = bucket.level_of(row) as i64;
            running += (i as i64 + 1) * ROW_DELETED_MULTIPLIER
                + (level - height) * ROW_DELETED_LOCATION_BONUS;
            delta += running;
        }
        delta += homogeneous as i64 * HOMOGENEOUS_ROW_MULTIPLIER;
        self.apply("rows_cleared", delta)
    }

    /// Penalise uneven columns: mean vertical spread of solid cells per column.
    pub fn score_map_condition(&mut self, map: &GameMap) -> i64 {
        if !self.rules.contains(ScoreRule::MapCondition) {
            return 0;
        }
        let b = map.bucket();
        let spread: i64 = (b.left..=b.right)
            .filter_map(|x| map.column_extent(x))
            .map(|(top, bottom)| (bottom - top).abs() as i64)
            .sum();
        let mean = spread / b.width() as i64;
        if mean == 0 {
            return 0;
        }
        self.apply("map_condition", -mean * MAP_MEAN_COLUMN_DELTA)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoreRules::game())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::BucketShape;

    fn bucket() -> Bucket {
        Bucket {
            left: 1,
            right: 10,
            top: 4,
            bottom: 23,
        }
    }

    fn all_rules() -> Scorer {
        Scorer::new(ScoreRules::all())
    }

    #[test]
    fn test_rule_set() {
        let rules = ScoreRules::EMPTY.with(ScoreRule::GapDelta);
        assert!(rules.contains(ScoreRule::GapDelta));
        assert!(!rules.contains(ScoreRule::GapCount));
        assert!(!rules.without(ScoreRule::GapDelta).contains(ScoreRule::GapDelta));
        assert_eq!(ScoreRules::all().iter().count(), 7);
        assert!(!ScoreRules::game().contains(ScoreRule::PieceOutOfBounds));
        assert!(ScoreRules::placement().contains(ScoreRule::PieceOutOfBounds));
    }

    #[test]
    fn test_block_count() {
        let mut s = all_rules();
        assert_eq!(s.add_piece_block_count(4), 4);
        assert_eq!(s.current(), 4);
        assert_eq!(s.previous(), 0);
    }

    #[test]
    fn test_disabled_rule_is_noop() {
        let mut s = Scorer::new(ScoreRules::EMPTY);
        assert_eq!(s.add_piece_block_count(4), 0);
        assert_eq!(s.gap_delta(3, 0), 0);
        assert_eq!(s.score_cleared_rows(&[23], 0, &bucket()), 0);
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn test_locations_on_floor() {
        let mut s = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::PieceBlockLocation));
        let delta = s.score_locations(&[Point::new(3, 23)], &bucket());
        assert_eq!(delta, ON_BOTTOM_POINTS + LOCATION_MULTIPLIER);
    }

    #[test]
    fn test_locations_lower_is_better() {
        let b = bucket();
        let mut low = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::PieceBlockLocation));
        let mut high = low.clone();
        let low_delta = low.score_locations(&[Point::new(3, 22)], &b);
        let high_delta = high.score_locations(&[Point::new(3, 8)], &b);
        assert!(low_delta > high_delta);
    }

    #[test]
    fn test_out_of_bounds_penalty() {
        let mut s = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::PieceOutOfBounds));
        let delta = s.score_locations(&[Point::new(3, 2), Point::new(3, 3), Point::new(3, 4)], &bucket());
        assert_eq!(delta, -2 * PIECE_OUT_OF_BOUNDS);
    }

    #[test]
    fn test_blocks_below_floor_score_nothing_but_penalty() {
        let b = bucket();
        let below = [Point::new(3, b.bottom + 1), Point::new(4, b.bottom + 1)];
        let mut loc = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::PieceBlockLocation));
        assert_eq!(loc.score_locations(&below, &b), 0);
        let mut s = Scorer::new(ScoreRules::placement());
        assert_eq!(s.score_locations(&below, &b), -2 * PIECE_OUT_OF_BOUNDS);
    }

    #[test]
    fn test_gap_delta_and_count() {
        let mut s = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::GapDelta));
        assert_eq!(s.gap_delta(5, 2), 30);
        let mut s = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::GapCount));
        assert_eq!(s.gap_delta(5, 2), -10);
        let mut s = Scorer::new(ScoreRules::EMPTY.with(ScoreRule::GapDelta).with(ScoreRule::GapCount));
        assert_eq!(s.gap_delta(0, 1), -15);
    }

    #[test]
    fn test_cleared_rows_compound() {
        let b = bucket();
        let mut s = all_rules();
        // floor row: level 0, so each row carries -20 * 20 = -400
        let one = s.score_cleared_rows(&[23], 0, &b);
        assert_eq!(one, 1000 - 400);
        let mut s = all_rules();
        let two = s.score_cleared_rows(&[23, 23], 0, &b);
        // running: 600, then 600 + 2000 - 400 = 2200
        assert_eq!(two, 600 + 2200);
        assert!(two > 2 * one);
    }

    #[test]
    fn test_higher_clear_scores_more() {
        let b = bucket();
        let mut near_top = all_rules();
        let mut near_floor = all_rules();
        let top = near_top.score_cleared_rows(&[b.top + 1], 0, &b);
        let floor = near_floor.score_cleared_rows(&[b.bottom], 0, &b);
        assert!(top > floor);
    }

    #[test]
    fn test_homogeneous_bonus() {
        let b = bucket();
        let mut plain = all_rules();
        let mut homogeneous = all_rules();
        let a = plain.score_cleared_rows(&[23], 0, &b);
        let h = homogeneous.score_cleared_rows(&[23], 1, &b);
        assert_eq!(h - a, HOMOGENEOUS_ROW_MULTIPLIER);
    }

    #[test]
    fn test_map_condition() {
        let mut map = GameMap::new(4, 10, 2, BucketShape::Rectangular);
        let b = *map.bucket();
        // one column spans 8 rows, the rest are empty: mean 8 / 4 = 2
        map.merge_points(&[Point::new(b.left, b.bottom), Point::new(b.left, b.bottom - 8)], None);
        let mut s = all_rules();
        assert_eq!(s.score_map_condition(&map), -2 * MAP_MEAN_COLUMN_DELTA);
    }

    #[test]
    fn test_negative_clamp() {
        let mut s = all_rules().with_allow_negative(false);
        s.adjust_score(-50);
        assert_eq!(s.raw(), -50);
        assert_eq!(s.current(), 0);
        let mut s = all_rules();
        s.adjust_score(-50);
        assert_eq!(s.current(), -50);
    }

    #[test]
    fn test_previous_and_reset() {
        let mut s = all_rules();
        s.adjust_score(10);
        s.adjust_score(5);
        assert_eq!(s.previous(), 10);
        assert_eq!(s.current(), 15);
        s.reset();
        assert_eq!((s.current(), s.previous()), (0, 0));
    }
}
