//! Cascade eval crate - heuristics for ranking a piece's resting position.

use cascade_core::{GameMap, Point};
use cascade_engine::{ScoreRules, Scorer};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Penalty per block left above the bucket top or below its bottom row.
pub const ABOVE_TOP_PENALTY: f64 = 100.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum PlacementHeuristic {
    /// Fit the piece's underside against the stack's top surface.
    #[default]
    OffsetMapping,
    /// Run the placement score rules against a scratch copy of the map.
    RuleScoring,
}

impl PlacementHeuristic {
    /// Score `dropped` (already at rest) against `map`. Higher is better.
    pub fn score(self, map: &GameMap, dropped: &[Point], baseline_gaps: u32) -> f64 {
        match self {
            PlacementHeuristic::OffsetMapping => offset_mapping_score(map, dropped),
            PlacementHeuristic::RuleScoring => {
                rule_score(map, dropped, baseline_gaps, ScoreRules::placement())
            }
        }
    }
}

/// Lowest block of the piece in each column it covers.
fn bottom_profile(points: &[Point]) -> FxHashMap<i32, i32> {
    let mut profile: FxHashMap<i32, i32> = FxHashMap::default();
    for p in points {
        profile
            .entry(p.x)
            .and_modify(|y| *y = (*y).max(p.y))
            .or_insert(p.y);
    }
    profile
}

/// Mean row of the dropped blocks, less the mean gap between the piece's
/// underside and the stack surface, less a heavy penalty per block outside the
/// bucket rows. Blocks that fell through a bottomless column count as outside.
pub fn offset_mapping_score(map: &GameMap, dropped: &[Point]) -> f64 {
    if dropped.is_empty() {
        return f64::MIN;
    }
    let n = dropped.len() as f64;
    let mean_y = dropped.iter().map(|p| p.y as f64).sum::<f64>() / n;

    let profile = bottom_profile(dropped);
    let gap_sum: i32 = profile
        .iter()
        .map(|(&x, &bottom)| (map.surface_row(x) - bottom - 1).max(0))
        .sum();
    let mean_gap = gap_sum as f64 / profile.len() as f64;

    let b = map.bucket();
    let outside = dropped
        .iter()
        .filter(|p| p.y < b.top || p.y > b.bottom)
        .count() as f64;

    mean_y - mean_gap - ABOVE_TOP_PENALTY * outside
}

/// Apply `rules` to a scratch copy with `dropped` merged in. Returns the total delta.
pub fn rule_score(map: &GameMap, dropped: &[Point], baseline_gaps: u32, rules: ScoreRules) -> f64 {
    let bucket = *map.bucket();
    let mut scratch = map.clone();
    let mut scorer = Scorer::new(rules);

    scratch.merge_points(dropped, None);
    let cleared = scratch.collapse_full_rows();
    let gaps = scratch.unreachable_point_count(&[]).unreachable;

    scorer.add_piece_block_count(dropped.len());
    scorer.score_locations(dropped, &bucket);
    scorer.gap_delta(baseline_gaps, gaps);
    if !cleared.is_empty() {
        let rows: Vec<i32> = cleared.iter().map(|c| c.row).collect();
        let homogeneous = cleared.iter().filter(|c| c.homogeneous).count();
        scorer.score_cleared_rows(&rows, homogeneous, &bucket);
    }
    scorer.score_map_condition(&scratch);

    trace!(score = scorer.raw(), rows = cleared.len(), gaps, "rule score");
    scorer.raw() as f64
}
