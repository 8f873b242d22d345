//! Best-fit placement: pick the orientation and column for the live piece and
//! turn the choice into motion commands.

use std::cmp::Ordering;

use cascade_core::geometry::translate;
use cascade_core::{Direction, GameMap, Piece, QuarterTurns};
use cascade_engine::MotionQueue;
use cascade_eval::PlacementHeuristic;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::{drop_at, orientations, Candidate, Orientation};
use crate::classifier::{BucketClassifier, CenteredBucket, FlatBucket, Side, SplitRule};
use crate::stepping::StepState;

/// Score reported when no placement beat the starting bar.
pub const SENTINEL_SCORE: f64 = -10000.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum AiKind {
    /// Rectangular buckets; always the general search.
    #[default]
    Standard,
    /// Centered buckets, halves split at the obstruction.
    Rotating,
    /// Centered buckets, halves split at the midpoint.
    Cubic,
}

impl AiKind {
    pub fn classifier(self) -> Box<dyn BucketClassifier> {
        match self {
            AiKind::Standard => Box::new(FlatBucket),
            AiKind::Rotating => Box::new(CenteredBucket::new(SplitRule::Obstruction)),
            AiKind::Cubic => Box::new(CenteredBucket::new(SplitRule::Midpoint)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AiConfig {
    pub kind: AiKind,
    pub heuristic: PlacementHeuristic,
    /// Preview pieces to search ahead; 0 keeps the single-piece search.
    pub look_ahead: usize,
}

impl AiConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn rotating() -> Self {
        Self {
            kind: AiKind::Rotating,
            ..Self::default()
        }
    }

    pub fn cubic() -> Self {
        Self {
            kind: AiKind::Cubic,
            ..Self::default()
        }
    }
}

pub(crate) fn score_cmp(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Score every (orientation, column) whose start cells are free, in search order.
pub fn evaluate_all(piece: &Piece, map: &GameMap, heuristic: PlacementHeuristic) -> Vec<Candidate> {
    let baseline = map.unreachable_point_count(&[]).unreachable;
    let mut out = Vec::new();
    for orientation in orientations(piece) {
        for column in orientation.columns(map) {
            if let Some(candidate) = evaluate(map, &orientation, column, heuristic, baseline) {
                out.push(candidate);
            }
        }
    }
    out
}

pub(crate) fn evaluate(
    map: &GameMap,
    orientation: &Orientation,
    column: i32,
    heuristic: PlacementHeuristic,
    baseline: u32,
) -> Option<Candidate> {
    let dropped = drop_at(map, orientation, column)?;
    let score = heuristic.score(map, &dropped, baseline);
    Some(Candidate {
        turns: orientation.turns,
        column,
        dropped,
        score,
        plan: orientation.plan(column, 0),
    })
}

/// First candidate with the strictly highest score above the sentinel.
pub fn general_search(piece: &Piece, map: &GameMap, heuristic: PlacementHeuristic) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_score = SENTINEL_SCORE;
    for candidate in evaluate_all(piece, map, heuristic) {
        if candidate.score > best_score {
            best_score = candidate.score;
            best = Some(candidate);
        }
    }
    best
}

/// Placement search needs a rotation pivot.
pub(crate) fn assert_origin(piece: &Piece) {
    assert!(
        piece.origin_offset().is_some(),
        "piece {:?} ({:?}) has no origin block",
        piece.id(),
        piece.shape()
    );
}

/// Smallest descent after which the piece can turn to `turns` without colliding.
pub fn initial_move_down(map: &GameMap, piece: &Piece, turns: QuarterTurns) -> Option<u32> {
    (0..map.height()).find_map(|k| {
        let points = piece.moved(0, k).rotated_points(turns.steps());
        map.can_place(&points).then_some(k as u32)
    })
}

pub struct BestFit {
    config: AiConfig,
    classifier: Box<dyn BucketClassifier>,
    last: Option<Candidate>,
    pub(crate) stepping: Option<StepState>,
}

impl BestFit {
    pub fn new(config: AiConfig) -> Self {
        Self {
            classifier: config.kind.classifier(),
            config,
            last: None,
            stepping: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Placement chosen by the last completed search.
    pub fn last_choice(&self) -> Option<&Candidate> {
        self.last.as_ref()
    }

    pub(crate) fn set_last(&mut self, choice: Option<Candidate>) {
        self.last = choice;
    }

    /// Side to slide toward, or None when both halves have floors everywhere.
    pub fn slide_side(&self, map: &GameMap) -> Option<Side> {
        let c = &self.classifier;
        if c.is_side_complete(map, Side::Left) && c.is_side_complete(map, Side::Right) {
            return None;
        }
        let left = c.bottomless_columns(map, Side::Left);
        let right = c.bottomless_columns(map, Side::Right);
        Some(if right > left { Side::Right } else { Side::Left })
    }

    /// Search a placement for `piece`, refill `queue` and return the chosen score.
    ///
    /// # Panics
    /// If `piece` has no origin block.
    pub fn best_fit(&mut self, piece: &Piece, map: &GameMap, queue: &mut MotionQueue) -> f64 {
        assert_origin(piece);
        queue.clear();

        let choice = self
            .slide_placement(piece, map)
            .or_else(|| general_search(piece, map, self.config.heuristic));

        let score = match &choice {
            Some(c) => {
                queue.load(&c.plan);
                debug!(
                    kind = ?self.config.kind,
                    turns = c.turns.steps(),
                    column = c.column,
                    score = c.score,
                    "best fit"
                );
                c.score
            }
            None => {
                queue.enqueue(Direction::DropDown);
                debug!(kind = ?self.config.kind, "no placement beat the sentinel");
                SENTINEL_SCORE
            }
        };
        self.last = choice;
        score
    }

    /// Side-slide candidate for a bucket with bottomless columns. None when both
    /// halves have floors or the slide cannot start.
    pub(crate) fn slide_placement(&self, piece: &Piece, map: &GameMap) -> Option<Candidate> {
        let side = self.slide_side(map)?;
        let choice = self.side_slide(piece, map, side);
        if choice.is_none() {
            debug!(?side, "side slide blocked, falling back to the general search");
        }
        choice
    }

    /// Widest orientation, leading edge on the floor column of `side` nearest the centre.
    fn side_slide(&self, piece: &Piece, map: &GameMap, side: Side) -> Option<Candidate> {
        let sides = self.classifier.sides(map)?;
        let orientation = orientations(piece)
            .into_iter()
            .fold(None::<Orientation>, |best, o| match best {
                Some(b) if b.bounds.width() >= o.bounds.width() => Some(b),
                _ => Some(o),
            })?;
        let width = orientation.bounds.width();

        let anchor = self
            .classifier
            .nearest_floor_column(map, side)
            .unwrap_or(match side {
                Side::Left => *sides.left.end() + 1,
                Side::Right => *sides.right.start() - 1,
            });
        let wanted = match side {
            Side::Left => anchor,
            Side::Right => anchor - width + 1,
        };
        let range = orientation.columns(map);
        if range.is_empty() {
            return None;
        }
        let column = wanted.clamp(*range.start(), *range.end());

        let down = initial_move_down(map, piece, orientation.turns)?;
        let start = translate(&orientation.at_column(column), 0, down as i32);
        if !map.can_place(&start) {
            return None;
        }
        let dropped = map.virtual_drop(&start);
        let baseline = map.unreachable_point_count(&[]).unreachable;
        let score = self.config.heuristic.score(map, &dropped, baseline);
        debug!(?side, anchor, column, down, "side slide");
        Some(Candidate {
            turns: orientation.turns,
            column,
            dropped,
            score,
            plan: orientation.plan(column, down),
        })
    }
}

impl Default for BestFit {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

impl std::fmt::Debug for BestFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestFit")
            .field("config", &self.config)
            .field("last", &self.last)
            .field("stepping", &self.stepping.is_some())
            .finish()
    }
}
