//! Experimental multi-piece search over the factory preview.
//!
//! Every branch merges its placement into its own clone of the map, so the
//! live map is never touched. First-ply branches run in parallel.

use cascade_core::{GameMap, Piece, PieceType, Shape};
use cascade_engine::spawn_position;
use cascade_eval::PlacementHeuristic;
use rayon::prelude::*;
use tracing::debug;

use crate::best_fit::{assert_origin, evaluate_all, score_cmp, SENTINEL_SCORE};
use crate::candidate::Candidate;

pub const MAX_DEPTH: usize = 3;

#[derive(Clone, Debug)]
pub struct LookaheadFit {
    /// Preview pieces searched after the live one.
    pub depth: usize,
    /// Placements kept per ply below the first.
    pub beam_width: usize,
    pub heuristic: PlacementHeuristic,
}

impl LookaheadFit {
    pub fn new(depth: usize, heuristic: PlacementHeuristic) -> Self {
        Self {
            depth: depth.clamp(1, MAX_DEPTH),
            beam_width: 8,
            heuristic,
        }
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width.max(1);
        self
    }

    /// Best first placement for `piece`, scored as the sum of its own score and the
    /// best follow-up over `preview`. The candidate's `score` carries that sum.
    ///
    /// # Panics
    /// If `piece` has no origin block.
    pub fn search(&self, piece: &Piece, map: &GameMap, preview: &[Shape]) -> Option<Candidate> {
        assert_origin(piece);
        let rest = &preview[..self.depth.min(preview.len())];
        let first = evaluate_all(piece, map, self.heuristic);

        let totals: Vec<f64> = first
            .par_iter()
            .map(|c| c.score + self.follow_up(map, c, rest))
            .collect();

        let mut best: Option<Candidate> = None;
        let mut best_score = SENTINEL_SCORE;
        for (candidate, total) in first.into_iter().zip(totals) {
            if total > best_score {
                best_score = total;
                best = Some(Candidate {
                    score: total,
                    ..candidate
                });
            }
        }
        debug!(
            depth = rest.len(),
            score = best_score,
            found = best.is_some(),
            "look-ahead search"
        );
        best
    }

    /// Best achievable score for the remaining shapes after `placed` lands.
    fn follow_up(&self, map: &GameMap, placed: &Candidate, rest: &[Shape]) -> f64 {
        let Some((&shape, rest)) = rest.split_first() else {
            return 0.0;
        };
        let mut next = map.clone();
        next.merge_points(&placed.dropped, None);
        next.collapse_full_rows();

        let id = next.mint_id(PieceType::GamePiece);
        let piece = Piece::spawn(id, shape, spawn_position(&next, shape));
        if !next.can_place(&piece.locations_as_points()) {
            return SENTINEL_SCORE;
        }

        let mut candidates = evaluate_all(&piece, &next, self.heuristic);
        if candidates.is_empty() {
            return SENTINEL_SCORE;
        }
        candidates.sort_by(|a, b| score_cmp(a.score, b.score));
        candidates.truncate(self.beam_width);
        candidates
            .iter()
            .map(|c| c.score + self.follow_up(&next, c, rest))
            .fold(SENTINEL_SCORE, f64::max)
    }
}
