//! Incremental form of `best_fit`: one candidate per `step` call, so a
//! frame-driven caller can spread a decision across frames. A side slide is
//! decided up front and leaves nothing to step.

use cascade_core::{Direction, GameMap, Piece};
use cascade_engine::MotionQueue;

use crate::best_fit::{assert_origin, evaluate, BestFit, SENTINEL_SCORE};
use crate::candidate::{orientations, Candidate, Orientation};

#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// A candidate was scored; `improved` when it became the new best.
    Scored { candidate: Candidate, improved: bool },
    /// The start cells for this column were taken.
    Skipped { column: i32 },
    /// Nothing left to evaluate.
    Finished,
}

#[derive(Clone, Debug)]
pub(crate) struct StepState {
    orientations: Vec<Orientation>,
    baseline: u32,
    angle_index: usize,
    column: i32,
    best: Option<Candidate>,
    best_score: f64,
    steps: usize,
}

impl StepState {
    /// Move the cursor past exhausted orientations.
    fn settle(&mut self, map: &GameMap) {
        while let Some(o) = self.orientations.get(self.angle_index) {
            if self.column <= *o.columns(map).end() {
                break;
            }
            self.angle_index += 1;
            self.column = map.bucket().left;
        }
    }

    fn is_finished(&self) -> bool {
        self.angle_index >= self.orientations.len()
    }
}

impl BestFit {
    /// Begin an incremental search for `piece`.
    ///
    /// # Panics
    /// If `piece` has no origin block.
    pub fn start_stepping(&mut self, piece: &Piece, map: &GameMap) {
        assert_origin(piece);
        if let Some(slide) = self.slide_placement(piece, map) {
            self.stepping = Some(StepState {
                orientations: Vec::new(),
                baseline: 0,
                angle_index: 0,
                column: map.bucket().left,
                best_score: slide.score,
                best: Some(slide),
                steps: 0,
            });
            return;
        }
        let mut state = StepState {
            orientations: orientations(piece),
            baseline: map.unreachable_point_count(&[]).unreachable,
            angle_index: 0,
            column: map.bucket().left,
            best: None,
            best_score: SENTINEL_SCORE,
            steps: 0,
        };
        state.settle(map);
        self.stepping = Some(state);
    }

    pub fn is_stepping(&self) -> bool {
        self.stepping.is_some()
    }

    /// True once every candidate has been visited.
    pub fn is_step_complete(&self) -> bool {
        self.stepping.as_ref().is_some_and(StepState::is_finished)
    }

    /// Evaluate the next candidate.
    ///
    /// # Panics
    /// If called before `start_stepping`.
    pub fn step(&mut self, map: &GameMap) -> StepOutcome {
        let heuristic = self.config().heuristic;
        let Some(state) = self.stepping.as_mut() else {
            panic!("step called before start_stepping");
        };
        let Some(orientation) = state.orientations.get(state.angle_index) else {
            return StepOutcome::Finished;
        };
        let column = state.column;
        let outcome = match evaluate(map, orientation, column, heuristic, state.baseline) {
            Some(candidate) => {
                let improved = candidate.score > state.best_score;
                if improved {
                    state.best_score = candidate.score;
                    state.best = Some(candidate.clone());
                }
                StepOutcome::Scored {
                    candidate,
                    improved,
                }
            }
            None => StepOutcome::Skipped { column },
        };
        state.steps += 1;
        state.column += 1;
        state.settle(map);
        outcome
    }

    /// Commit the best candidate to `queue` and return its score.
    ///
    /// # Panics
    /// If stepping was never started or has candidates left.
    pub fn finalize_step(&mut self, queue: &mut MotionQueue) -> f64 {
        let Some(state) = self.stepping.take() else {
            panic!("finalize_step called before start_stepping");
        };
        assert!(
            state.is_finished(),
            "finalize_step called with candidates left after {} steps",
            state.steps
        );
        queue.clear();
        let score = match &state.best {
            Some(c) => {
                queue.load(&c.plan);
                c.score
            }
            None => {
                queue.enqueue(Direction::DropDown);
                SENTINEL_SCORE
            }
        };
        self.set_last(state.best);
        score
    }
}
