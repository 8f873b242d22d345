//! Drives a board with the best-fit engine: plans once per spawned piece, then
//! lets the board drain the queue one command per tick.

use cascade_core::{Direction, OccupantId, Piece};
use cascade_engine::Board;
use tracing::trace;

use crate::best_fit::{AiConfig, BestFit, SENTINEL_SCORE};
use crate::lookahead::LookaheadFit;

#[derive(Debug)]
pub struct Autopilot {
    engine: BestFit,
    lookahead: Option<LookaheadFit>,
    planned: Option<OccupantId>,
}

impl Autopilot {
    pub fn new(config: AiConfig) -> Self {
        let lookahead =
            (config.look_ahead > 0).then(|| LookaheadFit::new(config.look_ahead, config.heuristic));
        Self {
            engine: BestFit::new(config),
            lookahead,
            planned: None,
        }
    }

    pub fn engine(&self) -> &BestFit {
        &self.engine
    }

    /// Plan for the live piece and load the board's motion queue.
    pub fn plan(&mut self, board: &mut Board) -> Option<f64> {
        let preview = board.preview();
        let (piece, map, queue) = board.planning_view()?;
        let id = piece.id();

        let deep = match &self.lookahead {
            Some(la) if !preview.is_empty() && self.engine.slide_side(map).is_none() => {
                Some(la.search(piece, map, &preview))
            }
            _ => None,
        };
        let score = match deep {
            Some(Some(choice)) => {
                queue.load(&choice.plan);
                choice.score
            }
            Some(None) => {
                queue.clear();
                queue.enqueue(Direction::DropDown);
                SENTINEL_SCORE
            }
            None => self.engine.best_fit(piece, map, queue),
        };
        trace!(id = id.0, score, "planned");
        self.planned = Some(id);
        Some(score)
    }

    /// Plan if a new piece is live, then advance the board one tick.
    pub fn tick(&mut self, board: &mut Board) -> Direction {
        let live = board.active().map(Piece::id);
        if live.is_some() && live != self.planned {
            self.plan(board);
        }
        board.tick()
    }

    /// Tick until the game ends or `max_ticks` pass. Returns the ticks used.
    pub fn play(&mut self, board: &mut Board, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && !board.is_game_over() {
            self.tick(board);
            ticks += 1;
        }
        ticks
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}
