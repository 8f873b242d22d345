//! Board - one game session: map, score, factory, live piece, motion queue, events.

use std::collections::VecDeque;

use cascade_core::{Bounds, Direction, GameMap, Piece, PieceType, Point, Shape};
use tracing::{debug, info, trace};

use crate::config::{BoardConfig, ConfigError};
use crate::event::BoardEvent;
use crate::factory::PieceFactory;
use crate::motion::{MotionPlan, MotionQueue};
use crate::movement::{drop_to_rest, try_rotate, try_translate};
use crate::score::Scorer;

#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    map: GameMap,
    scorer: Scorer,
    factory: PieceFactory,
    active: Option<Piece>,
    motion: MotionQueue,
    events: VecDeque<BoardEvent>,
    game_over: bool,
    pieces_frozen: u64,
    rows_cleared: u64,
}

fn fresh_map(config: &BoardConfig) -> GameMap {
    let b = &config.bucket;
    GameMap::new(b.width, b.height, b.spawn_rows, b.shape)
}

fn fresh_scorer(config: &BoardConfig) -> Scorer {
    Scorer::new(config.rules).with_allow_negative(config.allow_negative_score)
}

fn fresh_factory(config: &BoardConfig) -> PieceFactory {
    PieceFactory::seeded(config.seed, config.max_same_piece, config.sneak_peek)
}

/// Spawn point for `shape`: centred on the open span of the top interior row,
/// two rows above the bucket.
pub fn spawn_position(map: &GameMap, shape: Shape) -> Point {
    let offsets: Vec<Point> = shape.blocks().iter().map(|b| b.offset).collect();
    let (left, right) = map.top_row_entry();
    let Some(bounds) = Bounds::of(&offsets) else {
        return Point::new(left, 0);
    };
    let span = right - left + 1;
    let x = left + (span - bounds.width()) / 2 - bounds.min_x;
    let y = (map.bucket().top - 2).max(0) - bounds.min_y;
    Point::new(x, y)
}

impl Board {
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        let factory = fresh_factory(&config);
        Self::with_factory(config, factory)
    }

    /// Board dealing from a caller-supplied factory.
    pub fn with_factory(config: BoardConfig, factory: PieceFactory) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            map: fresh_map(&config),
            scorer: fresh_scorer(&config),
            factory,
            active: None,
            motion: MotionQueue::new(),
            events: VecDeque::new(),
            game_over: false,
            pieces_frozen: 0,
            rows_cleared: 0,
            config,
        })
    }

    /// Start a new game with the same configuration.
    pub fn reset(&mut self) {
        self.map = fresh_map(&self.config);
        self.scorer.reset();
        self.factory = fresh_factory(&self.config);
        self.active = None;
        self.motion.clear();
        self.events.clear();
        self.game_over = false;
        self.pieces_frozen = 0;
        self.rows_cleared = 0;
        debug!("board reset");
    }

    #[inline]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[inline]
    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Direct map access for setting up positions.
    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    #[inline]
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut Scorer {
        &mut self.scorer
    }

    pub fn score(&self) -> i64 {
        self.scorer.current()
    }

    #[inline]
    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn pieces_frozen(&self) -> u64 {
        self.pieces_frozen
    }

    pub fn rows_cleared(&self) -> u64 {
        self.rows_cleared
    }

    /// Shapes queued after the live piece.
    pub fn preview(&self) -> Vec<Shape> {
        self.factory.preview()
    }

    pub fn next_motion(&mut self) -> Direction {
        self.motion.dequeue()
    }

    pub fn dump_motion_queue(&self) -> Vec<Direction> {
        self.motion.dump()
    }

    pub fn set_motion_plan(&mut self, plan: &MotionPlan) {
        self.motion.load(plan);
    }

    /// Live piece, map and motion queue borrowed together so a planner can read
    /// the board while filling the queue.
    pub fn planning_view(&mut self) -> Option<(&Piece, &GameMap, &mut MotionQueue)> {
        let piece = self.active.as_ref()?;
        Some((piece, &self.map, &mut self.motion))
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: BoardEvent) {
        trace!(?event, "board event");
        self.events.push_back(event);
    }

    /// Deal the next piece. Returns false, and ends the game, when it cannot enter.
    pub fn spawn(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.active.is_some() {
            return true;
        }
        let shape = self.factory.next_shape();
        let position = spawn_position(&self.map, shape);
        self.motion.clear();
        let cells: Vec<Point> = shape.blocks().iter().map(|b| position + b.offset).collect();
        if !self.map.can_place(&cells) {
            self.game_over = true;
            let score = self.scorer.current();
            info!(score, pieces = self.pieces_frozen, rows = self.rows_cleared, "game over");
            self.emit(BoardEvent::GameOverDetected { score });
            return false;
        }
        let id = self.map.mint_id(PieceType::GamePiece);
        let piece = Piece::spawn(id, shape, position);
        debug!(?shape, x = position.x, y = position.y, "piece spawned");
        self.emit(BoardEvent::PieceSpawned {
            id,
            shape,
            position,
        });
        self.active = Some(piece);
        true
    }

    /// Apply one command to the live piece. Returns whether anything changed.
    pub fn apply(&mut self, direction: Direction) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };
        match direction {
            Direction::Left | Direction::Right | Direction::Up | Direction::Down => {
                let Some((dx, dy)) = direction.delta() else {
                    self.active = Some(piece);
                    return false;
                };
                self.replace_if(piece, |map, p| try_translate(map, p, dx, dy))
            }
            Direction::RotateLeft | Direction::RotateRight => {
                let clockwise = direction == Direction::RotateRight;
                self.replace_if(piece, |map, p| try_rotate(map, p, clockwise))
            }
            Direction::DropDown => {
                let (rest, _) = drop_to_rest(&self.map, &piece);
                self.freeze(rest);
                true
            }
            Direction::DropDownNoFreeze => {
                let (rest, rows) = drop_to_rest(&self.map, &piece);
                self.active = Some(rest);
                rows > 0
            }
            Direction::FreezeInPlace => {
                self.freeze(piece);
                true
            }
            Direction::UpAndAway => {
                let id = piece.id();
                self.motion.clear();
                self.map.purge_stale_ids(&[]);
                self.emit(BoardEvent::PieceRemoved { id });
                self.spawn();
                true
            }
            Direction::NoDirection => match try_translate(&self.map, &piece, 0, 1) {
                Some(next) => {
                    self.active = Some(next);
                    true
                }
                None => {
                    self.freeze(piece);
                    true
                }
            },
        }
    }

    fn replace_if(
        &mut self,
        piece: Piece,
        attempt: impl FnOnce(&GameMap, &Piece) -> Option<Piece>,
    ) -> bool {
        match attempt(&self.map, &piece) {
            Some(next) => {
                self.active = Some(next);
                true
            }
            None => {
                self.active = Some(piece);
                false
            }
        }
    }

    /// Advance one step: spawn if nothing is live, otherwise apply the next queued
    /// command (gravity when the queue is empty). Returns the command applied.
    pub fn tick(&mut self) -> Direction {
        if self.game_over {
            return Direction::NoDirection;
        }
        if self.active.is_none() {
            self.spawn();
            return Direction::NoDirection;
        }
        let direction = self.motion.dequeue();
        self.apply(direction);
        direction
    }

    /// Merge, collapse, score, purge, report, then deal the next piece.
    fn freeze(&mut self, piece: Piece) {
        self.motion.clear();
        let bucket = *self.map.bucket();
        let points = piece.locations_as_points();

        if points.iter().any(|p| p.y > bucket.bottom) {
            debug!(id = piece.id().0, "piece fell out of the bucket");
            self.map.purge_stale_ids(&[]);
            self.emit(BoardEvent::PieceFellAway { id: piece.id() });
            self.spawn();
            return;
        }

        let old_gaps = self.map.unreachable_point_count(&[]).unreachable;
        let id = self.map.merge_piece(&piece);
        let cleared = self.map.collapse_full_rows();
        let new_gaps = self.map.unreachable_point_count(&[]).unreachable;

        let start = self.scorer.raw();
        self.scorer.add_piece_block_count(points.len());
        self.scorer.score_locations(&points, &bucket);
        self.scorer.gap_delta(old_gaps, new_gaps);
        if !cleared.is_empty() {
            let rows: Vec<i32> = cleared.iter().map(|c| c.row).collect();
            let homogeneous = cleared.iter().filter(|c| c.homogeneous).count();
            self.scorer.score_cleared_rows(&rows, homogeneous, &bucket);
        }
        self.scorer.score_map_condition(&self.map);
        let score_delta = self.scorer.raw() - start;

        self.pieces_frozen += 1;
        self.rows_cleared += cleared.len() as u64;
        let purged = self.map.purge_stale_ids(&[]);
        debug!(
            id = id.0,
            rows = cleared.len(),
            score_delta,
            purged,
            "piece froze"
        );

        self.emit(BoardEvent::PieceFroze {
            id,
            shape: piece.shape(),
            points,
            score_delta,
        });
        if !cleared.is_empty() {
            self.emit(BoardEvent::RowsDeleted { rows: cleared });
        }
        self.spawn();
    }

    /// Turn the bucket interior a quarter turn. Fails on a non-square bucket or
    /// when the live piece would no longer fit.
    pub fn rotate_bucket(&mut self, clockwise: bool) -> bool {
        if self.game_over || !self.map.rotate_interior(clockwise) {
            return false;
        }
        let blocked = self
            .active
            .as_ref()
            .is_some_and(|p| !self.map.can_place(&p.locations_as_points()));
        if blocked {
            self.map.rotate_interior(!clockwise);
            return false;
        }
        self.emit(BoardEvent::BucketRotated { clockwise });
        true
    }
}
