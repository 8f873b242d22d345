//! Piece shapes, block layouts and the live piece model.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::geometry::{normalized, rotate_point_right, rotate_right, Point, QuarterTurns};
use crate::occupant::OccupantId;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// One block of a piece, relative to the piece position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Block {
    pub offset: Point,
    pub is_origin: bool,
}

impl Block {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            offset: Point::new(x, y),
            is_origin: false,
        }
    }

    pub const fn origin(x: i32, y: i32) -> Self {
        Self {
            offset: Point::new(x, y),
            is_origin: true,
        }
    }
}

pub type Blocks = SmallVec<[Block; 4]>;

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
    ];

    /// Spawn layout, y-down, exactly one origin block per shape.
    pub fn blocks(self) -> [Block; 4] {
        match self {
            Shape::I => [
                Block::new(0, 0),
                Block::origin(1, 0),
                Block::new(2, 0),
                Block::new(3, 0),
            ],
            Shape::O => [
                Block::origin(0, 0),
                Block::new(1, 0),
                Block::new(0, 1),
                Block::new(1, 1),
            ],
            Shape::T => [
                Block::new(0, 0),
                Block::origin(1, 0),
                Block::new(2, 0),
                Block::new(1, 1),
            ],
            Shape::S => [
                Block::origin(1, 0),
                Block::new(2, 0),
                Block::new(0, 1),
                Block::new(1, 1),
            ],
            Shape::Z => [
                Block::new(0, 0),
                Block::origin(1, 0),
                Block::new(1, 1),
                Block::new(2, 1),
            ],
            Shape::J => [
                Block::new(0, 0),
                Block::new(0, 1),
                Block::origin(1, 1),
                Block::new(2, 1),
            ],
            Shape::L => [
                Block::new(2, 0),
                Block::new(0, 1),
                Block::origin(1, 1),
                Block::new(2, 1),
            ],
        }
    }

    pub fn is_rotationally_symmetric(self) -> bool {
        blocks_symmetric(&self.blocks())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PieceError {
    #[error("piece has no blocks")]
    Empty,
    #[error("piece has no origin block")]
    MissingOrigin,
    #[error("piece has {0} origin blocks, expected exactly one")]
    MultipleOrigins(usize),
    #[error("duplicate block at offset ({x}, {y})")]
    DuplicateBlock { x: i32, y: i32 },
}

fn validate(blocks: &[Block]) -> Result<(), PieceError> {
    if blocks.is_empty() {
        return Err(PieceError::Empty);
    }
    match blocks.iter().filter(|b| b.is_origin).count() {
        0 => return Err(PieceError::MissingOrigin),
        1 => {}
        n => return Err(PieceError::MultipleOrigins(n)),
    }
    for (i, a) in blocks.iter().enumerate() {
        if blocks[i + 1..].iter().any(|b| b.offset == a.offset) {
            return Err(PieceError::DuplicateBlock {
                x: a.offset.x,
                y: a.offset.y,
            });
        }
    }
    Ok(())
}

/// True when one quarter turn leaves the shape unchanged up to translation.
fn blocks_symmetric(blocks: &[Block]) -> bool {
    let offsets: Vec<Point> = blocks.iter().map(|b| b.offset).collect();
    let pivot = blocks
        .iter()
        .find(|b| b.is_origin)
        .map(|b| b.offset)
        .unwrap_or(Point::ZERO);
    normalized(&offsets) == normalized(&rotate_right(&offsets, pivot, 1))
}

/// A falling piece. Mutated in place while live, merged into the map on freeze.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    id: OccupantId,
    shape: Shape,
    blocks: Blocks,
    position: Point,
    turns: QuarterTurns,
    symmetric: bool,
}

impl Piece {
    /// Build a piece from an arbitrary block layout.
    pub fn new(
        id: OccupantId,
        shape: Shape,
        blocks: &[Block],
        position: Point,
    ) -> Result<Self, PieceError> {
        validate(blocks)?;
        Ok(Self {
            id,
            shape,
            blocks: blocks.iter().copied().collect(),
            position,
            turns: QuarterTurns::ZERO,
            symmetric: blocks_symmetric(blocks),
        })
    }

    /// Build the standard layout for `shape`.
    pub fn spawn(id: OccupantId, shape: Shape, position: Point) -> Self {
        let blocks = shape.blocks();
        debug_assert!(validate(&blocks).is_ok());
        Self {
            id,
            shape,
            blocks: blocks.iter().copied().collect(),
            position,
            turns: QuarterTurns::ZERO,
            symmetric: shape.is_rotationally_symmetric(),
        }
    }

    #[inline]
    pub fn id(&self) -> OccupantId {
        self.id
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Net clockwise turns applied since spawn.
    #[inline]
    pub fn turns(&self) -> QuarterTurns {
        self.turns
    }

    #[inline]
    pub fn is_rotationally_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn origin_offset(&self) -> Option<Point> {
        self.blocks.iter().find(|b| b.is_origin).map(|b| b.offset)
    }

    /// Absolute rotation pivot.
    ///
    /// # Panics
    /// A piece without an origin block is a corrupted definition; nothing can
    /// rotate or place it.
    pub fn origin_point(&self) -> Point {
        match self.origin_offset() {
            Some(offset) => self.position + offset,
            None => panic!("piece {:?} ({:?}) has no origin block", self.id, self.shape),
        }
    }

    /// Absolute coordinates of every block.
    pub fn locations_as_points(&self) -> Vec<Point> {
        self.blocks.iter().map(|b| self.position + b.offset).collect()
    }

    /// Absolute coordinates after `times` further clockwise turns, without mutating.
    pub fn rotated_points(&self, times: u32) -> Vec<Point> {
        rotate_right(&self.locations_as_points(), self.origin_point(), times)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    pub fn rotate_right(&mut self, times: u32) {
        let Some(pivot) = self.origin_offset() else {
            panic!("piece {:?} ({:?}) has no origin block", self.id, self.shape);
        };
        for block in &mut self.blocks {
            block.offset = rotate_point_right(block.offset, pivot, times);
        }
        self.turns = QuarterTurns::new(self.turns.steps() + times);
    }

    pub fn rotate_left(&mut self, times: u32) {
        self.rotate_right((4 - times % 4) % 4);
    }

    /// Copy of this piece moved by `(dx, dy)`.
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        let mut next = self.clone();
        next.translate(dx, dy);
        next
    }

    /// Copy of this piece turned `times` clockwise.
    pub fn turned(&self, times: u32) -> Self {
        let mut next = self.clone();
        next.rotate_right(times);
        next
    }
}
