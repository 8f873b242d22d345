//! Cascade core crate - grid map, piece geometry and occupancy types.

pub mod direction;
pub mod geometry;
pub mod map;
mod occupant;
mod piece;

pub use direction::Direction;
pub use geometry::{rotate_left, rotate_right, Bounds, Point, QuarterTurns};
pub use map::{Bucket, BucketShape, CellState, ClearedRow, GameMap, GapCount};
pub use occupant::{OccupantId, PieceType};
pub use piece::{Block, Blocks, Piece, PieceError, Shape};
