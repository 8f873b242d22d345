//! Atomic motion commands for a live piece.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Drop to rest and freeze.
    DropDown,
    RotateLeft,
    RotateRight,
    /// Remove the piece from play without merging it.
    UpAndAway,
    DropDownNoFreeze,
    FreezeInPlace,
    /// Nothing queued; the driver lets gravity act.
    #[default]
    NoDirection,
}

impl Direction {
    /// Horizontal/vertical delta for the translating commands.
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Direction::Left => Some((-1, 0)),
            Direction::Right => Some((1, 0)),
            Direction::Up => Some((0, -1)),
            Direction::Down => Some((0, 1)),
            _ => None,
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Direction::RotateLeft | Direction::RotateRight)
    }
}
