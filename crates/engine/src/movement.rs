//! Movement rules for the live piece. Every attempt is checked against the map
//! before it is committed; a blocked move leaves the piece untouched.

use cascade_core::{GameMap, Piece};

/// Every block of `piece` sits on an empty cell.
#[inline]
pub fn fits(map: &GameMap, piece: &Piece) -> bool {
    map.can_place(&piece.locations_as_points())
}

/// Piece moved by `(dx, dy)`, or None if it would collide.
pub fn try_translate(map: &GameMap, piece: &Piece, dx: i32, dy: i32) -> Option<Piece> {
    let next = piece.moved(dx, dy);
    fits(map, &next).then_some(next)
}

/// Quarter turn about the origin block. No kicks: a blocked turn fails.
pub fn try_rotate(map: &GameMap, piece: &Piece, clockwise: bool) -> Option<Piece> {
    let next = if clockwise {
        piece.turned(1)
    } else {
        piece.turned(3)
    };
    fits(map, &next).then_some(next)
}

/// Lowest resting position straight below `piece`, and the rows travelled.
pub fn drop_to_rest(map: &GameMap, piece: &Piece) -> (Piece, u32) {
    let mut current = piece.clone();
    let mut rows = 0;
    while let Some(next) = try_translate(map, &current, 0, 1) {
        current = next;
        rows += 1;
    }
    (current, rows)
}

/// True when the piece cannot move down any further.
pub fn is_resting(map: &GameMap, piece: &Piece) -> bool {
    try_translate(map, piece, 0, 1).is_none()
}
