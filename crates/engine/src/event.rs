//! Events raised by board mutations, drained by the game loop.

use cascade_core::{ClearedRow, OccupantId, Point, Shape};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    PieceSpawned {
        id: OccupantId,
        shape: Shape,
        position: Point,
    },
    PieceFroze {
        id: OccupantId,
        shape: Shape,
        points: Vec<Point>,
        score_delta: i64,
    },
    RowsDeleted {
        rows: Vec<ClearedRow>,
    },
    BucketRotated {
        clockwise: bool,
    },
    /// The piece came to rest below the interior of a floorless bucket.
    PieceFellAway {
        id: OccupantId,
    },
    /// `UpAndAway` took the piece out of play.
    PieceRemoved {
        id: OccupantId,
    },
    GameOverDetected {
        score: i64,
    },
}
