//! Cell occupant identifiers and the piece types they map to.

use serde::{Deserialize, Serialize};

/// Opaque id stored in every grid cell. One id per logical placed object.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(pub u32);

impl OccupantId {
    pub const BACKGROUND: Self = Self(0);
    pub const EXTERIOR: Self = Self(1);
    pub const BUCKET: Self = Self(2);
    pub const INVISIBLE_BUCKET: Self = Self(3);
    pub const UNREACHABLE: Self = Self(4);

    /// First id handed out by `GameMap::mint_id`.
    pub const FIRST_DYNAMIC: u32 = 16;

    pub const RESERVED: [(OccupantId, PieceType); 5] = [
        (Self::BACKGROUND, PieceType::Visible),
        (Self::EXTERIOR, PieceType::BucketExterior),
        (Self::BUCKET, PieceType::Bucket),
        (Self::INVISIBLE_BUCKET, PieceType::InvisibleBucket),
        (Self::UNREACHABLE, PieceType::Unreachable),
    ];

    #[inline]
    pub fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum PieceType {
    GamePiece,
    RetiredGamePiece,
    Bucket,
    InvisibleBucket,
    Visible,
    Danger,
    Action,
    Unreachable,
    BucketExterior,
}

impl PieceType {
    /// Pieces may move through these.
    #[inline]
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            PieceType::Visible | PieceType::Action | PieceType::Danger | PieceType::BucketExterior
        )
    }

    /// Solid for placement, gap analysis and row fullness.
    #[inline]
    pub fn is_occupied(self) -> bool {
        matches!(
            self,
            PieceType::RetiredGamePiece | PieceType::Bucket | PieceType::InvisibleBucket
        )
    }
}
