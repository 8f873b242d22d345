//! Board configuration - bucket geometry, scoring rules, piece factory knobs.
//!
//! Everything a game session needs is passed in here; nothing is read from
//! process-wide state.

use cascade_core::BucketShape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::ScoreRules;

pub const MIN_BUCKET_WIDTH: u32 = 4;
pub const MIN_BUCKET_HEIGHT: u32 = 4;
/// Room for a vertical piece to turn above the bucket.
pub const MIN_SPAWN_ROWS: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("bucket width {width} is below the minimum of {}", MIN_BUCKET_WIDTH)]
    BucketTooNarrow { width: u32 },
    #[error("bucket height {height} is below the minimum of {}", MIN_BUCKET_HEIGHT)]
    BucketTooShallow { height: u32 },
    #[error("{rows} spawn rows is below the minimum of {}", MIN_SPAWN_ROWS)]
    TooFewSpawnRows { rows: u32 },
    #[error("centered bucket must be square, got {width}x{height}")]
    CenteredNotSquare { width: u32, height: u32 },
    #[error("center obstruction {block_width}x{block_height} must leave room on every side of a {size}x{size} bucket")]
    ObstructionTooLarge {
        block_width: u32,
        block_height: u32,
        size: u32,
    },
    #[error("piece factory needs at least one shape")]
    NoShapes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Interior columns.
    pub width: u32,
    /// Interior rows.
    pub height: u32,
    /// Rows above the interior where pieces spawn.
    pub spawn_rows: u32,
    pub shape: BucketShape,
}

impl BucketConfig {
    /// 10 wide, 20 tall, walls and floor.
    pub fn standard() -> Self {
        Self {
            width: 10,
            height: 20,
            spawn_rows: 4,
            shape: BucketShape::Rectangular,
        }
    }

    /// Square bucket with a solid block in the middle and no floor.
    pub fn centered(size: u32, block: u32) -> Self {
        Self {
            width: size,
            height: size,
            spawn_rows: 4,
            shape: BucketShape::Centered {
                block_width: block,
                block_height: block,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BUCKET_WIDTH {
            return Err(ConfigError::BucketTooNarrow { width: self.width });
        }
        if self.height < MIN_BUCKET_HEIGHT {
            return Err(ConfigError::BucketTooShallow {
                height: self.height,
            });
        }
        if self.spawn_rows < MIN_SPAWN_ROWS {
            return Err(ConfigError::TooFewSpawnRows {
                rows: self.spawn_rows,
            });
        }
        if let BucketShape::Centered {
            block_width,
            block_height,
        } = self.shape
        {
            if self.width != self.height {
                return Err(ConfigError::CenteredNotSquare {
                    width: self.width,
                    height: self.height,
                });
            }
            if block_width == 0
                || block_height == 0
                || block_width + 2 > self.width
                || block_height + 2 > self.height
            {
                return Err(ConfigError::ObstructionTooLarge {
                    block_width,
                    block_height,
                    size: self.width,
                });
            }
        }
        Ok(())
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub bucket: BucketConfig,
    /// Rules the live game score uses.
    pub rules: ScoreRules,
    /// When false, `Scorer::current` clamps negative totals to zero.
    pub allow_negative_score: bool,
    /// Longest run of one shape the factory may deal; 0 means unlimited.
    pub max_same_piece: u32,
    /// Upcoming shapes visible ahead of the live piece.
    pub sneak_peek: usize,
    pub seed: u64,
}

impl BoardConfig {
    pub fn classic() -> Self {
        Self {
            bucket: BucketConfig::standard(),
            rules: ScoreRules::game(),
            allow_negative_score: true,
            max_same_piece: 3,
            sneak_peek: 1,
            seed: 0x5eed_cafe,
        }
    }

    pub fn rotating() -> Self {
        Self {
            bucket: BucketConfig::centered(16, 4),
            ..Self::classic()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bucket.validate()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::classic()
    }
}
