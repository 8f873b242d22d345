//! cascade-engine - game session logic on top of the core map.
//!
//! Provides configuration, scoring, the piece factory, movement rules, the
//! motion queue and the `Board` aggregate that ties them together.

pub mod board;
pub mod config;
pub mod event;
pub mod factory;
pub mod motion;
pub mod movement;
pub mod score;

pub use board::{spawn_position, Board};
pub use config::{BoardConfig, BucketConfig, ConfigError};
pub use event::BoardEvent;
pub use factory::PieceFactory;
pub use motion::{MotionPlan, MotionQueue};
pub use movement::{drop_to_rest, fits, try_rotate, try_translate};
pub use score::{ScoreRule, ScoreRules, Scorer};
