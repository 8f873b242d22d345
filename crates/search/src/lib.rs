//! Cascade search crate - best-fit placement, look-ahead and the autopilot driver.

mod autopilot;
mod best_fit;
mod candidate;
mod classifier;
mod lookahead;
mod stepping;

pub use autopilot::Autopilot;
pub use best_fit::{
    evaluate_all, general_search, initial_move_down, AiConfig, AiKind, BestFit, SENTINEL_SCORE,
};
pub use candidate::{angles, Candidate, Orientation};
pub use classifier::{BucketClassifier, CenteredBucket, FlatBucket, Side, Sides, SplitRule};
pub use lookahead::{LookaheadFit, MAX_DEPTH};
pub use stepping::StepOutcome;
