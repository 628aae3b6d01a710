pub mod decay;
pub mod engine;
pub mod heat;
pub mod service;

pub use decay::decay_factor;
pub use engine::{compute, compute_at, BreakdownEntry, Category, ScoreResult, MAX_SCORE, MIN_SCORE};
pub use heat::heat_for_score;
pub use service::ScoringService;
