pub mod calculator;
pub mod domain;
pub mod normalize;
pub mod ranking;

pub use calculator::compute_score;
pub use domain::{
    AttributeScoreSet, GrowthCategory, Occupation, OccupationCode, RankingResult, ScoreResult,
    ValidationError,
};
pub use normalize::OpeningsStats;
pub use ranking::compose_ranking;
