use super::domain::{GrowthCategory, RankingResult, ScoreResult};
use super::normalize::{growth_norm, resilience_norm, OpeningsStats};

pub const W_RESILIENCE: f64 = 0.50;
pub const W_GROWTH: f64 = 0.30;
pub const W_OPENINGS: f64 = 0.20;

const PENALTY_CAP: f64 = 0.20;
const BOOST: f64 = 0.05;

/// Combines the resilience score with labor-market signals into the final
/// 0.0-1.0 ranking.
///
/// The penalty and boost conditions are mutually exclusive: the penalty
/// requires ai_proof_score < 2.0 and the boost requires >= 4.0.
pub fn compose_ranking(
    score: &ScoreResult,
    growth: Option<GrowthCategory>,
    openings: Option<u64>,
    stats: &OpeningsStats,
) -> RankingResult {
    let base = W_RESILIENCE * resilience_norm(score.ai_proof_score)
        + W_GROWTH * growth_norm(growth)
        + W_OPENINGS * stats.openings_norm(openings);

    let ai_proof = score.ai_proof_score;
    let adjusted = if ai_proof < 2.0 && growth == Some(GrowthCategory::Decline) {
        base.min(PENALTY_CAP)
    } else if ai_proof >= 4.0 && matches!(growth, Some(GrowthCategory::FasterThanAverage | GrowthCategory::MuchFasterThanAverage)) {
        base + BOOST
    } else {
        base
    };

    RankingResult {
        final_ranking: round_three_decimals(adjusted.clamp(0.0, 1.0)),
    }
}

fn round_three_decimals(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
