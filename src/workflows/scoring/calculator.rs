use super::domain::{AttributeScoreSet, ScoreResult};

/// Weights for the eight defensive attributes A1..A8.
pub const DEFENSIVE_WEIGHTS: [f64; 8] = [1.5, 1.0, 1.5, 1.5, 1.0, 0.7, 0.7, 1.0];

const DEFENSIVE_WEIGHT_SUM: f64 = 8.9;
const DEFENSIVE_SHARE: f64 = 0.65;
const OFFENSIVE_SHARE: f64 = 0.35;
const CEILING_CAP: f64 = 2.5;
const FLOOR_VALUE: f64 = 3.0;

/// Combines one validated attribute set into the 1.0-5.0 resilience score.
///
/// The ceiling is evaluated before the floor; when both conditions hold the
/// floor decides the outcome because it is applied last.
pub fn compute_score(attributes: &AttributeScoreSet) -> ScoreResult {
    let defensive = attributes.defensive();
    let offensive = attributes.offensive();

    let weighted: f64 = defensive
        .iter()
        .zip(DEFENSIVE_WEIGHTS)
        .map(|(&rating, weight)| f64::from(rating) * weight)
        .sum();
    let defensive_score = weighted / DEFENSIVE_WEIGHT_SUM;

    let offensive_score = (f64::from(offensive[0]) + f64::from(offensive[1])) / 2.0;

    let mut raw = defensive_score * DEFENSIVE_SHARE + offensive_score * OFFENSIVE_SHARE;

    // Ceiling: weak on physical presence, interpersonal trust, and
    // unpredictability at once caps the composite.
    if defensive[0] <= 2 && defensive[2] <= 2 && defensive[3] <= 2 {
        raw = raw.min(CEILING_CAP);
    }

    // Floor: a maximal offensive rating guarantees at least 3.0.
    if offensive[0] == 5 || offensive[1] == 5 {
        raw = raw.max(FLOOR_VALUE);
    }

    ScoreResult {
        defensive_score,
        offensive_score,
        ai_proof_score: round_one_decimal(raw),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(raw: [u8; 10]) -> ScoreResult {
        let attributes = AttributeScoreSet::from_scores(raw).expect("scores in range");
        compute_score(&attributes)
    }

    #[test]
    fn uniform_midpoint_scores_land_on_three() {
        let result = score([3; 10]);
        assert!((result.defensive_score - 3.0).abs() < 1e-9);
        assert!((result.offensive_score - 3.0).abs() < 1e-9);
        assert_eq!(result.ai_proof_score, 3.0);
    }

    #[test]
    fn ceiling_caps_then_floor_raises_when_both_fire() {
        // A1=2, A3=1, A4=2 triggers the ceiling; A9=A10=5 triggers the floor.
        let result = score([2, 5, 1, 2, 5, 5, 5, 5, 5, 5]);
        assert_eq!(result.ai_proof_score, 3.0);
    }

    #[test]
    fn floor_alone_raises_a_weak_composite() {
        let result = score([1, 1, 1, 1, 1, 1, 1, 1, 5, 1]);
        assert!((result.defensive_score - 1.0).abs() < 1e-9);
        assert!((result.offensive_score - 3.0).abs() < 1e-9);
        // Unfloored composite would be 1.0 * 0.65 + 3.0 * 0.35 = 1.6.
        assert_eq!(result.ai_proof_score, 3.0);
    }

    #[test]
    fn ceiling_caps_a_strong_composite_without_floor() {
        let result = score([2, 5, 2, 2, 5, 5, 5, 5, 4, 4]);
        assert_eq!(result.ai_proof_score, 2.5);
    }

    #[test]
    fn score_stays_in_bounds_for_extreme_inputs() {
        for raw in [[1u8; 10], [5u8; 10], [1, 5, 1, 5, 1, 5, 1, 5, 1, 5]] {
            let result = score(raw);
            assert!(result.ai_proof_score >= 1.0);
            assert!(result.ai_proof_score <= 5.0);
        }
    }

    #[test]
    fn composite_rounds_to_one_decimal() {
        let result = score([4, 3, 4, 3, 4, 3, 4, 3, 4, 3]);
        let rescaled = result.ai_proof_score * 10.0;
        assert!((rescaled - rescaled.round()).abs() < 1e-9);
    }

    #[test]
    fn defensive_weights_sum_matches_the_divisor() {
        let sum: f64 = DEFENSIVE_WEIGHTS.iter().sum();
        assert!((sum - 8.9).abs() < 1e-9);
    }
}
