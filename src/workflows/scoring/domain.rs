use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable O*NET-SOC identifier, e.g. "29-1141.00".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupationCode(pub String);

impl fmt::Display for OccupationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One occupation as loaded from the O*NET export. Immutable once loaded;
/// wage text is carried through untouched for the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupation {
    pub code: OccupationCode,
    pub title: String,
    pub job_zone: u8,
    pub data_level: String,
    pub url: Option<String>,
    pub median_wage: Option<String>,
    pub growth: Option<GrowthCategory>,
    pub openings: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthCategory {
    Decline,
    LittleOrNoChange,
    SlowerThanAverage,
    Average,
    FasterThanAverage,
    MuchFasterThanAverage,
}

impl GrowthCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Decline,
            Self::LittleOrNoChange,
            Self::SlowerThanAverage,
            Self::Average,
            Self::FasterThanAverage,
            Self::MuchFasterThanAverage,
        ]
    }

    /// Label matching the O*NET projected-growth phrasing used in the input
    /// and output files.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Decline => "Decline (-1% or lower)",
            Self::LittleOrNoChange => "Little or no change",
            Self::SlowerThanAverage => "Slower than average (1% to 2%)",
            Self::Average => "Average (3% to 4%)",
            Self::FasterThanAverage => "Faster than average (5% to 6%)",
            Self::MuchFasterThanAverage => "Much faster than average (7% or higher)",
        }
    }

    /// Ordinal weight on the 0.0-1.0 scale used by the ranking composite.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Decline => 0.0,
            Self::LittleOrNoChange => 0.2,
            Self::SlowerThanAverage => 0.4,
            Self::Average => 0.6,
            Self::FasterThanAverage => 0.8,
            Self::MuchFasterThanAverage => 1.0,
        }
    }
}

/// Ten attribute ratings for one occupation: eight defensive factors
/// (why automation is resisted) and two offensive factors (how the role
/// benefits from AI). Every rating is validated into the 1-5 scale at
/// construction; out-of-range input is rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScoreSet {
    defensive: [u8; 8],
    offensive: [u8; 2],
}

impl AttributeScoreSet {
    /// Builds the set from raw A1..A10 ratings in order.
    pub fn from_scores(scores: [u8; 10]) -> Result<Self, ValidationError> {
        for (position, &value) in scores.iter().enumerate() {
            if !(1..=5).contains(&value) {
                return Err(ValidationError::AttributeOutOfRange {
                    attribute: position + 1,
                    value,
                });
            }
        }

        let mut defensive = [0u8; 8];
        defensive.copy_from_slice(&scores[..8]);
        let mut offensive = [0u8; 2];
        offensive.copy_from_slice(&scores[8..]);

        Ok(Self {
            defensive,
            offensive,
        })
    }

    pub const fn defensive(&self) -> &[u8; 8] {
        &self.defensive
    }

    pub const fn offensive(&self) -> &[u8; 2] {
        &self.offensive
    }
}

/// Composite resilience score derived from one attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub defensive_score: f64,
    pub offensive_score: f64,
    pub ai_proof_score: f64,
}

/// Final 0.0-1.0 ranking combining resilience with labor-market signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub final_ranking: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("attribute A{attribute} rating {value} is outside the 1-5 scale")]
    AttributeOutOfRange { attribute: usize, value: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_set_accepts_full_scale() {
        let set = AttributeScoreSet::from_scores([1, 2, 3, 4, 5, 1, 2, 3, 4, 5])
            .expect("scores in range");
        assert_eq!(set.defensive(), &[1, 2, 3, 4, 5, 1, 2, 3]);
        assert_eq!(set.offensive(), &[4, 5]);
    }

    #[test]
    fn attribute_set_rejects_out_of_range_without_clamping() {
        let error = AttributeScoreSet::from_scores([3, 3, 3, 3, 3, 3, 3, 3, 3, 6])
            .expect_err("A10 is out of range");
        assert_eq!(
            error,
            ValidationError::AttributeOutOfRange {
                attribute: 10,
                value: 6
            }
        );

        let error = AttributeScoreSet::from_scores([0, 3, 3, 3, 3, 3, 3, 3, 3, 3])
            .expect_err("A1 is out of range");
        assert_eq!(
            error,
            ValidationError::AttributeOutOfRange {
                attribute: 1,
                value: 0
            }
        );
    }

    #[test]
    fn growth_weights_follow_the_ordinal_order() {
        let ordered = GrowthCategory::ordered();
        for pair in ordered.windows(2) {
            assert!(pair[0].weight() < pair[1].weight());
        }
        assert_eq!(GrowthCategory::Decline.weight(), 0.0);
        assert_eq!(GrowthCategory::MuchFasterThanAverage.weight(), 1.0);
    }
}
