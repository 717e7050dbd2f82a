use super::cache::CacheEntry;
use crate::workflows::scoring::{Occupation, RankingResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One row of the ranked output file, mirroring the input columns plus the
/// derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    #[serde(rename = "Job Zone")]
    pub job_zone: u8,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Occupation")]
    pub occupation: String,
    #[serde(rename = "Data-level")]
    pub data_level: String,
    #[serde(rename = "url")]
    pub url: String,
    #[serde(rename = "Median Wage")]
    pub median_wage: String,
    #[serde(rename = "Projected Growth")]
    pub projected_growth: String,
    #[serde(rename = "Projected Job Openings")]
    pub projected_job_openings: String,
    pub defensive_score: f64,
    pub offensive_score: f64,
    pub ai_proof_score: f64,
    pub final_ranking: f64,
    pub key_drivers: String,
}

pub(crate) fn ranked_row(
    occupation: &Occupation,
    entry: &CacheEntry,
    ranking: &RankingResult,
) -> RankedRow {
    RankedRow {
        job_zone: occupation.job_zone,
        code: occupation.code.0.clone(),
        occupation: occupation.title.clone(),
        data_level: occupation.data_level.clone(),
        url: occupation.url.clone().unwrap_or_default(),
        median_wage: occupation.median_wage.clone().unwrap_or_default(),
        projected_growth: occupation
            .growth
            .map(|growth| growth.label().to_string())
            .unwrap_or_default(),
        projected_job_openings: occupation
            .openings
            .map(|count| count.to_string())
            .unwrap_or_default(),
        defensive_score: entry.score.defensive_score,
        offensive_score: entry.score.offensive_score,
        ai_proof_score: entry.score.ai_proof_score,
        final_ranking: ranking.final_ranking,
        key_drivers: entry.key_drivers.clone(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write ranked output: {0}")]
    Csv(#[from] csv::Error),
}

/// Rewrites the whole output file from the given rows. Callers pass rows
/// already sorted by final ranking descending.
pub fn write_rankings<P: AsRef<Path>>(path: P, rows: &[RankedRow]) -> Result<(), OutputError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scoring::{
        compute_score, AttributeScoreSet, GrowthCategory, OccupationCode,
    };

    fn sample_row(code: &str, final_ranking: f64) -> RankedRow {
        let attributes =
            AttributeScoreSet::from_scores([4, 3, 4, 4, 3, 2, 3, 3, 4, 3]).expect("in range");
        let entry = CacheEntry {
            attributes,
            score: compute_score(&attributes),
            key_drivers: "Drivers.".to_string(),
            batch_index: 0,
            completed: true,
            ranking: None,
        };
        let occupation = Occupation {
            code: OccupationCode(code.to_string()),
            title: "Sample".to_string(),
            job_zone: 3,
            data_level: "Y".to_string(),
            url: Some(format!("https://example.org/{code}")),
            median_wage: Some("$86,070".to_string()),
            growth: Some(GrowthCategory::Average),
            openings: Some(12_345),
        };
        ranked_row(&occupation, &entry, &RankingResult { final_ranking })
    }

    #[test]
    fn output_file_carries_headers_and_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rankings.csv");
        let rows = vec![sample_row("29-1141.00", 0.91), sample_row("15-1252.00", 0.72)];

        write_rankings(&path, &rows).expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        let mut lines = contents.lines();
        let header = lines.next().expect("header");
        assert!(header.starts_with("Job Zone,Code,Occupation,Data-level,url,Median Wage"));
        assert!(header.ends_with("final_ranking,key_drivers"));
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("Average (3% to 4%)"));
    }

    #[test]
    fn missing_optionals_serialize_as_empty_fields() {
        let mut row = sample_row("11-1011.00", 0.5);
        row.url = String::new();
        row.median_wage = String::new();

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rankings.csv");
        write_rankings(&path, &[row]).expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.lines().nth(1).expect("row").contains(",,"));
    }
}
