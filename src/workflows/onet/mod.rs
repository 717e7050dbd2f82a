mod normalizer;
mod parser;

use crate::workflows::scoring::{Occupation, OccupationCode};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum OnetImportError {
    #[error("failed to read O*NET export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid O*NET CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("occupation {code} has unrecognized growth category '{value}'")]
    UnknownGrowthCategory { code: String, value: String },
}

/// Loads the scoreable occupations from an O*NET export.
///
/// A row is scoreable when its job zone is a 1-5 ordinal (not blank or
/// "n/a") and its data level is "Y"; everything else is skipped. Input
/// order is preserved so batch partitions stay stable across runs.
pub struct OccupationImporter;

impl OccupationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Occupation>, OnetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Occupation>, OnetImportError> {
        let mut occupations = Vec::new();

        for row in parser::parse_records(reader)? {
            let Some(job_zone) = row.job_zone_ordinal() else {
                continue;
            };
            let Some(data_level) = row.data_level.as_deref() else {
                continue;
            };
            if data_level != "Y" {
                continue;
            }

            let growth = match row.projected_growth.as_deref() {
                None => None,
                Some(text) => match normalizer::normalize_growth(text) {
                    Some(category) => Some(category),
                    // Absence has a defined fallback downstream; text we
                    // cannot place on the ordinal scale fails the import.
                    None => {
                        return Err(OnetImportError::UnknownGrowthCategory {
                            code: row.code.clone(),
                            value: text.to_string(),
                        })
                    }
                },
            };

            let openings = row.openings_count();
            occupations.push(Occupation {
                code: OccupationCode(row.code),
                title: row.occupation,
                job_zone,
                data_level: data_level.to_string(),
                url: row.url,
                median_wage: row.median_wage,
                growth,
                openings,
            });
        }

        Ok(occupations)
    }
}
