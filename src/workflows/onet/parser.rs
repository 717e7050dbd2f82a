use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw row of the O*NET occupations export, before the scoreable filter.
#[derive(Debug, Deserialize)]
pub(crate) struct OnetRow {
    #[serde(rename = "Job Zone", default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_zone: Option<String>,
    #[serde(rename = "Code")]
    pub(crate) code: String,
    #[serde(rename = "Occupation")]
    pub(crate) occupation: String,
    #[serde(rename = "Data-level", default, deserialize_with = "empty_string_as_none")]
    pub(crate) data_level: Option<String>,
    #[serde(rename = "url", default, deserialize_with = "empty_string_as_none")]
    pub(crate) url: Option<String>,
    #[serde(rename = "Median Wage", default, deserialize_with = "empty_string_as_none")]
    pub(crate) median_wage: Option<String>,
    #[serde(
        rename = "Projected Growth",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) projected_growth: Option<String>,
    #[serde(
        rename = "Projected Job Openings",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) projected_job_openings: Option<String>,
}

impl OnetRow {
    /// Job zone as an ordinal, when the export carries a usable value.
    pub(crate) fn job_zone_ordinal(&self) -> Option<u8> {
        let raw = self.job_zone.as_deref()?.trim();
        if raw.eq_ignore_ascii_case("n/a") {
            return None;
        }
        raw.parse::<u8>().ok().filter(|zone| (1..=5).contains(zone))
    }

    pub(crate) fn openings_count(&self) -> Option<u64> {
        parse_openings(self.projected_job_openings.as_deref()?)
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<OnetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<OnetRow>() {
        records.push(record?);
    }

    Ok(records)
}

/// Openings counts arrive with thousands separators ("1,234"). Anything that
/// does not parse as a non-negative integer is treated as absent.
fn parse_openings(value: &str) -> Option<u64> {
    let cleaned = value.replace(',', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u64>().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
