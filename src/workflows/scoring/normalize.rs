use super::domain::GrowthCategory;

/// Maps a 1.0-5.0 resilience score linearly onto 0.0-1.0.
pub fn resilience_norm(score: f64) -> f64 {
    (score - 1.0) / 4.0
}

/// Ordinal weight for a projected-growth category. A missing category ranks
/// as Average (0.6); absence is an edge case with a defined fallback, not an
/// error.
pub fn growth_norm(growth: Option<GrowthCategory>) -> f64 {
    growth.unwrap_or(GrowthCategory::Average).weight()
}

/// Log-space min/max over the projected-openings counts of the entire run.
///
/// Built once from the full input before any normalized value is considered
/// final; per-batch statistics would make the normalization depend on batch
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningsStats {
    min_log: f64,
    max_log: f64,
}

impl OpeningsStats {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = Option<u64>>,
    {
        let mut min_log = f64::INFINITY;
        let mut max_log = f64::NEG_INFINITY;
        let mut seen = false;

        for count in counts {
            let log = log_openings(count);
            min_log = min_log.min(log);
            max_log = max_log.max(log);
            seen = true;
        }

        if !seen {
            return Self {
                min_log: 0.0,
                max_log: 0.0,
            };
        }

        Self { min_log, max_log }
    }

    /// Min-max scales `log(1 + count)` against the dataset bounds. An absent
    /// count is treated as 0. When every count in the dataset is equal the
    /// scale is undefined and all occupations normalize to 0.5.
    pub fn openings_norm(&self, count: Option<u64>) -> f64 {
        let range = self.max_log - self.min_log;
        if range == 0.0 {
            return 0.5;
        }

        ((log_openings(count) - self.min_log) / range).clamp(0.0, 1.0)
    }
}

fn log_openings(count: Option<u64>) -> f64 {
    (count.unwrap_or(0) as f64).ln_1p()
}
