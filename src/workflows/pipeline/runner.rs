use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, warn};

use super::cache::{CacheEntry, CacheStore};
use super::collaborator::{CollaboratorError, RawOccupationScores, ScoreCollaborator};
use super::output::{ranked_row, RankedRow};
use super::progress::ProgressLog;
use super::PipelineError;
use crate::workflows::scoring::{
    compose_ranking, compute_score, AttributeScoreSet, Occupation, OpeningsStats,
};

/// Lifecycle of one batch within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Pending,
    InFlight,
    Completed,
    Failed,
}

impl BatchStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InFlight => "In Flight",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// What to do with the rest of the run when a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Halt,
    Skip,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Occupations per external scoring call.
    pub batch_size: usize,
    /// Fixed pause between successful batches; rate-limit back-pressure,
    /// not adaptive backoff.
    pub batch_delay: Duration,
    /// Forced resume point; batches before this index are left untouched.
    pub start_batch: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay: Duration::from_secs(2),
            start_batch: 0,
            failure_policy: FailurePolicy::Skip,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub index: usize,
    pub size: usize,
    pub status: BatchStatus,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct RunReport {
    pub batches: Vec<BatchReport>,
    /// Ranked output rows, sorted by final ranking descending.
    pub rows: Vec<RankedRow>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.batches
            .iter()
            .filter(|batch| batch.status == BatchStatus::Completed)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchReport> {
        self.batches
            .iter()
            .filter(|batch| batch.status == BatchStatus::Failed)
    }
}

/// Deterministic fixed-size partition of the input order. Batch N always
/// contains the same occupations across runs, which is what makes the cache
/// a valid resume point.
pub(crate) fn partition(occupations: &[Occupation], batch_size: usize) -> Vec<&[Occupation]> {
    occupations.chunks(batch_size.max(1)).collect()
}

/// Orchestrates scoring across batches: skips completed work, delegates
/// unscored batches to the collaborator, persists each occupation durably,
/// and finishes with the dataset-wide ranking pass.
pub struct BatchRunner<C> {
    collaborator: C,
    cache: CacheStore,
    progress: ProgressLog,
    config: RunnerConfig,
}

impl<C: ScoreCollaborator> BatchRunner<C> {
    pub fn new(
        collaborator: C,
        cache: CacheStore,
        progress: ProgressLog,
        config: RunnerConfig,
    ) -> Self {
        Self {
            collaborator,
            cache,
            progress,
            config,
        }
    }

    pub async fn run(&mut self, occupations: &[Occupation]) -> Result<RunReport, PipelineError> {
        let batches = partition(occupations, self.config.batch_size);
        let total = batches.len();
        let mut reports = Vec::with_capacity(total);

        for (index, batch) in batches.iter().enumerate() {
            let mut status = BatchStatus::Pending;

            if index < self.config.start_batch {
                reports.push(BatchReport {
                    index,
                    size: batch.len(),
                    status,
                    error: None,
                });
                continue;
            }

            if batch
                .iter()
                .all(|occupation| self.cache.is_completed(&occupation.code))
            {
                info!(batch = index, total, "batch already scored, skipping");
                reports.push(BatchReport {
                    index,
                    size: batch.len(),
                    status: BatchStatus::Completed,
                    error: None,
                });
                continue;
            }

            status = BatchStatus::InFlight;
            info!(
                batch = index,
                total,
                size = batch.len(),
                status = status.label(),
                "scoring batch"
            );

            let outcome = match self.collaborator.score_batch(batch).await {
                Ok(raw) => self.persist_batch(index, batch, &raw),
                Err(err) => Err(PipelineError::Collaborator(err)),
            };

            match outcome {
                Ok(()) => {
                    self.progress
                        .append(index, batch.len(), "completed")
                        .map_err(PipelineError::Progress)?;
                    reports.push(BatchReport {
                        index,
                        size: batch.len(),
                        status: BatchStatus::Completed,
                        error: None,
                    });

                    if index + 1 < total {
                        tokio::time::sleep(self.config.batch_delay).await;
                    }
                }
                Err(PipelineError::Collaborator(err)) => {
                    warn!(batch = index, error = %err, "scoring batch failed");
                    self.progress
                        .append(index, batch.len(), &format!("failed: {err}"))
                        .map_err(PipelineError::Progress)?;
                    reports.push(BatchReport {
                        index,
                        size: batch.len(),
                        status: BatchStatus::Failed,
                        error: Some(err.to_string()),
                    });

                    if self.config.failure_policy == FailurePolicy::Halt {
                        break;
                    }
                }
                // Validation and persistence failures are fatal; the batch
                // is never reported Completed.
                Err(err) => return Err(err),
            }
        }

        let rows = finalize(&mut self.cache, occupations)?;
        Ok(RunReport {
            batches: reports,
            rows,
        })
    }

    /// Persists every scored occupation of one batch individually, so a
    /// later failure in the same batch does not discard earlier entries.
    /// Entries already completion-flagged are never overwritten.
    fn persist_batch(
        &mut self,
        index: usize,
        batch: &[Occupation],
        raw: &[RawOccupationScores],
    ) -> Result<(), PipelineError> {
        let mut by_code: HashMap<&str, &RawOccupationScores> = raw
            .iter()
            .map(|scores| (scores.onet_code.as_str(), scores))
            .collect();

        let mut missing: Vec<String> = Vec::new();
        for occupation in batch {
            let Some(scores) = by_code.remove(occupation.code.0.as_str()) else {
                missing.push(occupation.code.0.clone());
                continue;
            };

            if self.cache.is_completed(&occupation.code) {
                continue;
            }

            let ratings: [u8; 10] = scores.attributes.as_slice().try_into().map_err(|_| {
                CollaboratorError::MalformedResponse(format!(
                    "occupation {} has {} attribute ratings, expected 10",
                    occupation.code,
                    scores.attributes.len()
                ))
            })?;
            let attributes = AttributeScoreSet::from_scores(ratings)?;
            let score = compute_score(&attributes);

            self.cache.insert(
                &occupation.code,
                CacheEntry {
                    attributes,
                    score,
                    key_drivers: scores.key_drivers.clone(),
                    batch_index: index,
                    completed: true,
                    ranking: None,
                },
            )?;
        }

        if !missing.is_empty() {
            return Err(CollaboratorError::MalformedResponse(format!(
                "response missing scores for {}",
                missing.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

/// Dataset-wide normalization and ranking pass over every completed entry.
///
/// Openings statistics come from the full input, never per batch, so the
/// pass is reproducible regardless of how the run was interrupted. Rankings
/// are written back to the cache and returned as output rows sorted by final
/// ranking descending (ties broken by code).
pub fn finalize(
    cache: &mut CacheStore,
    occupations: &[Occupation],
) -> Result<Vec<RankedRow>, PipelineError> {
    let stats = OpeningsStats::from_counts(occupations.iter().map(|occupation| occupation.openings));

    let mut rankings = Vec::new();
    let mut rows = Vec::new();
    for occupation in occupations {
        let Some(entry) = cache.get(&occupation.code) else {
            continue;
        };
        if !entry.completed {
            continue;
        }

        let ranking = compose_ranking(&entry.score, occupation.growth, occupation.openings, &stats);
        rows.push(ranked_row(occupation, entry, &ranking));
        rankings.push((occupation.code.clone(), ranking));
    }

    cache.store_rankings(&rankings)?;

    rows.sort_by(|a, b| {
        b.final_ranking
            .total_cmp(&a.final_ranking)
            .then_with(|| a.code.cmp(&b.code))
    });

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scoring::OccupationCode;

    fn occupation(code: &str) -> Occupation {
        Occupation {
            code: OccupationCode(code.to_string()),
            title: format!("Occupation {code}"),
            job_zone: 3,
            data_level: "Y".to_string(),
            url: None,
            median_wage: None,
            growth: None,
            openings: None,
        }
    }

    #[test]
    fn partition_is_stable_and_ordered() {
        let occupations: Vec<_> = ["a", "b", "c", "d", "e"].map(occupation).to_vec();
        let batches = partition(&occupations, 2);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[2].len(), 1);
        assert_eq!(batches[0][0].code.0, "a");
        assert_eq!(batches[2][0].code.0, "e");

        // Same input, same partition.
        let again = partition(&occupations, 2);
        for (left, right) in batches.iter().zip(&again) {
            assert_eq!(
                left.iter().map(|o| &o.code).collect::<Vec<_>>(),
                right.iter().map(|o| &o.code).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn partition_tolerates_a_zero_batch_size() {
        let occupations = vec![occupation("a")];
        let batches = partition(&occupations, 0);
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn batch_status_labels_cover_the_machine() {
        assert_eq!(BatchStatus::Pending.label(), "Pending");
        assert_eq!(BatchStatus::InFlight.label(), "In Flight");
        assert_eq!(BatchStatus::Completed.label(), "Completed");
        assert_eq!(BatchStatus::Failed.label(), "Failed");
    }
}
