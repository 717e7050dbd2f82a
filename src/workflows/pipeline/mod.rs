pub mod cache;
pub mod collaborator;
pub mod output;
pub mod progress;
pub mod runner;

pub use cache::{CacheEntry, CacheError, CacheStore};
pub use collaborator::{
    AnthropicScorer, CollaboratorError, RawOccupationScores, ScoreCollaborator,
};
pub use output::{write_rankings, OutputError, RankedRow};
pub use progress::ProgressLog;
pub use runner::{
    finalize, BatchReport, BatchRunner, BatchStatus, FailurePolicy, RunReport, RunnerConfig,
};

use crate::workflows::scoring::ValidationError;

/// Error raised while driving the batch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to append to progress log: {0}")]
    Progress(#[source] std::io::Error),
}
