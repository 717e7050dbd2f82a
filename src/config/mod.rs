use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for the pipeline. Every knob here affects pacing,
/// partitioning, or file locations; none of them changes the scoring
/// arithmetic.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub scorer: ScorerConfig,
    pub paths: PathsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let batch_size = parse_env("APP_BATCH_SIZE", 10usize)?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        let batch_delay_secs = parse_env("APP_BATCH_DELAY_SECS", 2u64)?;
        let start_batch = parse_env("APP_START_BATCH", 0usize)?;
        let max_tokens = parse_env("APP_MAX_TOKENS", 16_000u32)?;

        let model =
            env::var("APP_MODEL").unwrap_or_else(|_| "claude-haiku-4-5-20251001".to_string());
        let api_key = env::var("ANTHROPIC_API_KEY").ok();
        let skill_file = env::var("APP_SKILL_FILE").ok().map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            pipeline: PipelineConfig {
                batch_size,
                batch_delay_secs,
                start_batch,
            },
            scorer: ScorerConfig {
                model,
                max_tokens,
                api_key,
                skill_file,
            },
            paths: PathsConfig {
                input_csv: path_env("APP_INPUT_CSV", "data/input/All_Occupations_ONET.csv"),
                output_csv: path_env("APP_OUTPUT_CSV", "data/output/ai_resilience_scores.csv"),
                cache_file: path_env("APP_CACHE_FILE", "data/intermediate/score_cache.json"),
                progress_log: path_env("APP_PROGRESS_LOG", "data/output/score_log.txt"),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Batch pacing and partitioning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub batch_delay_secs: u64,
    pub start_batch: usize,
}

/// External scoring service settings.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub model: String,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub skill_file: Option<PathBuf>,
}

/// File locations for input, output, cache, and progress log.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub input_csv: PathBuf,
    pub output_csv: PathBuf,
    pub cache_file: PathBuf,
    pub progress_log: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn path_env(var: &str, default: &str) -> PathBuf {
    env::var(var).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn parse_env<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBatchSize,
    InvalidNumber { var: &'static str },
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBatchSize => {
                write!(f, "APP_BATCH_SIZE must be at least 1")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
            ConfigError::MissingApiKey => {
                write!(
                    f,
                    "ANTHROPIC_API_KEY must be set to score occupations (rank-only runs do not need it)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
