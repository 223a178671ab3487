use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Message(String),

    #[error("scenario file not found: {0}")]
    MissingScenario(PathBuf),

    #[error("step {step} ({call}): {detail}")]
    ExpectationFailed {
        step: usize,
        call: String,
        detail: String,
    },

    #[error("{failed} of {total} scenario steps did not behave as expected")]
    ScenarioFailed { failed: usize, total: usize },

    #[error(transparent)]
    Chain(#[from] counter_forge::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
