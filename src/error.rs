use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("failed to parse config: {0}")]
    ConfigFormat(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("loss must be finite, got {0}")]
    NonFiniteLoss(f64),

    #[error("accuracy {0} is outside the configured range")]
    InvalidAccuracy(f64),

    #[error("optimizer step failed: {0}")]
    Optimizer(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("plot error: {0}")]
    Plot(String),

    #[error("{0} requires a cargo feature that is not enabled")]
    FeatureDisabled(&'static str),
}
