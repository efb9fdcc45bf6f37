use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolyloopError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("No eligible subgraph: none of {candidates} candidate regions reached the minimum size")]
    NoEligibleSubgraph { candidates: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PolyloopError>;
