use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourcerError {
    /// A single upstream fetch failed. Recovered locally: the unit (hashtag
    /// or identity) is skipped and the run continues.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The durable store cannot be opened or written. Fatal: the run aborts.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected before any external call; surfaced to the operator as-is.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
