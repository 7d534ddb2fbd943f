use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerityError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    /// The collaborator cannot run at all (missing credentials, no model loaded).
    #[error("{0} is not configured")]
    Unavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
