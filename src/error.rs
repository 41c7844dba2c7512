use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopseedError {
    /// Invalid or inconsistent search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch all for unexpected internal problems.
    #[error("internal error: {0}")]
    Internal(String),
}
