use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the I/O shell around the simulation.
///
/// The simulation core itself never fails; everything here comes from
/// loading settings, writing output or driving the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings rejected by validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Malformed JSON (settings file) or failed JSON output.
    #[error("json error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File, stdout or terminal failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
