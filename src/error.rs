use thiserror::Error;

/// Errors raised while building, configuring or driving a network.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameters: layer sizes, explicit tensors, mutation scale.
    #[error("invalid config: {0}")]
    Config(String),

    /// A vector length does not match the layer it is fed to.
    #[error("shape mismatch in {context}: expected length {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// A layer index outside `0..count`.
    #[error("layer index {index} out of range for a network of {count} layers")]
    LayerIndex { index: usize, count: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns `Ok(())` when `got == expected`, otherwise a `ShapeMismatch`.
    pub(crate) fn check_len(context: &'static str, expected: usize, got: usize) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(Error::ShapeMismatch { context, expected, got })
        }
    }
}
