//! Unified error type for the BMP optimization engine.
//!
//! Configuration errors are
//! fatal at load time, everything else is local-recoverable and handled by
//! the driver that produced it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BmpError {
    /// Missing required key or schema mismatch in a reference input. Fatal at load time.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error reading or writing scenario files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Encoding produced an empty table for a required category.
    #[error("encoding produced no assignments: {0}")]
    EmptyEncoding(String),

    /// Dispatch to the simulator fleet failed or timed out.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// The nonlinear-program solver returned a non-success status.
    #[error("solver error: {0}")]
    Solver(String),

    #[error("{0}")]
    Other(String),
}

pub type BmpResult<T> = Result<T, BmpError>;

impl From<serde_json::Error> for BmpError {
    fn from(err: serde_json::Error) -> Self {
        BmpError::Parse(err.to_string())
    }
}

impl From<anyhow::Error> for BmpError {
    fn from(err: anyhow::Error) -> Self {
        BmpError::Other(err.to_string())
    }
}

impl From<String> for BmpError {
    fn from(s: String) -> Self {
        BmpError::Other(s)
    }
}

impl From<&str> for BmpError {
    fn from(s: &str) -> Self {
        BmpError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_variant_context() {
        let err = BmpError::Solver("did not converge".into());
        assert!(err.to_string().contains("solver error"));
        assert!(err.to_string().contains("did not converge"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BmpError = io_err.into();
        assert!(matches!(err, BmpError::Io(_)));
    }
}
