//! Error types for the VEIL runtime

use thiserror::Error;
use veil_core::{ErrorKind, VeilError};

/// Runtime errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Invalid version {input:?}: {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error(transparent)]
    Core(#[from] VeilError),
}

impl RuntimeError {
    /// Classification shared with core errors
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::InvalidVersion { .. } | RuntimeError::InvalidFilter { .. } => {
                ErrorKind::TypeMismatch
            }
            RuntimeError::Core(err) => err.kind(),
        }
    }
}

/// Result type for runtime operations
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = RuntimeError::InvalidVersion {
            input: "1.x".into(),
            reason: "minor is not a number".into(),
        };
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "Invalid version \"1.x\": minor is not a number"
        );

        let core: RuntimeError = VeilError::UnsupportedOperation("x".into()).into();
        assert_eq!(core.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(core.to_string(), "Unsupported operation: x");
    }
}
