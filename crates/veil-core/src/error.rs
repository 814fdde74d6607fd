//! Error types for VEIL
//!
//! Every failure is fatal to the call chain that produced it. Operations
//! return [`VeilResult`] and the top-level caller decides whether to report
//! the error through the Diagnostic enum or to propagate it.

use std::fmt;

use owo_colors::OwoColorize;
use thiserror::Error;

use crate::Kind;

/// Tracing target used for diagnostics surfaced to the user
pub const DIAGNOSTIC_TARGET: &str = "veil::diagnostic";

/// Classification of every VEIL failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Write against a read-only view, or a non-callable guarded as callable
    UnsupportedOperation = 1,
    /// Kind guard mismatch, or a duplicate enum name
    TypeMismatch = 2,
    /// Missing reference. Reserved: no operation raises it yet.
    AbsentReference = 3,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 3] = [
        ErrorKind::UnsupportedOperation,
        ErrorKind::TypeMismatch,
        ErrorKind::AbsentReference,
    ];

    /// Human-readable label used in rendered diagnostics
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::AbsentReference => "AbsentReference",
        }
    }

    /// Member name inside the Diagnostic enum
    pub fn enum_name(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::AbsentReference => "ABSENT_REFERENCE",
        }
    }

    #[inline]
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        match ordinal {
            1 => Some(ErrorKind::UnsupportedOperation),
            2 => Some(ErrorKind::TypeMismatch),
            3 => Some(ErrorKind::AbsentReference),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled message of the shape `[ source ] Kind: message`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, source: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Plain rendering, used for error text and non-terminal sinks
    pub fn render(&self) -> String {
        render_labeled(&self.source, self.kind.label(), &self.message, false)
    }

    /// Rendering with terminal emphasis
    pub fn render_styled(&self) -> String {
        render_labeled(&self.source, self.kind.label(), &self.message, true)
    }

    /// Surface the diagnostic on the user-visible log
    pub fn emit(&self) {
        tracing::error!(
            target: DIAGNOSTIC_TARGET,
            source = %self.source,
            kind = self.kind.label(),
            detail = %self.message,
            "{}",
            self.render()
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render `[ source ] label: message`.
///
/// Source and label share one emphasis, the message uses another.
pub fn render_labeled(source: &str, label: &str, message: &str, styled: bool) -> String {
    if styled {
        format!(
            "[ {} ] {}: {}",
            source.yellow().bold(),
            label.yellow().bold(),
            message.bright_red()
        )
    } else {
        format!("[ {} ] {}: {}", source, label, message)
    }
}

/// Core VEIL errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VeilError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Type mismatch: received {received}, expected {expected}")]
    TypeMismatch { received: Kind, expected: Kind },

    #[error("Duplicate enum name: {0}")]
    DuplicateName(String),

    #[error("Absent reference: {0}")]
    AbsentReference(String),

    /// Raised through a Diagnostic enum member, already logged
    #[error("{0}")]
    Fatal(Diagnostic),
}

impl VeilError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VeilError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            VeilError::TypeMismatch { .. } | VeilError::DuplicateName(_) => ErrorKind::TypeMismatch,
            VeilError::AbsentReference(_) => ErrorKind::AbsentReference,
            VeilError::Fatal(diagnostic) => diagnostic.kind,
        }
    }

    /// Message part of the diagnostic this error would render as
    pub fn detail(&self) -> String {
        match self {
            VeilError::UnsupportedOperation(message) | VeilError::AbsentReference(message) => {
                message.clone()
            }
            VeilError::TypeMismatch { received, expected } => {
                format!("received {received}, expected {expected}")
            }
            VeilError::DuplicateName(name) => format!("duplicate enum name {name}"),
            VeilError::Fatal(diagnostic) => diagnostic.message.clone(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, VeilError::Fatal(_))
    }
}

/// Result type for VEIL operations
pub type VeilResult<T> = Result<T, VeilError>;
