use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// The caller supplied an invalid parameter set or input. Retrying
    /// without changing the inputs cannot succeed.
    User,

    /// The derivation could not obtain the resources it needs, most
    /// notably scratch-table memory. The caller must lower N/r/p or
    /// free memory before retrying.
    Resource,

    /// Unexpected state reached inside saltmine. Derivation is
    /// deterministic, so this always indicates a logic bug rather than
    /// a recoverable condition.
    Internal,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// N is not a power of two, or N <= 1.
    CostNotPowerOfTwo,
    /// r or p is zero.
    ZeroCostParameter,
    /// r * p exceeds the RFC 7914 limit of 2^30.
    ParallelismTooLarge,
    /// A size computation (scratch table, working block, or output
    /// block count) would overflow addressable memory.
    SizeOverflow,
    /// dkLen is zero or otherwise unusable.
    OutputLength,
    /// The salt or passphrase could not be decoded at the boundary.
    MalformedInput,
    /// A required option was absent from the boundary request.
    MissingOption,
    /// Allocating the scratch table or working block failed.
    Allocation,
    /// Unexpected state reached within saltmine logic.
    InternalInvariant,
    /// Interaction with stdin/stdout or the terminal failed (CLI only).
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct SaltmineError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl SaltmineError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Shorthand for parameter-validation failures, the most common error site.
pub(crate) fn invalid_parameter(kind: ErrorKind, msg: impl Into<String>) -> SaltmineError {
    SaltmineError::with_kind(ErrorCategory::User, kind, msg)
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SaltmineError>;
