//! Error types for skeleton writing and simplification
//!
//! Two families live here. [`ResolveError`] covers bad input data found while resolving a
//! marker: it never leaves the writer, it is logged and rendered as a visible token so a
//! damaged document can be spotted in the output. [`WriterError`] and [`SimplifyError`] are
//! caller bugs and are returned as `Err`.

use thiserror::Error;

/// Recoverable marker resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// No referent with the marker id is cached (never declared, or its uses are exhausted).
    RefNotFound,
    /// A marker start token without a matching end token.
    InvalidRefMarker,
    /// The segment named by a segment marker does not exist.
    InvalidSegmentRef,
    /// The property named by a property marker does not exist.
    PropNotFound,
    /// The property exists but has no value.
    PropValueNull,
    /// The marker owner could not be resolved to a resource.
    NullRef,
    /// The referent kind cannot be rendered in this position.
    InvalidRefType,
}

impl ResolveError {
    /// The token written into the output in place of the marker.
    pub fn token(self) -> &'static str {
        match self {
            ResolveError::RefNotFound => "-ERR:REF-NOT-FOUND-",
            ResolveError::InvalidRefMarker => "-ERR:INVALID-REF-MARKER-",
            ResolveError::InvalidSegmentRef => "-ERR:INVALID-SEGMENT-REF-",
            ResolveError::PropNotFound => "-ERR:PROP-NOT-FOUND-",
            ResolveError::PropValueNull => "-ERR:PROP-VALUE-NULL-",
            ResolveError::NullRef => "-ERR:NULL-REF-",
            ResolveError::InvalidRefType => "-ERR:INVALID-REFTYPE-",
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Contract violations detected by the [`crate::SkeletonWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterError {
    /// A content self-marker is owned by something other than a text unit.
    #[error("the self-reference in the skeleton of '{owner}' must point to a text unit")]
    SelfReferenceNotTextUnit { owner: String },
    /// A code index in a fragment's coded text does not match any code.
    #[error("inline code index {index} is out of range in fragment '{text}'")]
    CodeIndexOutOfRange { index: usize, text: String },
}

/// Contract violations detected by the [`crate::SkeletonSimplifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    #[error(transparent)]
    Writer(#[from] WriterError),
    /// An end event arrived while no referent group was being collected for it.
    #[error("'{0}' closes a group that was never opened")]
    UnbalancedEnd(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct() {
        let all = [
            ResolveError::RefNotFound,
            ResolveError::InvalidRefMarker,
            ResolveError::InvalidSegmentRef,
            ResolveError::PropNotFound,
            ResolveError::PropValueNull,
            ResolveError::NullRef,
            ResolveError::InvalidRefType,
        ];
        let mut tokens: Vec<_> = all.iter().map(|e| e.token()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), all.len());
        assert!(tokens.iter().all(|t| t.starts_with("-ERR:")));
    }

    #[test]
    fn writer_error_message_names_owner() {
        let err = WriterError::SelfReferenceNotTextUnit {
            owner: "dp1".to_string(),
        };
        assert!(err.to_string().contains("'dp1'"));
    }
}
