use thiserror::Error;

/// Errors reported by tree, parse and query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The handle does not refer to a usable tree. Reported for operations on
    /// a handle that was torn down after an out-of-memory failure. Never
    /// latched on the tree itself.
    #[error("JSON tree handle is not valid")]
    InvalidTree,

    /// A JSON grammar violation. The same error is latched on the tree until
    /// it is recycled or discarded; see [`JsonTree::last_error`].
    ///
    /// [`JsonTree::last_error`]: crate::JsonTree::last_error
    #[error("invalid JSON sequence: {0}")]
    Sequence(#[from] SequenceError),

    /// A storage ceiling was exceeded mid-parse. The tree has been torn down
    /// and the handle answers [`Error::InvalidTree`] from now on.
    #[error("out of memory: tree storage destroyed")]
    OutOfMemory,

    /// A query was made against a tree that is mid-parse or has a latched
    /// error.
    #[error("tree is not closed")]
    TreeOpen,

    /// A path expression could not be understood.
    #[error("path expression is not understood")]
    BadPath,

    /// A path expression has more segments than the resolver supports.
    #[error("path expression has too many segments")]
    PathTooLong,
}

/// Fatal JSON grammar violations, latched on the tree when detected.
///
/// The descriptions deliberately carry enough context to diagnose malformed
/// input without line/column tracking: the tree is left exactly as far
/// progressed as possible, so the open cursor pinpoints the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("JSON text must start with an object or array")]
    BeginTree,
    #[error("unexpected string (missing comma?)")]
    UnexpectedString,
    #[error("cannot decode an escape in string")]
    BadEscape,
    #[error("string is not valid UTF-8")]
    BadUtf8,
    #[error("unexpected number (missing name or comma)")]
    UnexpectedNumber,
    #[error("cannot convert number representation")]
    BadNumber,
    #[error("unexpected non-string text")]
    UnexpectedText,
    #[error("cannot convert logic representation")]
    BadLogic,
    #[error("tree forced to discontinue parse")]
    Discontinued,
    #[error("expected a name-value separator (:)")]
    NoColon,
    #[error("comma after empty value")]
    LeadingComma,
    #[error("unexpected object or array (missing name or comma)")]
    UnexpectedContainer,
    #[error("mismatched object closure")]
    MismatchedObjectClose,
    #[error("mismatched array closure")]
    MismatchedArrayClose,
    #[error("empty entry at object or array close")]
    BadClosure,
    #[error("unexpected name-value separator (:)")]
    UnexpectedColon,
    #[error("random unquoted text in content")]
    BadText,
}
