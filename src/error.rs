//! Errors raised while constructing or matching tagged values.

use alloc::string::String;

/// Everything that can go wrong around a tagged value.
///
/// `ShapeMismatch`, `UnknownTag` and `DuplicateTag` come back as ordinary
/// `Result`s from the dynamic registry. `HandlerKey` and `BranchKeyMismatch`
/// mean a handler table or branch was built wrong; the matching engine never
/// returns them and panics with their message instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The payload does not have the shape registered for its tag.
    #[error("payload for tag `{tag}` must be `{expected}`, found `{found}`")]
    ShapeMismatch {
        tag: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The tag is not part of the registry.
    #[error("tag `{tag}` is not registered in `{registry}`")]
    UnknownTag {
        registry: &'static str,
        tag: String,
    },

    /// A registry declared the same tag twice.
    #[error("tag `{tag}` is declared more than once in `{registry}`")]
    DuplicateTag {
        registry: &'static str,
        tag: &'static str,
    },

    /// No handler exists for the tag and the table has no `ELSE` entry.
    #[error("no handler for tag `{tag}` and no ELSE fallback")]
    HandlerKey { tag: &'static str },

    /// A branch was run on a value carrying a different tag.
    #[error("branch for tag `{expected}` invoked on a value tagged `{found}`")]
    BranchKeyMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Aborts on a violated matching invariant.
#[cold]
#[track_caller]
pub(crate) fn defect(err: Error) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "match.defect");

    panic!("{err}")
}
