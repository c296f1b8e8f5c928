use thiserror::Error;

/// Error raised for a syntactically malformed path expression.
///
/// Malformed *input JSON* is never an error: the scanner gives up and the
/// query yields a non-existent handle. Only the path string itself can
/// fail, and the failure is carried inside the returned
/// [`Context`](crate::Context) — observable via
/// [`Context::cause`](crate::Context::cause) — or returned directly by
/// [`try_get`](crate::try_get).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A `{...}` or `[...]` multi-selector is not closed.
    #[error("unbalanced bracket in multi-selector")]
    UnbalancedSelector,
    /// A `#(...)` query is missing its closing parenthesis.
    #[error("unterminated query")]
    UnterminatedQuery,
    /// `@` was not followed by a transformer name.
    #[error("empty transformer name")]
    EmptyTransformer,
    /// The named transformer is not in the registry.
    #[error("unknown transformer @{0}")]
    UnknownTransformer(String),
}
