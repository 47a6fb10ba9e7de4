//! Error types for the pool client.
//!
//! Every failure the crate can produce is a variant of [`Error`]. Transport
//! problems, credential problems and malformed upstream data are distinct
//! variants so callers can react to each separately; none of them is ever
//! silently papered over with a default value.

/// Convenience result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the pool client and its response mappers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client was built without an API key.
    ///
    /// Raised before any network attempt is made.
    #[error("no API key configured for the pool client")]
    MissingCredential,

    /// Network, protocol or upstream query failure, surfaced verbatim.
    ///
    /// Covers wire errors, non-2xx responses and errors reported in the
    /// GraphQL response envelope (auth failures, malformed documents). The
    /// client never retries.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A hash rate unit symbol outside the recognized set.
    #[error("unrecognized hash rate unit `{0}`, expected one of H, KH, MH, GH, TH, PH, EH, ZH")]
    UnknownUnit(String),

    /// A numeric field that is neither absent nor a base-10 number.
    ///
    /// Absent fields take their documented default; a non-numeric non-empty
    /// value is always a hard failure.
    #[error("field `{field}` is not a base-10 numeric literal: `{value}`")]
    InvalidNumericLiteral {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },

    /// A timestamp field that cannot be parsed as an instant.
    #[error("field `{field}` is not a recognizable timestamp: `{value}`")]
    InvalidTimestamp {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },

    /// The response tree does not match the shape the query requested.
    ///
    /// Raised when a named member is missing, when a collection is neither
    /// an edges nor a nodes envelope, or when a required passthrough field
    /// is absent.
    #[error("malformed response: no recognized shape at `{0}`")]
    MalformedResponseShape(&'static str),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
