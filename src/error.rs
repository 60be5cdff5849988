use thiserror::Error;

/// Errors surfaced by the GTEx client.
///
/// Transport failures are kept distinct from malformed payloads so callers
/// can tell "service unreachable" apart from "service returned garbage".
/// Nothing is retried and nothing is swallowed; every variant propagates to
/// the caller at the point of construction or accessor invocation.
#[derive(Debug, Error)]
pub enum GtexError {
    /// Network, TLS, timeout, or non-success HTTP status from the service.
    #[error("failed to reach the GTEx API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not valid JSON, or the `data` envelope key is missing.
    #[error("malformed response from the GTEx API: {reason}")]
    MalformedResponse { reason: String },

    /// The query matched zero records.
    #[error("no GTEx records matched query {query:?}")]
    NotFound { query: String },

    /// The requested field name is not part of the record schema.
    #[error("field {field:?} does not exist in the tissue record schema")]
    KeyLookup { field: String },
}

impl GtexError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GtexError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(query: impl Into<String>) -> Self {
        GtexError::NotFound {
            query: query.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GtexError>;
