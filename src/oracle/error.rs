use thiserror::Error;

/// Errors the routing oracle can surface. Per-edge occurrences are handled
/// by the evaluator (drop the path); they only escalate when propagated to
/// the request boundary via `Error::ExternalService`.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned malformed data: {0}")]
    MalformedResponse(String),

    #[error("oracle returned no match for the request")]
    NoMatch,

    #[error("unsupported mode of transport for oracle query: {0:?}")]
    UnsupportedMode(crate::domain::TransportType),
}
