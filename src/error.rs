use thiserror::Error;

use crate::oracle::error::OracleError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The five error kinds the engine can surface, per the error handling design.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed `Location`, unknown feature/avoid key, missing origin or
    /// destination, or an empty node inventory. Fails the request.
    #[error("validation error: {0}")]
    Validation(String),

    /// A §4.6 precondition failed, or no path survived evaluation. Carries a
    /// machine-readable reason rather than being raised as an exception.
    #[error("infeasible request: {0}")]
    InfeasibleRequest(String),

    /// The oracle was unreachable or returned malformed data for the whole
    /// request (a single dropped edge is not fatal; see `eval`).
    #[error("external service error: {0}")]
    ExternalService(#[from] OracleError),

    /// The request's deadline elapsed before evaluation finished; partial
    /// results were discarded.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// An invariant was violated (e.g. pattern length != path length). This
    /// indicates a bug in the engine itself, not bad input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Validation(e.to_string())
    }
}
