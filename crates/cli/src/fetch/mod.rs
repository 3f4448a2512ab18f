//! Client for the ANT citation portal.
//!
//! The portal exposes two JSON endpoints:
//! - `clp_json_consulta_persona.jsp`: national id → internal person id
//! - `clp_json_citaciones.jsp`: citations for a plate, tax id or person
//!
//! Every failure is a [`FetchError`]. Batch callers log it and move on to
//! the next identifier.

mod common;
mod portal;

pub use common::{FetchClient, USER_AGENT};
pub use portal::{
    cell_to_text, citation_params, CitationResponse, PortalClient, PortalRow, CITATIONS_ENDPOINT,
    PERSON_ENDPOINT, PUBLIC_CONTRACT_ID, PUBLIC_PERSON_ID,
};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Portal answered with a non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body does not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Person lookup returned no id for this national id.
    #[error("no person registered for id {id}")]
    LookupNotFound { id: String },

    /// The configured base URL does not form a valid endpoint URL.
    #[error("invalid portal URL {url}: {reason}")]
    Url { url: String, reason: String },
}
