use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use url::Url;

use super::FetchError;

// ── Constants ───────────────────────────────────────────────────────

pub const USER_AGENT: &str = concat!("multas/", env!("CARGO_PKG_VERSION"));

// ── FetchClient ─────────────────────────────────────────────────────

/// Blocking HTTP client with a per-request timeout that decodes JSON
/// bodies into typed responses.
pub struct FetchClient {
    http: reqwest::blocking::Client,
}

impl FetchClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Network {
                url: "(client setup)".into(),
                source,
            })?;
        Ok(Self { http })
    }

    /// GET `endpoint` with `params` and decode the body as `T`.
    ///
    /// The body is read as text first so a leading BOM (which the portal
    /// sometimes sends) does not break decoding.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = Url::parse_with_params(endpoint, params).map_err(|e| FetchError::Url {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Network {
                url: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let text = resp.text().map_err(|source| FetchError::Network {
            url: endpoint.to_string(),
            source,
        })?;
        let trimmed = text.trim_start_matches('\u{feff}').trim();

        serde_json::from_str(trimmed).map_err(|e| FetchError::Parse {
            url: endpoint.to_string(),
            reason: format!("{} (body: {})", e, &trimmed[..floor_char_boundary(trimmed, 200)]),
        })
    }
}

/// Largest char boundary in `s` at or below `max`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
