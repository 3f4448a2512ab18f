use std::time::Duration;

use log::debug;
use multas_config::Settings;
use multas_core::{QuerySource, ViolationRecord};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::common::FetchClient;
use super::FetchError;

// ── Constants ───────────────────────────────────────────────────────

pub const PERSON_ENDPOINT: &str = "clp_json_consulta_persona.jsp";
pub const CITATIONS_ENDPOINT: &str = "clp_json_citaciones.jsp";

/// Contract id the portal's public web form sends for plate queries.
pub const PUBLIC_CONTRACT_ID: &str = "698880070";

/// Person id the portal's public web form sends for plate and tax-id queries.
pub const PUBLIC_PERSON_ID: &str = "19664470";

const PAGE_ROWS: u32 = 50;

// ── Response types ──────────────────────────────────────────────────

/// Citation query response (jqGrid layout).
///
/// Both keys are required: a body without them (maintenance notices,
/// error objects) is a parse error, not an empty result.
#[derive(Debug, Clone, Deserialize)]
pub struct CitationResponse {
    #[serde(deserialize_with = "lenient_count")]
    pub records: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub rows: Vec<PortalRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cell: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PersonResponse {
    #[serde(default)]
    id_persona: Option<Value>,
}

/// `records` arrives as a number, occasionally as a numeric string.
fn lenient_count<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("records is not an integer: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("records is not a number: {s:?}"))),
        other => Err(serde::de::Error::custom(format!("records has unexpected type: {other}"))),
    }
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

/// Render one portal cell as report text. Null is an empty cell.
pub fn cell_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Request parameters ──────────────────────────────────────────────

/// Query string of a citation request.
///
/// `person_id` is the looked-up id for national/foreign id queries and is
/// ignored for the other sources. `nd` is the cache-busting timestamp the
/// web form sends (epoch millis).
pub fn citation_params(
    source: QuerySource,
    identifier: &str,
    person_id: Option<&str>,
    nd: i64,
) -> Vec<(&'static str, String)> {
    let (contract, person, plate) = match source {
        QuerySource::Plate => (PUBLIC_CONTRACT_ID, PUBLIC_PERSON_ID, identifier),
        QuerySource::TaxId => ("", PUBLIC_PERSON_ID, ""),
        QuerySource::NationalId | QuerySource::ForeignId => ("", person_id.unwrap_or(""), ""),
    };

    vec![
        ("ps_opcion", "P".to_string()),
        ("ps_id_contrato", contract.to_string()),
        ("ps_id_persona", person.to_string()),
        ("ps_placa", plate.to_string()),
        ("ps_identificacion", identifier.to_string()),
        ("ps_tipo_identificacion", source.id_type_code().to_string()),
        ("_search", "false".to_string()),
        ("nd", nd.to_string()),
        ("rows", PAGE_ROWS.to_string()),
        ("page", "1".to_string()),
        ("sidx", "fecha_emision".to_string()),
        ("sord", "desc".to_string()),
    ]
}

// ── Portal client ───────────────────────────────────────────────────

pub struct PortalClient {
    client: FetchClient,
    base_url: String,
}

impl PortalClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::with_base_url(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: FetchClient::new(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// Resolve a national id to the portal's internal person id.
    pub fn lookup_person(&self, national_id: &str) -> Result<String, FetchError> {
        let params = [
            ("ps_tipo_identificacion", "CED".to_string()),
            ("ps_identificacion", national_id.to_string()),
        ];
        let resp: PersonResponse = self.client.get_json(&self.endpoint(PERSON_ENDPOINT), &params)?;

        let id = match resp.id_persona {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if id.is_empty() {
            return Err(FetchError::LookupNotFound { id: national_id.to_string() });
        }
        debug!("{} -> person {}", national_id, id);
        Ok(id)
    }

    /// Raw citation query for an already-normalized identifier.
    pub fn fetch_citations(
        &self,
        source: QuerySource,
        identifier: &str,
        person_id: Option<&str>,
    ) -> Result<CitationResponse, FetchError> {
        let nd = chrono::Utc::now().timestamp_millis();
        let params = citation_params(source, identifier, person_id, nd);
        self.client.get_json(&self.endpoint(CITATIONS_ENDPOINT), &params)
    }

    /// All citations for `identifier`, doing the person lookup first when
    /// the source needs one. An empty result is not an error.
    pub fn query(&self, source: QuerySource, identifier: &str) -> Result<Vec<ViolationRecord>, FetchError> {
        let person_id = if source.needs_person_lookup() {
            Some(self.lookup_person(identifier)?)
        } else {
            None
        };

        let resp = self.fetch_citations(source, identifier, person_id.as_deref())?;
        if resp.records <= 0 {
            return Ok(Vec::new());
        }

        Ok(resp
            .rows
            .iter()
            .map(|row| ViolationRecord::new(identifier, row.cell.iter().map(cell_to_text).collect()))
            .collect())
    }
}
