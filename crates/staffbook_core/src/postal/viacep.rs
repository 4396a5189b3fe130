//! ViaCEP HTTP client.
//!
//! `GET {endpoint}/{digits}/json/` answers either an address document or
//! `{"erro": true}` for codes it does not know.

use super::{PostalLookup, PostalLookupError};
use crate::config::PostalConfig;
use crate::model::address::Address;
use log::{info, warn};
use serde::Deserialize;
use std::time::{Duration, Instant};

const POSTAL_CODE_DIGITS: usize = 8;

/// Blocking ViaCEP client with connect/read/write timeouts.
#[derive(Clone)]
pub struct ViaCepClient {
    agent: ureq::Agent,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl ViaCepClient {
    pub fn new(config: &PostalConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
            .timeout_read(Duration::from_millis(config.request_timeout_ms))
            .timeout_write(Duration::from_millis(config.request_timeout_ms))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, digits: &str) -> String {
        format!("{}/{digits}/json/", self.endpoint)
    }
}

impl PostalLookup for ViaCepClient {
    fn lookup(&self, postal_code: &str) -> Result<Address, PostalLookupError> {
        let digits = postal_code_digits(postal_code)?;
        let started_at = Instant::now();

        let result = match self
            .agent
            .get(&self.url_for(&digits))
            .set("accept", "application/json")
            .call()
        {
            Ok(response) => response
                .into_string()
                .map_err(|err| PostalLookupError::Transport(err.to_string()))
                .and_then(|body| parse_viacep_body(postal_code, &body)),
            Err(ureq::Error::Status(status, _)) => Err(PostalLookupError::Status(status)),
            Err(ureq::Error::Transport(transport)) => {
                Err(PostalLookupError::Transport(transport.to_string()))
            }
        };

        match &result {
            Ok(_) => info!(
                "event=postal_lookup module=postal status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=postal_lookup module=postal status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

/// Extracts the eight digits of a postal code, accepting `NNNNN-NNN`,
/// `NNNNNNNN` and embedded spaces.
pub fn postal_code_digits(postal_code: &str) -> Result<String, PostalLookupError> {
    let digits: String = postal_code
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if digits.len() != POSTAL_CODE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PostalLookupError::InvalidPostalCode(postal_code.to_string()));
    }
    Ok(digits)
}

fn parse_viacep_body(requested: &str, body: &str) -> Result<Address, PostalLookupError> {
    let payload: ViaCepPayload =
        serde_json::from_str(body).map_err(|err| PostalLookupError::Decode(err.to_string()))?;

    let unknown = match payload.erro {
        Some(serde_json::Value::Bool(flag)) => flag,
        Some(serde_json::Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    };
    if unknown {
        return Err(PostalLookupError::UnknownPostalCode(requested.to_string()));
    }

    let complement = payload.complemento.trim();
    Ok(Address {
        postal_code: requested.to_string(),
        street: payload.logradouro,
        complement: (!complement.is_empty()).then(|| complement.to_string()),
        neighborhood: payload.bairro,
        city: payload.localidade,
        state: payload.uf,
    })
}
