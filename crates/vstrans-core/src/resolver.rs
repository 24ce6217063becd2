//! ValueSet expansion resolution
//!
//! An identifier is first tried as a local file. If that file cannot be read,
//! the terminology server is asked to expand the ValueSet with that canonical
//! URL. Remote results are never written to disk.

use crate::config::RunConfig;
use crate::error::TranslateError;
use crate::http;
use crate::models::ValueSetExpansionDocument;
use crate::result::Result;
use reqwest::StatusCode;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info};

/// Resolves ValueSet identifiers to expansion documents
#[derive(Debug, Clone)]
pub struct ValueSetResolver {
    client: reqwest::Client,
    /// Base address of the FHIR terminology server
    server: Option<String>,
}

impl ValueSetResolver {
    pub fn new(client: reqwest::Client, server: Option<String>) -> Self {
        Self { client, server }
    }

    /// Build the resolver, including the mutual-TLS transport, from a run config
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let client = http::terminology_client(config)?;
        Ok(Self::new(client, config.terminology_server.clone()))
    }

    /// Resolve an identifier (local path or canonical URL) to its expansion
    pub async fn resolve(&self, identifier: &str) -> Result<ValueSetExpansionDocument> {
        if let Some(content) = read_local(identifier).await? {
            debug!("Loaded ValueSet {} from local file", identifier);
            return serde_json::from_str(&content).map_err(|e| {
                TranslateError::malformed(identifier, format!("invalid JSON: {e}"))
            });
        }

        info!(
            "{} not found among files locally, downloading instead ...",
            identifier
        );
        self.expand_remote(identifier).await
    }

    /// `GET {server}/ValueSet/$expand?url={identifier}`
    async fn expand_remote(&self, identifier: &str) -> Result<ValueSetExpansionDocument> {
        let server = self.server.as_deref().ok_or_else(|| {
            TranslateError::resolution(
                identifier,
                None,
                "not a local file and no terminology server is configured",
            )
        })?;
        let endpoint = format!("{}/ValueSet/$expand", server.trim_end_matches('/'));

        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", identifier)])
            .send()
            .await
            .map_err(|e| TranslateError::resolution(identifier, None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::resolution(identifier, Some(status.as_u16()), e.to_string()))?;

        if status != StatusCode::OK {
            error!("Request failed with status code {}", status.as_u16());
            let diagnostics = operation_outcome_diagnostics(&body)
                .unwrap_or_else(|| "no diagnostics reported".to_string());
            error!("{}", diagnostics);
            return Err(TranslateError::resolution(
                identifier,
                Some(status.as_u16()),
                format!("HTTP {}: {}", status.as_u16(), diagnostics),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            TranslateError::malformed(identifier, format!("invalid expansion response: {e}"))
        })
    }
}

/// Contents of the local file, `None` when there is no such file to read
///
/// Only a missing or unreadable path falls back to the terminology server. A
/// file that exists but is not UTF-8 is malformed; other read errors are I/O
/// failures.
async fn read_local(identifier: &str) -> Result<Option<String>> {
    let path = Path::new(identifier);
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::InvalidInput => {
                debug!("Cannot read {} locally: {}", path.display(), e);
                Ok(None)
            }
            ErrorKind::InvalidData => Err(TranslateError::malformed(
                identifier,
                format!("local file is not valid UTF-8: {e}"),
            )),
            _ => Err(TranslateError::io_error(path, e)),
        },
    }
}

/// First `issue[].diagnostics` of an OperationOutcome body
fn operation_outcome_diagnostics(body: &str) -> Option<String> {
    let outcome: Value = serde_json::from_str(body).ok()?;
    outcome
        .get("issue")?
        .as_array()?
        .iter()
        .find_map(|issue| issue.get("diagnostics").and_then(Value::as_str))
        .map(str::to_string)
}
