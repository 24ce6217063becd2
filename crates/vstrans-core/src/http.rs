//! HTTP client construction shared by the resolver and the engines

use crate::config::RunConfig;
use crate::error::TranslateError;
use crate::result::Result;
use std::fs;
use std::path::Path;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the terminology server, with the mutual-TLS identity if configured
pub fn terminology_client(config: &RunConfig) -> Result<reqwest::Client> {
    let mut builder = base_builder(config);

    if let (Some(cert), Some(key)) = (&config.client_certificate, &config.private_key) {
        tracing::debug!(
            "Using client certificate {} for terminology server",
            cert.display()
        );
        builder = builder
            .use_rustls_tls()
            .identity(load_identity(cert, key)?);
    }

    builder
        .build()
        .map_err(|e| TranslateError::config_error(format!("Failed to build HTTP client: {e}")))
}

/// Plain client for translation providers and package downloads
pub fn engine_client(config: &RunConfig) -> Result<reqwest::Client> {
    base_builder(config)
        .build()
        .map_err(|e| TranslateError::config_error(format!("Failed to build HTTP client: {e}")))
}

fn base_builder(config: &RunConfig) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
}

/// PEM certificate and PEM private key combined into one identity
fn load_identity(cert: &Path, key: &Path) -> Result<reqwest::Identity> {
    let mut pem = fs::read(cert).map_err(|e| TranslateError::io_error(cert, e))?;
    if !pem.ends_with(b"\n") {
        pem.push(b'\n');
    }
    pem.extend(fs::read(key).map_err(|e| TranslateError::io_error(key, e))?);

    reqwest::Identity::from_pem(&pem).map_err(|e| {
        TranslateError::config_error(format!(
            "Invalid client certificate '{}' or key '{}': {}",
            cert.display(),
            key.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_clients_build() {
        let config = RunConfig {
            timeout_secs: Some(5),
            ..Default::default()
        };
        assert!(terminology_client(&config).is_ok());
        assert!(engine_client(&config).is_ok());
    }

    #[test]
    fn test_missing_certificate_file() {
        let config = RunConfig {
            client_certificate: Some(PathBuf::from("/nonexistent/client.pem")),
            private_key: Some(PathBuf::from("/nonexistent/client.key")),
            ..Default::default()
        };
        let err = terminology_client(&config).unwrap_err();
        assert!(matches!(err, TranslateError::IoError { .. }));
    }
}
