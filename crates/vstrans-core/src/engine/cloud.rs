//! DeepL-compatible cloud translation engine

use super::{LanguageCodeTable, TranslationEngine, ensure_same_length};
use crate::config::RunConfig;
use crate::error::TranslateError;
use crate::http;
use crate::result::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const ENGINE_NAME: &str = "deepl";
const FREE_API_BASE: &str = "https://api-free.deepl.com";
const PRO_API_BASE: &str = "https://api.deepl.com";

/// Status the provider uses for an exhausted character quota
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a [String],
    source_lang: String,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Authenticated client for the cloud translation API
#[derive(Debug, Clone)]
pub struct CloudEngine {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    languages: LanguageCodeTable,
}

impl CloudEngine {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        api_base: Option<String>,
        languages: LanguageCodeTable,
    ) -> Self {
        let api_key = api_key.into();
        let api_base = api_base
            .unwrap_or_else(|| default_api_base(&api_key).to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client,
            api_key,
            api_base,
            languages,
        }
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        Ok(Self::new(
            http::engine_client(config)?,
            config.cloud.api_key.clone().unwrap_or_default(),
            config.cloud.api_base.clone(),
            LanguageCodeTable::with_overrides(&config.cloud.language_overrides),
        ))
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn provider_error(&self, status: StatusCode, body: &str) -> TranslateError {
        let message = serde_json::from_str::<ProviderError>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        let engine = ENGINE_NAME.to_string();

        match status.as_u16() {
            401 | 403 => TranslateError::Authentication { engine, message },
            429 => TranslateError::RateLimited { engine, message },
            QUOTA_EXCEEDED => TranslateError::QuotaExceeded { engine, message },
            _ => TranslateError::EngineError {
                engine,
                message: format!("HTTP {}: {}", status.as_u16(), message),
            },
        }
    }
}

/// Free-tier keys carry a `:fx` suffix and use a separate host
fn default_api_base(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        FREE_API_BASE
    } else {
        PRO_API_BASE
    }
}

#[async_trait]
impl TranslationEngine for CloudEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        context: Option<&str>,
    ) -> Result<Vec<String>> {
        if self.api_key.is_empty() {
            return Err(TranslateError::Authentication {
                engine: ENGINE_NAME.to_string(),
                message: "no API key configured".to_string(),
            });
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        info!("Translating using deepl ...");
        let request = TranslateRequest {
            text: texts,
            source_lang: source_lang.to_ascii_uppercase(),
            target_lang: self.languages.normalize(target_lang).to_ascii_uppercase(),
            context,
        };
        debug!(
            "Sending {} texts {} -> {}",
            texts.len(),
            request.source_lang,
            request.target_lang
        );

        let response = self
            .client
            .post(format!("{}/v2/translate", self.api_base))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.provider_error(status, &body));
        }

        let parsed: TranslateResponse = response.json().await?;
        let translations: Vec<String> = parsed.translations.into_iter().map(|t| t.text).collect();
        ensure_same_length(ENGINE_NAME, texts.len(), translations.len())?;

        Ok(translations)
    }
}
