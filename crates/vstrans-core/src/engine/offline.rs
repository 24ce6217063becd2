//! Offline translation with locally installed language packages
//!
//! Packages come from an Argos-style package index. A package is installed
//! once per language pair into `{packages_dir}/{from}_{to}/`; the local
//! runtime serves translations from the installed packages.

use super::{TranslationEngine, ensure_same_length};
use crate::config::RunConfig;
use crate::error::TranslateError;
use crate::http;
use crate::result::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ENGINE_NAME: &str = "argos";
const MANIFEST_FILE: &str = "package.json";
const ARCHIVE_FILE: &str = "package.argosmodel";

/// One entry of the package index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackageIndexEntry {
    pub from_code: String,
    pub to_code: String,
    #[serde(default)]
    pub package_version: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RuntimeRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuntimeResponse {
    translated_text: String,
}

/// Term-by-term translation against locally installed packages
#[derive(Debug, Clone)]
pub struct OfflineEngine {
    client: reqwest::Client,
    packages_dir: PathBuf,
    index_url: String,
    runtime_url: String,
}

impl OfflineEngine {
    pub fn new(
        client: reqwest::Client,
        packages_dir: impl Into<PathBuf>,
        index_url: impl Into<String>,
        runtime_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            packages_dir: packages_dir.into(),
            index_url: index_url.into(),
            runtime_url: runtime_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        Ok(Self::new(
            http::engine_client(config)?,
            config.offline.packages_dir.clone(),
            config.offline.index_url.clone(),
            config.offline.runtime_url.clone(),
        ))
    }

    fn package_dir(&self, source_lang: &str, target_lang: &str) -> PathBuf {
        self.packages_dir.join(format!("{source_lang}_{target_lang}"))
    }

    /// Whether a package for the pair is present on disk
    pub fn is_installed(&self, source_lang: &str, target_lang: &str) -> bool {
        self.package_dir(source_lang, target_lang)
            .join(MANIFEST_FILE)
            .is_file()
    }

    /// Install the package for a language pair unless it is already installed
    pub async fn ensure_installed(&self, source_lang: &str, target_lang: &str) -> Result<()> {
        if self.is_installed(source_lang, target_lang) {
            debug!("Language package {}->{} already installed", source_lang, target_lang);
            return Ok(());
        }

        let install_error = |message: String| TranslateError::ModelInstall {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            message,
        };

        info!(
            "Installing language package {}->{} from {}",
            source_lang, target_lang, self.index_url
        );
        let index: Vec<PackageIndexEntry> = self
            .client
            .get(&self.index_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| install_error(format!("cannot fetch package index: {e}")))?
            .json()
            .await
            .map_err(|e| install_error(format!("invalid package index: {e}")))?;

        let package = index
            .into_iter()
            .find(|p| p.from_code == source_lang && p.to_code == target_lang)
            .ok_or_else(|| install_error("no matching package in index".to_string()))?;
        let link = package
            .links
            .first()
            .ok_or_else(|| install_error("package has no download link".to_string()))?;

        let archive = self
            .client
            .get(link)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| install_error(format!("download failed: {e}")))?
            .bytes()
            .await
            .map_err(|e| install_error(format!("download failed: {e}")))?;

        let dir = self.package_dir(source_lang, target_lang);
        write_file(&dir, ARCHIVE_FILE, &archive).await?;
        // Manifest last: its presence marks a complete installation
        write_file(&dir, MANIFEST_FILE, &serde_json::to_vec_pretty(&package)?).await?;

        info!(
            "Installed language package {}->{} ({})",
            source_lang,
            target_lang,
            package.package_version.as_deref().unwrap_or("unknown version")
        );
        Ok(())
    }

    async fn translate_term(&self, term: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/translate", self.runtime_url))
            .json(&RuntimeRequest {
                q: term,
                source: source_lang,
                target: target_lang,
                format: "text",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::engine(
                ENGINE_NAME,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        let parsed: RuntimeResponse = response.json().await?;
        Ok(parsed.translated_text)
    }
}

async fn write_file(dir: &Path, name: &str, content: &[u8]) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| TranslateError::io_error(dir, e))?;
    let path = dir.join(name);
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| TranslateError::io_error(&path, e))
}

#[async_trait]
impl TranslationEngine for OfflineEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        _context: Option<&str>,
    ) -> Result<Vec<String>> {
        info!("Translating using argos ...");
        self.ensure_installed(source_lang, target_lang).await?;

        let mut translations = Vec::with_capacity(texts.len());
        for term in texts {
            translations.push(self.translate_term(term, source_lang, target_lang).await?);
        }
        ensure_same_length(ENGINE_NAME, texts.len(), translations.len())?;

        Ok(translations)
    }
}
