//! Run configuration consumed by the translation pipeline

use crate::error::TranslateError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_TARGET_FOLDER: &str = "code-systems";

const DEFAULT_ARGOS_INDEX: &str =
    "https://raw.githubusercontent.com/argosopentech/argospm-index/main/index.json";
const DEFAULT_LOCAL_RUNTIME: &str = "http://localhost:5000";

/// Which translation engine a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// DeepL-compatible cloud API
    #[default]
    Cloud,
    /// Locally installed language packages
    Offline,
}

impl FromStr for EngineKind {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cloud" | "deepl" => Ok(EngineKind::Cloud),
            "offline" | "argos" => Ok(EngineKind::Offline),
            other => Err(TranslateError::config_error(format!(
                "Unknown translation engine '{other}' (expected cloud or offline)"
            ))),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Cloud => write!(f, "cloud"),
            EngineKind::Offline => write!(f, "offline"),
        }
    }
}

/// What the orchestrator does when a translation or persistence step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and continue with the next ValueSet
    #[default]
    Skip,
    /// Stop the whole run
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(FailurePolicy::Skip),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(TranslateError::config_error(format!(
                "Unknown failure policy '{other}' (expected skip or abort)"
            ))),
        }
    }
}

/// Cloud engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudEngineConfig {
    /// API key for the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override for the API base address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra target language mappings, applied on top of the built-in table
    pub language_overrides: BTreeMap<String, String>,
}

/// Offline engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfflineEngineConfig {
    /// Directory that holds installed language packages
    pub packages_dir: PathBuf,
    /// Package index listing the downloadable language pairs
    pub index_url: String,
    /// Local translation runtime serving the installed packages
    pub runtime_url: String,
}

impl Default for OfflineEngineConfig {
    fn default() -> Self {
        Self {
            packages_dir: PathBuf::from("language-packages"),
            index_url: DEFAULT_ARGOS_INDEX.to_string(),
            runtime_url: DEFAULT_LOCAL_RUNTIME.to_string(),
        }
    }
}

/// Everything a translation run needs, passed explicitly into the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Base address of the terminology server (FHIR endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminology_server: Option<String>,
    /// PEM client certificate for mutual TLS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<PathBuf>,
    /// PEM private key for mutual TLS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<PathBuf>,
    pub target_folder: PathBuf,
    pub batch_size: usize,
    pub dry_run: bool,
    pub target_langs: Vec<String>,
    pub engine: EngineKind,
    pub on_engine_error: FailurePolicy,
    /// CodeSystem template; the built-in template is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Request timeout for all HTTP transports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub cloud: CloudEngineConfig,
    pub offline: OfflineEngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            terminology_server: None,
            client_certificate: None,
            private_key: None,
            target_folder: PathBuf::from(DEFAULT_TARGET_FOLDER),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            target_langs: vec!["de".to_string(), "en".to_string()],
            engine: EngineKind::default(),
            on_engine_error: FailurePolicy::default(),
            template: None,
            timeout_secs: None,
            cloud: CloudEngineConfig::default(),
            offline: OfflineEngineConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate settings that would otherwise fail in the middle of a run
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(TranslateError::config_error(
                "batch size must be at least 1",
            ));
        }

        if self.target_langs.is_empty() {
            return Err(TranslateError::config_error(
                "at least one target language is required",
            ));
        }

        if let Some(lang) = self.target_langs.iter().find(|l| l.trim().is_empty()) {
            return Err(TranslateError::config_error(format!(
                "invalid target language '{lang}'"
            )));
        }

        if self.client_certificate.is_some() != self.private_key.is_some() {
            return Err(TranslateError::config_error(
                "client certificate and private key must be given together",
            ));
        }

        if self.engine == EngineKind::Cloud
            && !self.dry_run
            && self.cloud.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(TranslateError::config_error(
                "the cloud translation engine needs an API key (use --dry-run to only count characters)",
            ));
        }

        Ok(())
    }
}
