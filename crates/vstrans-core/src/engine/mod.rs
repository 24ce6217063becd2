//! Translation engines
//!
//! Every engine implements [`TranslationEngine`]: an ordered list of texts in,
//! an ordered list of the same length out. Which engine a run uses is decided
//! by [`RunConfig::engine`] through [`build_engine`].

pub mod cloud;
pub mod language;
pub mod offline;

pub use cloud::CloudEngine;
pub use language::LanguageCodeTable;
pub use offline::{OfflineEngine, PackageIndexEntry};

use crate::config::{EngineKind, RunConfig};
use crate::error::TranslateError;
use crate::result::Result;
use async_trait::async_trait;

/// Translates batches of display texts between two languages
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Translate `texts`; the result keeps index correspondence with the input
    ///
    /// `context` is a hint for the provider (the CodeSystem name) and never
    /// changes the number of results.
    async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        context: Option<&str>,
    ) -> Result<Vec<String>>;
}

/// Construct the engine selected by the configuration
pub fn build_engine(config: &RunConfig) -> Result<Box<dyn TranslationEngine>> {
    match config.engine {
        EngineKind::Cloud => Ok(Box::new(CloudEngine::from_config(config)?)),
        EngineKind::Offline => Ok(Box::new(OfflineEngine::from_config(config)?)),
    }
}

/// Fails when an engine returned a different number of texts than it was given
pub fn ensure_same_length(engine: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(TranslateError::engine(
            engine,
            format!("expected {expected} translations, got {actual}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_engine_by_kind() {
        let mut config = RunConfig::default();
        config.cloud.api_key = Some("key:fx".to_string());
        assert_eq!(build_engine(&config).unwrap().name(), "deepl");

        config.engine = EngineKind::Offline;
        assert_eq!(build_engine(&config).unwrap().name(), "argos");
    }

    #[test]
    fn test_ensure_same_length() {
        assert!(ensure_same_length("x", 2, 2).is_ok());
        let err = ensure_same_length("x", 3, 2).unwrap_err();
        assert!(err.to_string().contains("expected 3 translations, got 2"));
    }
}
