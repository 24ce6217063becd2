//! Shared fixtures and a recording engine for unit tests

use crate::engine::TranslationEngine;
use crate::error::TranslateError;
use crate::result::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub mod fixtures {
    use serde_json::json;

    /// Expansion with `count` concepts `C1..Cn` displayed as `Begriff 1..n`
    pub fn expansion_json(name: &str, count: usize) -> String {
        let contains: Vec<_> = (1..=count)
            .map(|i| {
                json!({
                    "system": "http://example.org/CodeSystem/test",
                    "code": format!("C{i}"),
                    "display": format!("Begriff {i}")
                })
            })
            .collect();

        json!({
            "resourceType": "ValueSet",
            "name": name,
            "url": format!("https://fdpg.de/fhir/ValueSet/{name}"),
            "status": "active",
            "expansion": {
                "parameter": [
                    { "name": "used-codesystem", "valueUri": "http://example.org/CodeSystem/test|1.0.0" }
                ],
                "contains": contains
            }
        })
        .to_string()
    }
}

/// A single call made to the recording engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    pub texts: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub context: Option<String>,
}

/// Engine that prefixes each text with `[target]` and records every call
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    fail_for: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a quota error whenever the context equals `context`
    pub fn failing_for(context: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_for: Some(context.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        context: Option<&str>,
    ) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(EngineCall {
            texts: texts.to_vec(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            context: context.map(str::to_string),
        });

        if self.fail_for.is_some() && self.fail_for.as_deref() == context {
            return Err(TranslateError::QuotaExceeded {
                engine: "recording".to_string(),
                message: "character limit reached".to_string(),
            });
        }

        Ok(texts.iter().map(|t| format!("[{target_lang}] {t}")).collect())
    }
}

/// Lets tests keep a handle on the engine after handing it to the pipeline
#[async_trait]
impl TranslationEngine for std::sync::Arc<RecordingEngine> {
    fn name(&self) -> &str {
        "recording"
    }

    async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        context: Option<&str>,
    ) -> Result<Vec<String>> {
        self.as_ref()
            .translate(texts, source_lang, target_lang, context)
            .await
    }
}
