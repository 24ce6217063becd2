//! Run orchestration across all ValueSets of a list
//!
//! ValueSets are processed one after another. A supplement is written only
//! when characters were counted for it. Resolution and malformed-expansion
//! errors always skip the ValueSet; for engine and persistence errors the
//! configured [`FailurePolicy`] decides between skipping and aborting.

use crate::config::{FailurePolicy, RunConfig};
use crate::engine::{self, TranslationEngine};
use crate::input::ValueSetEntry;
use crate::models::SupplementDocument;
use crate::persister;
use crate::resolver::ValueSetResolver;
use crate::result::Result;
use crate::translator::SupplementTranslator;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Outcome for one ValueSet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetOutcome {
    pub identifier: String,
    pub name: String,
    /// 0 means nothing was translated and nothing was written
    pub characters: usize,
    pub persisted_to: Option<PathBuf>,
}

/// A ValueSet that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetFailure {
    pub identifier: String,
    pub message: String,
}

/// Aggregate statistics of a run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Characters submitted for translation (or counted, in dry-run mode)
    pub characters: usize,
    pub files_persisted: usize,
    /// ValueSets that went through the pipeline without error
    pub processed: usize,
    /// Processed ValueSets with nothing to translate
    pub skipped: usize,
    pub failures: Vec<ValueSetFailure>,
    pub duration: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &ValueSetOutcome) {
        self.processed += 1;
        self.characters += outcome.characters;
        if outcome.persisted_to.is_some() {
            self.files_persisted += 1;
        } else {
            self.skipped += 1;
        }
    }

    pub fn record_failure(&mut self, identifier: &str, message: impl Into<String>) {
        self.failures.push(ValueSetFailure {
            identifier: identifier.to_string(),
            message: message.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Translation Summary")?;
        writeln!(f, "  ValueSets processed: {}", self.processed)?;
        writeln!(f, "  Files written: {}", self.files_persisted)?;
        writeln!(f, "  Characters: {}", thousands(self.characters))?;
        if self.skipped > 0 {
            writeln!(f, "  Skipped (nothing to translate): {}", self.skipped)?;
        }
        if self.has_failures() {
            writeln!(f, "  Failed: {}", self.failures.len())?;
        }
        writeln!(f, "  Duration: {:.2}s", self.duration.as_secs_f64())
    }
}

/// Format with `,` as thousands separator
pub fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Drives the pipeline over a list of ValueSets
pub struct Orchestrator {
    translator: SupplementTranslator,
    target_folder: PathBuf,
    policy: FailurePolicy,
}

impl Orchestrator {
    pub fn new(
        translator: SupplementTranslator,
        target_folder: impl Into<PathBuf>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            translator,
            target_folder: target_folder.into(),
            policy,
        }
    }

    /// Validate the configuration, load the template once and build the pipeline
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let engine = engine::build_engine(config)?;
        Self::with_engine(config, engine)
    }

    /// Like [`Orchestrator::from_config`] with a caller-supplied engine
    pub fn with_engine(config: &RunConfig, engine: Box<dyn TranslationEngine>) -> Result<Self> {
        config.validate()?;

        let template = match &config.template {
            Some(path) => SupplementDocument::load_template(path)?,
            None => SupplementDocument::default_template()?,
        };
        let resolver = ValueSetResolver::from_config(config)?;
        let translator = SupplementTranslator::new(resolver, engine, template, config)?;

        Ok(Self::new(
            translator,
            config.target_folder.clone(),
            config.on_engine_error,
        ))
    }

    pub fn target_folder(&self) -> &Path {
        &self.target_folder
    }

    /// Translate one ValueSet and persist it when anything was counted
    pub async fn process(&self, entry: &ValueSetEntry) -> Result<ValueSetOutcome> {
        let mut translated = self
            .translator
            .translate(&entry.url, &entry.source_lang)
            .await?;

        let persisted_to = if translated.characters > 0 {
            info!(
                "ValueSet: {} contains characters: {}",
                entry.url, translated.characters
            );
            Some(persister::save(
                &mut translated.document,
                &translated.metadata,
                &self.target_folder,
            )?)
        } else {
            debug!("Nothing to translate in {}, not saving", entry.url);
            None
        };

        Ok(ValueSetOutcome {
            identifier: entry.url.clone(),
            name: translated.metadata.name,
            characters: translated.characters,
            persisted_to,
        })
    }

    /// Process every entry in order, accumulating run statistics
    pub async fn run(&self, entries: &[ValueSetEntry]) -> Result<RunStats> {
        let mut stats = RunStats::new();
        self.run_into(entries, &mut stats).await?;
        Ok(stats)
    }

    /// Like [`Orchestrator::run`], accumulating into `stats`
    ///
    /// When the run is aborted, `stats` still holds everything done before
    /// the failing ValueSet, and the totals are logged either way.
    pub async fn run_into(&self, entries: &[ValueSetEntry], stats: &mut RunStats) -> Result<()> {
        let start = Instant::now();
        info!(
            "Translating {} ValueSets with engine '{}'",
            entries.len(),
            self.translator.engine_name()
        );

        let result = self.process_all(entries, stats).await;

        stats.duration = start.elapsed();
        info!("Total: {} files", stats.files_persisted);
        info!("Total: {} characters translated", thousands(stats.characters));
        debug!("{}", stats);
        result
    }

    async fn process_all(&self, entries: &[ValueSetEntry], stats: &mut RunStats) -> Result<()> {
        for entry in entries {
            match self.process(entry).await {
                Ok(outcome) => stats.record(&outcome),
                Err(err) => {
                    stats.record_failure(&entry.url, err.to_string());
                    if err.is_value_set_scoped() || self.policy == FailurePolicy::Skip {
                        error!("Skipping ValueSet {}: {}", entry.url, err);
                        continue;
                    }
                    warn!(
                        "Aborting run after {} of {} ValueSets",
                        stats.processed,
                        entries.len()
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::test_helpers::{RecordingEngine, fixtures};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn value_set(&self, name: &str, count: usize) -> ValueSetEntry {
            let path = self.dir.path().join(format!("{name}.vs.json"));
            fs::write(&path, fixtures::expansion_json(name, count)).unwrap();
            ValueSetEntry::new(path.to_string_lossy(), "de")
        }

        fn output(&self) -> PathBuf {
            self.dir.path().join("code-systems")
        }

        fn config(&self, policy: FailurePolicy) -> RunConfig {
            RunConfig {
                target_folder: self.output(),
                batch_size: 3,
                on_engine_error: policy,
                ..Default::default()
            }
        }
    }

    fn orchestrator(config: &RunConfig, engine: Arc<RecordingEngine>) -> Orchestrator {
        Orchestrator::with_engine(config, Box::new(engine)).unwrap()
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_stats_display() {
        let mut stats = RunStats::new();
        stats.record(&ValueSetOutcome {
            identifier: "a".to_string(),
            name: "A".to_string(),
            characters: 12345,
            persisted_to: Some(PathBuf::from("code-systems/A.json")),
        });
        stats.record_failure("b", "boom");

        let display = stats.to_string();
        assert!(display.contains("Files written: 1"));
        assert!(display.contains("12,345"));
        assert!(display.contains("Failed: 1"));
    }

    #[tokio::test]
    async fn test_run_persists_and_counts() {
        let ws = Workspace::new();
        let engine = Arc::new(RecordingEngine::new());
        let mut config = ws.config(FailurePolicy::Skip);
        config.cloud.api_key = Some("unused".to_string());
        let orchestrator = orchestrator(&config, engine.clone());

        let entries = vec![ws.value_set("First", 7), ws.value_set("Second", 2)];
        let stats = orchestrator.run(&entries).await.unwrap();

        assert_eq!(stats.files_persisted, 2);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.characters, 9 * 9);

        let written: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(ws.output().join("First.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written["count"], 3);
        assert_eq!(written["supplements"], "http://example.org/CodeSystem/test|1.0.0");
        assert_eq!(written["concept"].as_array().unwrap().len(), 3);
        assert_eq!(written["concept"][2][0]["code"], "C7");
        assert_eq!(
            written["concept"][2][0]["designation"][1]["value"],
            "[en] Begriff 7"
        );
    }

    #[tokio::test]
    async fn test_empty_value_set_is_skipped_without_file() {
        let ws = Workspace::new();
        let mut config = ws.config(FailurePolicy::Abort);
        config.dry_run = true;
        let orchestrator = orchestrator(&config, Arc::new(RecordingEngine::new()));

        let entries = vec![ws.value_set("Empty", 0), ws.value_set("Full", 1)];
        let stats = orchestrator.run(&entries).await.unwrap();

        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.files_persisted, 1);
        assert!(!ws.output().join("Empty.json").exists());
        assert!(ws.output().join("Full.json").exists());
    }

    #[tokio::test]
    async fn test_unresolvable_value_set_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ValueSet/$expand"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "resourceType": "OperationOutcome",
                "issue": [{ "severity": "error", "diagnostics": "ValueSet not found" }]
            })))
            .mount(&server)
            .await;

        let ws = Workspace::new();
        let mut config = ws.config(FailurePolicy::Abort);
        config.dry_run = true;
        config.terminology_server = Some(server.uri());
        let orchestrator = orchestrator(&config, Arc::new(RecordingEngine::new()));

        let entry = ValueSetEntry::new(ws.dir.path().join("missing.json").to_string_lossy(), "de");
        let err = orchestrator.process(&entry).await.unwrap_err();
        assert!(matches!(err, TranslateError::ResolutionFailed { .. }));

        let stats = orchestrator.run(&[entry]).await.unwrap();
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.files_persisted, 0);
        assert!(stats.failures[0].message.contains("ValueSet not found"));
        assert!(!ws.output().exists());
    }

    #[tokio::test]
    async fn test_skip_policy_continues_after_engine_failure() {
        let ws = Workspace::new();
        let mut config = ws.config(FailurePolicy::Skip);
        config.cloud.api_key = Some("unused".to_string());
        let orchestrator = orchestrator(&config, Arc::new(RecordingEngine::failing_for("Bad")));

        let entries = vec![ws.value_set("Bad", 2), ws.value_set("Good", 2)];
        let stats = orchestrator.run(&entries).await.unwrap();

        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].identifier, entries[0].url);
        assert_eq!(stats.files_persisted, 1);
        assert!(ws.output().join("Good.json").exists());
        assert!(!ws.output().join("Bad.json").exists());
    }

    #[tokio::test]
    async fn test_abort_policy_stops_run() {
        let ws = Workspace::new();
        let mut config = ws.config(FailurePolicy::Abort);
        config.cloud.api_key = Some("unused".to_string());
        let engine = Arc::new(RecordingEngine::failing_for("Bad"));
        let orchestrator = orchestrator(&config, engine.clone());

        let entries = vec![ws.value_set("Bad", 2), ws.value_set("Good", 2)];
        let err = orchestrator.run(&entries).await.unwrap_err();

        assert!(matches!(err, TranslateError::QuotaExceeded { .. }));
        assert!(!ws.output().join("Good.json").exists());
        assert!(engine.calls().iter().all(|c| c.context.as_deref() == Some("Bad")));
    }

    #[tokio::test]
    async fn test_abort_keeps_partial_totals() {
        let ws = Workspace::new();
        let mut config = ws.config(FailurePolicy::Abort);
        config.cloud.api_key = Some("unused".to_string());
        let orchestrator = orchestrator(&config, Arc::new(RecordingEngine::failing_for("Bad")));

        let entries = vec![
            ws.value_set("Good", 2),
            ws.value_set("Bad", 2),
            ws.value_set("Later", 2),
        ];
        let mut stats = RunStats::new();
        let err = orchestrator.run_into(&entries, &mut stats).await.unwrap_err();

        assert!(matches!(err, TranslateError::QuotaExceeded { .. }));
        assert_eq!(stats.files_persisted, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.characters, 18);
        assert_eq!(stats.failures.len(), 1);
        assert!(ws.output().join("Good.json").exists());
        assert!(!ws.output().join("Later.json").exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RunConfig {
            batch_size: 0,
            dry_run: true,
            ..Default::default()
        };
        let result = Orchestrator::with_engine(&config, Box::new(RecordingEngine::new()));
        assert!(result.is_err());
    }
}
