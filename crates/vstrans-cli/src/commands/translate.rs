//! Translate Command - ValueSet expansions to CodeSystem supplements
//!
//! Loads the run configuration (config file, then command-line overrides),
//! builds the pipeline once and drives it over the value-set list.
//!
//! # Example Usage
//!
//! ```sh
//! # Count characters without calling a translation engine
//! vstrans translate --value-sets valueSets.json --dry-run
//!
//! # Translate into English and French through DeepL
//! vstrans translate --value-sets valueSets.json --target-langs de,en,fr
//!
//! # Remote expansions over mutual TLS
//! vstrans translate --value-sets valueSets.json \
//!     --terminology-server https://ontoserver.example.org/fhir \
//!     --server-certificate cert.pem --private-key key.pem
//! ```

use crate::TranslateArgs;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info};
use vstrans_core::{
    ConfigLoader, Orchestrator, Result, RunConfig, RunStats, load_value_set_list, thousands,
};

/// Execute the translate command
pub async fn translate_command(args: TranslateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = ConfigLoader::load(config_path.as_deref(), None)?;
    apply_overrides(&mut config, &args);
    debug!("Effective configuration: {:?}", redacted(&config));

    let entries = load_value_set_list(&args.value_sets)?;
    info!(
        "Loaded {} ValueSets from {}",
        entries.len(),
        args.value_sets.display()
    );

    let orchestrator = Orchestrator::from_config(&config)?;
    let mut stats = RunStats::new();
    let result = orchestrator.run_into(&entries, &mut stats).await;

    print_summary(&stats, &config);
    result
}

/// Command-line values win over the configuration file
fn apply_overrides(config: &mut RunConfig, args: &TranslateArgs) {
    if let Some(server) = &args.terminology_server {
        config.terminology_server = Some(server.clone());
    }
    if let Some(cert) = &args.server_certificate {
        config.client_certificate = Some(cert.clone());
    }
    if let Some(key) = &args.private_key {
        config.private_key = Some(key.clone());
    }
    if let Some(api_key) = &args.deepl_api_key {
        config.cloud.api_key = Some(api_key.clone());
    }
    if let Some(folder) = &args.target_folder {
        config.target_folder = folder.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if let Some(langs) = &args.target_langs {
        config.target_langs = langs.iter().map(|l| l.trim().to_string()).collect();
    }
    if let Some(engine) = args.engine {
        config.engine = engine;
    }
    if let Some(policy) = args.on_engine_error {
        config.on_engine_error = policy;
    }
    if let Some(template) = &args.template {
        config.template = Some(template.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }
}

fn redacted(config: &RunConfig) -> RunConfig {
    let mut copy = config.clone();
    if copy.cloud.api_key.is_some() {
        copy.cloud.api_key = Some("***".to_string());
    }
    copy
}

fn print_summary(stats: &RunStats, config: &RunConfig) {
    println!("\n{}", "Translation Summary".bright_cyan().bold());
    if config.dry_run {
        println!("  {}", "Dry run: nothing was sent to a translation engine".yellow());
    }
    println!("  ValueSets processed: {}", stats.processed);
    println!(
        "  Files written: {} (in {})",
        stats.files_persisted.to_string().green(),
        config.target_folder.display()
    );
    println!("  Characters: {}", thousands(stats.characters).bold());
    if stats.skipped > 0 {
        println!("  Skipped (nothing to translate): {}", stats.skipped);
    }
    if stats.has_failures() {
        println!("  {} {}", "Failed:".red(), stats.failures.len());
        for failure in &stats.failures {
            println!("    {} {}", failure.identifier, failure.message.dimmed());
        }
    }
    println!("  Duration: {:.2}s", stats.duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use vstrans_core::{EngineKind, FailurePolicy};

    fn args() -> TranslateArgs {
        TranslateArgs {
            value_sets: PathBuf::from("valueSets.json"),
            terminology_server: None,
            server_certificate: None,
            private_key: None,
            deepl_api_key: None,
            target_folder: None,
            batch_size: None,
            dry_run: false,
            target_langs: None,
            engine: None,
            on_engine_error: None,
            template: None,
            timeout: None,
        }
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = RunConfig {
            batch_size: 10,
            dry_run: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &args());

        assert_eq!(config.batch_size, 10);
        assert!(config.dry_run);
        assert_eq!(config.target_langs, vec!["de", "en"]);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = RunConfig::default();
        let mut args = args();
        args.batch_size = Some(5);
        args.target_langs = Some(vec!["en".to_string(), " fr ".to_string()]);
        args.engine = Some(EngineKind::Offline);
        args.on_engine_error = Some(FailurePolicy::Abort);
        args.deepl_api_key = Some("secret".to_string());
        apply_overrides(&mut config, &args);

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.target_langs, vec!["en", "fr"]);
        assert_eq!(config.engine, EngineKind::Offline);
        assert_eq!(config.on_engine_error, FailurePolicy::Abort);
        assert_eq!(config.cloud.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = RunConfig::default();
        config.cloud.api_key = Some("secret".to_string());
        assert!(!format!("{:?}", redacted(&config)).contains("secret"));
    }
}
