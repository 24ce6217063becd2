//! vstrans core
//!
//! Translation pipeline that turns FHIR ValueSet expansions into CodeSystem
//! supplements carrying translated designations.
//!
//! Resolver → metadata extraction → batching → translation engine →
//! assembly → persistence, driven per ValueSet by the [`Orchestrator`].

pub mod assembler;
pub mod batcher;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod input;
pub mod metadata;
pub mod models;
pub mod orchestrator;
pub mod persister;
pub mod resolver;
pub mod result;
pub mod translator;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use assembler::{LanguageTexts, assemble_group};
pub use batcher::Batcher;
pub use config::{ConfigLoader, EngineKind, FailurePolicy, RunConfig};
pub use engine::{CloudEngine, LanguageCodeTable, OfflineEngine, TranslationEngine, build_engine};
pub use error::{ErrorKind, TranslateError};
pub use input::{ValueSetEntry, discover_value_set_files, load_value_set_list, write_value_set_list};
pub use metadata::CodeSystemMetadata;
pub use models::{
    Concept, Designation, SupplementConcept, SupplementDocument, ValueSetExpansionDocument,
};
pub use orchestrator::{Orchestrator, RunStats, ValueSetFailure, ValueSetOutcome, thousands};
pub use resolver::ValueSetResolver;
pub use result::Result;
pub use translator::{SupplementTranslator, TranslatedSupplement};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vstrans=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
