//! Configuration system for vstrans
//!
//! A run is described by a single [`RunConfig`]. It can be read from a
//! configuration file and is then overridden by command-line flags.
//!
//! ## Configuration Files
//!
//! - `.vstransrc.json` - JSON dotfile config
//! - `.vstransrc.toml` - TOML dotfile config
//! - `vstrans.json` - plain JSON config
//!
//! When no explicit path is given, the loader searches the working directory
//! and its parents.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "terminologyServer": "https://ontoserver.example.org/fhir/",
//!   "clientCertificate": "certs/client.pem",
//!   "privateKey": "certs/client.key",
//!   "targetFolder": "code-systems",
//!   "batchSize": 5,
//!   "targetLangs": ["de", "en"],
//!   "engine": "cloud",
//!   "onEngineError": "skip",
//!   "cloud": {
//!     "languageOverrides": { "pt": "pt-br" }
//!   }
//! }
//! ```

mod loader;
mod run_config;

pub use loader::ConfigLoader;
pub use run_config::{
    CloudEngineConfig, DEFAULT_BATCH_SIZE, DEFAULT_TARGET_FOLDER, EngineKind, FailurePolicy,
    OfflineEngineConfig, RunConfig,
};
