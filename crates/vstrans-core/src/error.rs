//! Error types and handling for supplement translation runs

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the translation pipeline
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The terminology server could not produce an expansion
    #[error("Failed to resolve ValueSet '{identifier}': {diagnostics}")]
    ResolutionFailed {
        identifier: String,
        /// HTTP status, absent when the request never got a response
        status: Option<u16>,
        diagnostics: String,
    },

    /// The expansion document lacks data the pipeline depends on
    #[error("Malformed expansion for '{identifier}': {message}")]
    MalformedExpansion { identifier: String, message: String },

    /// Translation provider rejected the credential
    #[error("Authentication with translation engine '{engine}' failed: {message}")]
    Authentication { engine: String, message: String },

    /// Translation provider character quota exhausted
    #[error("Translation quota exceeded for engine '{engine}': {message}")]
    QuotaExceeded { engine: String, message: String },

    /// Translation provider asked us to slow down
    #[error("Translation engine '{engine}' rate limited the request: {message}")]
    RateLimited { engine: String, message: String },

    /// Any other translation failure
    #[error("Translation engine '{engine}' failed: {message}")]
    EngineError { engine: String, message: String },

    /// No language package could be installed for the requested pair
    #[error("Failed to install language package {source_lang}->{target_lang}: {message}")]
    ModelInstall {
        source_lang: String,
        target_lang: String,
        message: String,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level HTTP failures (connect, TLS, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    MalformedExpansion,
    Engine,
    Config,
    Io,
    Http,
    Json,
    Internal,
}

impl TranslateError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::ResolutionFailed { .. } => ErrorKind::Resolution,
            TranslateError::MalformedExpansion { .. } => ErrorKind::MalformedExpansion,
            TranslateError::Authentication { .. }
            | TranslateError::QuotaExceeded { .. }
            | TranslateError::RateLimited { .. }
            | TranslateError::EngineError { .. }
            | TranslateError::ModelInstall { .. } => ErrorKind::Engine,
            TranslateError::ConfigError { .. } => ErrorKind::Config,
            TranslateError::IoError { .. } => ErrorKind::Io,
            TranslateError::Http(_) => ErrorKind::Http,
            TranslateError::Json(_) => ErrorKind::Json,
            TranslateError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Errors that can only ever concern the ValueSet being processed.
    ///
    /// These never stop a run, whatever the failure policy says.
    pub fn is_value_set_scoped(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Resolution | ErrorKind::MalformedExpansion
        )
    }

    pub fn malformed(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedExpansion {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn resolution(
        identifier: impl Into<String>,
        status: Option<u16>,
        diagnostics: impl Into<String>,
    ) -> Self {
        Self::ResolutionFailed {
            identifier: identifier.into(),
            status,
            diagnostics: diagnostics.into(),
        }
    }

    pub fn engine(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EngineError {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = TranslateError::malformed("vs", "no contains");
        assert_eq!(err.kind(), ErrorKind::MalformedExpansion);
        assert!(err.is_value_set_scoped());

        let err = TranslateError::QuotaExceeded {
            engine: "deepl".to_string(),
            message: "quota".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Engine);
        assert!(!err.is_value_set_scoped());

        let err = TranslateError::config_error("bad");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_resolution_failure_message_carries_diagnostics() {
        let err = TranslateError::ResolutionFailed {
            identifier: "http://example.org/ValueSet/missing".to_string(),
            status: Some(404),
            diagnostics: "HTTP 404: Unable to find value set".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Unable to find value set"));
        assert!(err.is_value_set_scoped());
    }

    #[test]
    fn test_io_error_display() {
        let err = TranslateError::io_error(
            "/tmp/out.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.json"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
