//! Result type alias for translation pipeline operations

use crate::error::TranslateError;

/// Standard Result type for translation pipeline operations
pub type Result<T> = std::result::Result<T, TranslateError>;
