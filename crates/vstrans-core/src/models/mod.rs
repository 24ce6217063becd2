//! FHIR resource models used by the translation pipeline

pub mod code_system;
pub mod value_set;

pub use code_system::*;
pub use value_set::*;
