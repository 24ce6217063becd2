//! CodeSystem supplement model

use crate::error::TranslateError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Template shipped with the crate, used when no template file is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/CodeSystemTemplate.json");

/// A language-tagged display for a concept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Designation {
    pub value: String,
    pub language: String,
}

/// One concept of a supplement group
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SupplementConcept {
    pub code: String,
    pub designation: Vec<Designation>,
}

/// Concepts translated together in one batch; appended as a single item
pub type ConceptGroup = Vec<SupplementConcept>;

/// CodeSystem supplement document built from a JSON template
///
/// The template's keys (and their order) are kept as they are; the pipeline
/// only appends concept groups and overwrites the identifying fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplementDocument {
    fields: Map<String, Value>,
}

impl SupplementDocument {
    /// Parse a template from JSON text
    pub fn from_template_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Load a template from a file
    pub fn load_template(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| TranslateError::io_error(path, e))?;
        Self::from_template_str(&content)
    }

    /// The built-in template
    pub fn default_template() -> Result<Self> {
        Self::from_template_str(DEFAULT_TEMPLATE)
    }

    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(TranslateError::config_error(
                "CodeSystem template must be a JSON object",
            ));
        };

        match fields.get("concept") {
            None => {
                fields.insert("concept".to_string(), Value::Array(Vec::new()));
            }
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(TranslateError::config_error(
                    "CodeSystem template field 'concept' must be an array",
                ));
            }
        }

        Ok(Self { fields })
    }

    /// Append one batch of concepts as a single nested list
    pub fn push_group(&mut self, group: ConceptGroup) -> Result<()> {
        let value = serde_json::to_value(group)?;
        match self.fields.get_mut("concept") {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.fields
                    .insert("concept".to_string(), Value::Array(vec![value]));
            }
        }
        Ok(())
    }

    /// Number of groups appended to `concept`
    pub fn group_count(&self) -> usize {
        match self.fields.get("concept") {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Read the appended groups back as typed values
    pub fn groups(&self) -> Result<Vec<ConceptGroup>> {
        match self.fields.get("concept") {
            Some(concepts) => Ok(serde_json::from_value(concepts.clone())?),
            None => Ok(Vec::new()),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Compact JSON, non-ASCII characters kept literally
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}
