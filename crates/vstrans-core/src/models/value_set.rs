//! ValueSet expansion model

use serde::{Deserialize, Serialize};

/// Name of the expansion parameter that carries the base CodeSystem
pub const USED_CODESYSTEM_PARAMETER: &str = "used-codesystem";

/// FHIR ValueSet as returned by `$expand`
///
/// Only the elements the translation pipeline reads are modelled; everything
/// else in the document is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetExpansionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ValueSetExpansion>,
}

/// ValueSet.expansion
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetExpansion {
    #[serde(default)]
    pub parameter: Vec<ExpansionParameter>,
    #[serde(default)]
    pub contains: Vec<ExpansionConcept>,
}

/// ValueSet.expansion.parameter
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
}

impl ExpansionParameter {
    /// The URI value, falling back to a string value
    pub fn uri(&self) -> Option<&str> {
        self.value_uri.as_deref().or(self.value_string.as_deref())
    }
}

/// ValueSet.expansion.contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpansionConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A concept the pipeline can translate: both code and display are present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub code: String,
    pub display: String,
}

impl ValueSetExpansionDocument {
    /// Human-readable identifier used in logs and errors
    pub fn identifier(&self) -> &str {
        self.url
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<unnamed ValueSet>")
    }

    pub fn parameters(&self) -> &[ExpansionParameter] {
        self.expansion
            .as_ref()
            .map(|e| e.parameter.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self) -> &[ExpansionConcept] {
        self.expansion
            .as_ref()
            .map(|e| e.contains.as_slice())
            .unwrap_or_default()
    }

    /// The `used-codesystem` parameter value, if any
    pub fn used_code_system(&self) -> Option<&str> {
        self.parameters()
            .iter()
            .find(|p| p.name == USED_CODESYSTEM_PARAMETER)
            .and_then(ExpansionParameter::uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_expansion() {
        let json = r#"{
            "resourceType": "ValueSet",
            "url": "http://example.org/ValueSet/example",
            "status": "active",
            "expansion": {
                "timestamp": "2024-01-01T00:00:00Z",
                "parameter": [
                    { "name": "version", "valueUri": "http://example.org/CodeSystem/example|1.0" },
                    { "name": "used-codesystem", "valueUri": "http://example.org/CodeSystem/example|2.1" }
                ],
                "contains": [
                    { "system": "http://example.org/CodeSystem/example", "code": "a", "display": "Blutdruck" }
                ]
            }
        }"#;

        let vs: ValueSetExpansionDocument = serde_json::from_str(json).unwrap();
        assert_eq!(vs.identifier(), "http://example.org/ValueSet/example");
        assert_eq!(
            vs.used_code_system(),
            Some("http://example.org/CodeSystem/example|2.1")
        );
        assert_eq!(vs.contains().len(), 1);
        assert_eq!(vs.contains()[0].display.as_deref(), Some("Blutdruck"));
    }

    #[test]
    fn test_missing_expansion_is_empty() {
        let vs: ValueSetExpansionDocument =
            serde_json::from_str(r#"{"name": "NoExpansion"}"#).unwrap();
        assert!(vs.contains().is_empty());
        assert!(vs.used_code_system().is_none());
        assert_eq!(vs.identifier(), "NoExpansion");
    }

    #[test]
    fn test_used_code_system_value_string_fallback() {
        let param = ExpansionParameter {
            name: USED_CODESYSTEM_PARAMETER.to_string(),
            value_uri: None,
            value_string: Some("http://loinc.org|2.77".to_string()),
        };
        assert_eq!(param.uri(), Some("http://loinc.org|2.77"));
    }
}
