//! CodeSystem metadata derived from a ValueSet expansion

use crate::error::TranslateError;
use crate::models::ValueSetExpansionDocument;
use crate::result::Result;
use percent_encoding::percent_decode_str;
use url::Url;

/// Identity of the supplement and of the CodeSystem it supplements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystemMetadata {
    /// Logical name; also the output file stem
    pub name: String,
    pub code_system_url: String,
    pub code_system_version: String,
}

impl CodeSystemMetadata {
    /// Derive the metadata from an expansion
    pub fn extract(value_set: &ValueSetExpansionDocument) -> Result<Self> {
        let identifier = value_set.identifier();
        let name = supplement_name(value_set)
            .ok_or_else(|| TranslateError::malformed(identifier, "ValueSet has neither name nor url"))?;
        if name.contains(['/', '\\']) {
            return Err(TranslateError::malformed(
                identifier,
                format!("ValueSet name '{name}' contains a path separator"),
            ));
        }

        let used = value_set.used_code_system().ok_or_else(|| {
            TranslateError::malformed(identifier, "expansion has no 'used-codesystem' parameter")
        })?;
        let (code_system_url, code_system_version) = split_canonical(used);

        Ok(Self {
            name,
            code_system_url: code_system_url.to_string(),
            code_system_version: code_system_version.to_string(),
        })
    }

    /// `{url}|{version}` as written to `CodeSystem.supplements`
    pub fn supplements(&self) -> String {
        format!("{}|{}", self.code_system_url, self.code_system_version)
    }
}

/// An empty `name` counts as absent
fn supplement_name(value_set: &ValueSetExpansionDocument) -> Option<String> {
    if let Some(name) = value_set.name.as_deref().filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    value_set.url.as_deref().map(name_from_url)
}

/// Path segment after `/ValueSet/`, percent-decoded, slashes removed
fn name_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => percent_decode_str(parsed.path())
            .decode_utf8_lossy()
            .into_owned(),
        Err(_) => url.to_string(),
    };
    let tail = path
        .split_once("/ValueSet/")
        .map(|(_, rest)| rest)
        .unwrap_or(path.as_str());
    tail.replace('/', "")
}

/// Split `url|version`; without a `|` both halves are the whole value
fn split_canonical(value: &str) -> (&str, &str) {
    match value.split_once('|') {
        Some((url, version)) => (url, version),
        None => (value, value),
    }
}
