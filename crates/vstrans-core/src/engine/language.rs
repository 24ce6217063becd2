//! Target language normalization for translation providers

use std::collections::BTreeMap;

/// Maps configured language codes to the codes a provider expects
///
/// The cloud provider distinguishes regional English variants and rejects a
/// bare `en` as target, hence the built-in `en -> en-us` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCodeTable {
    mappings: BTreeMap<String, String>,
}

impl Default for LanguageCodeTable {
    fn default() -> Self {
        let mut mappings = BTreeMap::new();
        mappings.insert("en".to_string(), "en-us".to_string());
        Self { mappings }
    }
}

impl LanguageCodeTable {
    /// Built-in table extended (or overridden) by `overrides`
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        for (from, to) in overrides {
            table.insert(from, to);
        }
        table
    }

    pub fn insert(&mut self, from: &str, to: &str) {
        self.mappings
            .insert(from.to_ascii_lowercase(), to.to_ascii_lowercase());
    }

    /// Normalized code; unmapped codes pass through lower-cased
    pub fn normalize(&self, code: &str) -> String {
        let key = code.to_ascii_lowercase();
        self.mappings.get(&key).cloned().unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_english_gets_region() {
        let table = LanguageCodeTable::default();
        assert_eq!(table.normalize("en"), "en-us");
        assert_eq!(table.normalize("EN"), "en-us");
        assert_eq!(table.normalize("de"), "de");
        assert_eq!(table.normalize("en-gb"), "en-gb");
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("pt".to_string(), "PT-BR".to_string());
        overrides.insert("en".to_string(), "en-gb".to_string());

        let table = LanguageCodeTable::with_overrides(&overrides);
        assert_eq!(table.normalize("pt"), "pt-br");
        assert_eq!(table.normalize("en"), "en-gb");
    }
}
