//! Assembly of supplement concept groups

use crate::error::TranslateError;
use crate::models::{ConceptGroup, Concept, Designation, SupplementConcept};
use crate::result::Result;

/// Texts to use for one target language of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTexts {
    pub language: String,
    pub texts: Vec<String>,
}

impl LanguageTexts {
    pub fn new(language: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            language: language.into(),
            texts,
        }
    }
}

/// Build the group entry for one batch
///
/// `per_language` must be in configured target-language order; every concept
/// gets exactly one designation per entry, in that order.
pub fn assemble_group(batch: &[Concept], per_language: &[LanguageTexts]) -> Result<ConceptGroup> {
    if let Some(mismatch) = per_language.iter().find(|l| l.texts.len() != batch.len()) {
        return Err(TranslateError::internal_error(format!(
            "{} texts for language '{}' but the batch has {} concepts",
            mismatch.texts.len(),
            mismatch.language,
            batch.len()
        )));
    }

    let group = batch
        .iter()
        .enumerate()
        .map(|(index, concept)| SupplementConcept {
            code: concept.code.clone(),
            designation: per_language
                .iter()
                .map(|lang| Designation {
                    value: lang.texts[index].clone(),
                    language: lang.language.clone(),
                })
                .collect(),
        })
        .collect();

    Ok(group)
}
