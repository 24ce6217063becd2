//! Translation of a single ValueSet into a supplement document

use crate::assembler::{LanguageTexts, assemble_group};
use crate::batcher::Batcher;
use crate::config::RunConfig;
use crate::engine::TranslationEngine;
use crate::error::TranslateError;
use crate::metadata::CodeSystemMetadata;
use crate::models::{Concept, SupplementDocument, ValueSetExpansionDocument};
use crate::resolver::ValueSetResolver;
use crate::result::Result;
use tracing::debug;

/// Result of translating one ValueSet, not yet persisted
#[derive(Debug, Clone)]
pub struct TranslatedSupplement {
    pub metadata: CodeSystemMetadata,
    pub document: SupplementDocument,
    /// Characters of source display text considered for translation
    pub characters: usize,
}

/// Drives resolver, batcher, engine and assembler for one ValueSet at a time
pub struct SupplementTranslator {
    resolver: ValueSetResolver,
    engine: Box<dyn TranslationEngine>,
    template: SupplementDocument,
    batcher: Batcher,
    target_langs: Vec<String>,
    dry_run: bool,
}

impl SupplementTranslator {
    pub fn new(
        resolver: ValueSetResolver,
        engine: Box<dyn TranslationEngine>,
        template: SupplementDocument,
        config: &RunConfig,
    ) -> Result<Self> {
        Ok(Self {
            resolver,
            engine,
            template,
            batcher: Batcher::new(config.batch_size)?,
            target_langs: config.target_langs.clone(),
            dry_run: config.dry_run,
        })
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Resolve, batch and translate one ValueSet
    pub async fn translate(&self, identifier: &str, source_lang: &str) -> Result<TranslatedSupplement> {
        let value_set = self.resolver.resolve(identifier).await?;
        self.translate_document(identifier, &value_set, source_lang)
            .await
    }

    /// Translate an already resolved expansion
    pub async fn translate_document(
        &self,
        identifier: &str,
        value_set: &ValueSetExpansionDocument,
        source_lang: &str,
    ) -> Result<TranslatedSupplement> {
        let metadata = CodeSystemMetadata::extract(value_set)?;
        let concepts = concepts(identifier, value_set)?;
        let mut document = self.template.clone();
        let mut characters = 0;

        debug!(
            "Translating {} concepts of {} in {} batches",
            concepts.len(),
            metadata.name,
            self.batcher.batch_count(concepts.len())
        );

        for batch in self.batcher.partition(&concepts) {
            let texts: Vec<String> = batch.iter().map(|c| c.display.clone()).collect();
            characters += texts.iter().map(|t| t.chars().count()).sum::<usize>();

            let mut per_language = Vec::with_capacity(self.target_langs.len());
            for target_lang in &self.target_langs {
                let translated = if self.dry_run || target_lang == source_lang {
                    texts.clone()
                } else {
                    self.engine
                        .translate(&texts, source_lang, target_lang, Some(&metadata.name))
                        .await?
                };
                per_language.push(LanguageTexts::new(target_lang.clone(), translated));
            }

            let group = assemble_group(batch, &per_language)?;
            document.push_group(group)?;
        }

        Ok(TranslatedSupplement {
            metadata,
            document,
            characters,
        })
    }
}

/// Concepts of the expansion; empty or incomplete lists are malformed
fn concepts(identifier: &str, value_set: &ValueSetExpansionDocument) -> Result<Vec<Concept>> {
    let contains = value_set.contains();
    if contains.is_empty() {
        return Err(TranslateError::malformed(
            identifier,
            "expansion.contains is missing or empty",
        ));
    }

    contains
        .iter()
        .enumerate()
        .map(|(index, item)| match (&item.code, &item.display) {
            (Some(code), Some(display)) => Ok(Concept {
                code: code.clone(),
                display: display.clone(),
            }),
            _ => Err(TranslateError::malformed(
                identifier,
                format!("concept #{index} lacks code or display"),
            )),
        })
        .collect()
}
