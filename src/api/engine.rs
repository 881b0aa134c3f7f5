//! High-level extraction engine.
//!
//! Ties the tokenizer, the entity dictionary, the Faerie filter, and the
//! verifier together behind one configuration. The engine is immutable
//! after construction; a single instance can serve many documents, and
//! [`MuninnEngine::extract_all`] fans a batch out across threads since all
//! per-document state lives inside each scan.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::config::{ExtractionConfig, TokenMode};
use crate::core::dictionary::EntityDictionary;
use crate::core::errors::{MuninnError, Result};
use crate::core::tokenize::{token_char_spans, Tokenizer};
use crate::filter::bounds::Similarity;
use crate::filter::engine::FaerieFilter;
use crate::verify;

use super::results::{EntityMatch, ExtractionReport};

/// Approximate dictionary entity extraction engine.
#[derive(Debug)]
pub struct MuninnEngine {
    config: ExtractionConfig,
    tokenizer: Tokenizer,
    filter: FaerieFilter,
    /// Reconstructed display text per entity index, cached at build time
    entity_text: Vec<String>,
}

impl MuninnEngine {
    /// Build an engine from a validated configuration and a dictionary
    /// whose entities were tokenized with the same tokenizer settings.
    pub fn new(config: ExtractionConfig, dictionary: EntityDictionary) -> Result<Self> {
        config.validate()?;
        let similarity = Similarity::from_config(&config)?;
        let tokenizer = Tokenizer::new(&config.tokenizer);

        info!(
            entities = dictionary.len(),
            similarity = %config.similarity,
            threshold = config.threshold,
            pruner = %config.pruner,
            "building extraction engine"
        );

        let filter = FaerieFilter::new(dictionary, similarity, config.pruner);
        let entity_text = filter
            .dictionary()
            .iter()
            .map(|(_, e)| tokenizer.reconstruct(&e.tokens))
            .collect();

        Ok(Self {
            config,
            tokenizer,
            filter,
            entity_text,
        })
    }

    /// Build an engine from a list of entity strings.
    pub fn from_strings<I, S>(config: ExtractionConfig, entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;
        let tokenizer = Tokenizer::new(&config.tokenizer);
        let dictionary = EntityDictionary::from_strings(entities, &tokenizer);
        Self::new(config, dictionary)
    }

    /// Build an engine from a TSV dictionary file.
    pub fn from_tsv_path(config: ExtractionConfig, path: impl AsRef<Path>) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(&config.tokenizer);
        let dictionary = EntityDictionary::from_tsv_path(path, &tokenizer)?;
        Self::new(config, dictionary)
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The entity dictionary behind the filter.
    pub fn dictionary(&self) -> &EntityDictionary {
        self.filter.dictionary()
    }

    /// Extract all matches from one document.
    pub fn extract(&self, document: &str) -> Result<ExtractionReport> {
        let doc_tokens = self.tokenizer.tokenize(document);
        let doc_text = self.tokenizer.reconstruct(&doc_tokens);
        let doc_chars: Vec<char> = doc_text.chars().collect();

        let mut matches = Vec::new();
        if doc_tokens.is_empty() {
            debug!("document tokenized to nothing; no matches");
            return Ok(ExtractionReport {
                document: doc_text,
                matches,
            });
        }

        let word_spans = match self.config.tokenizer.mode {
            TokenMode::Word => token_char_spans(&doc_tokens),
            TokenMode::Char => Vec::new(),
        };

        for found in self.filter.scan(&doc_tokens) {
            // map the token span back to character offsets in the
            // reconstructed document
            let (start, end) = match self.config.tokenizer.mode {
                TokenMode::Char => (found.start, found.end + self.tokenizer.q()),
                TokenMode::Word => (word_spans[found.start].0, word_spans[found.end].1),
            };
            let text: String = doc_chars[start..end].iter().collect();

            let entity = self.filter.dictionary().get(found.entity).ok_or_else(|| {
                MuninnError::internal(format!("match for unknown entity index {}", found.entity))
            })?;
            let entity_text = &self.entity_text[found.entity];

            let (score, valid) = if self.config.verify {
                let verdict = match self.config.tokenizer.mode {
                    TokenMode::Char => verify::check_strings(
                        &text,
                        entity_text,
                        self.config.similarity,
                        self.config.threshold,
                    )?,
                    TokenMode::Word => verify::check_tokens(
                        &doc_tokens[found.start..=found.end],
                        &entity.tokens,
                        self.config.similarity,
                        self.config.threshold,
                    )?,
                };
                (Some(verdict.score), Some(verdict.valid))
            } else {
                (None, None)
            };

            if self.config.verify && self.config.valid_only && valid != Some(true) {
                continue;
            }

            matches.push(EntityMatch {
                entity: (entity_text.clone(), entity.id.clone()),
                span: (start, end),
                text,
                score,
                valid,
            });
        }

        debug!(matches = matches.len(), "document extraction complete");
        Ok(ExtractionReport {
            document: doc_text,
            matches,
        })
    }

    /// Extract from a batch of documents in parallel. The filter state is
    /// read-only; each document gets its own scan.
    pub fn extract_all<S>(&self, documents: &[S]) -> Result<Vec<ExtractionReport>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|doc| self.extract(doc.as_ref()))
            .collect()
    }
}
