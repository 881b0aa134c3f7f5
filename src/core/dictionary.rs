//! Entity dictionary: the set of strings being searched for.
//!
//! Entities live in a dense, immutable store indexed by position; a
//! secondary map resolves user-supplied ids. Token sequences are produced
//! by the caller's tokenizer and are authoritative — duplicate tokens
//! inside one entity deliberately produce duplicate posting-list entries.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{MuninnError, Result};
use crate::core::tokenize::Tokenizer;

/// A single dictionary entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// User-supplied identifier (TSV id or dense position)
    pub id: String,

    /// Original text as given to the dictionary
    pub text: String,

    /// Token sequence produced by the tokenizer at insertion time
    pub tokens: Vec<String>,
}

impl Entity {
    /// Number of tokens. All length bounds are expressed in this unit.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when tokenization produced nothing (e.g. text shorter than q).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Dense, immutable entity store with id lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityDictionary {
    entities: Vec<Entity>,
    #[serde(skip)]
    id_to_index: AHashMap<String, usize>,
}

impl EntityDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity. With no explicit id, the dense position is used.
    pub fn add(&mut self, text: impl Into<String>, id: Option<String>, tokenizer: &Tokenizer) {
        let text = text.into();
        let index = self.entities.len();
        let id = id.unwrap_or_else(|| index.to_string());
        let tokens = tokenizer.tokenize(&text);
        self.id_to_index.insert(id.clone(), index);
        self.entities.push(Entity { id, text, tokens });
    }

    /// Build a dictionary from an iterator of entity strings.
    pub fn from_strings<I, S>(strings: I, tokenizer: &Tokenizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for s in strings {
            dict.add(s.as_ref(), None, tokenizer);
        }
        dict
    }

    /// Load a dictionary from a TSV file: one `id<TAB>text` record per
    /// non-empty line. Lines with a single field use their 1-based line
    /// number as id.
    pub fn from_tsv_path(path: impl AsRef<Path>, tokenizer: &Tokenizer) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MuninnError::io(
                format!("failed to open dictionary file {}", path.display()),
                e,
            )
        })?;

        let mut dict = Self::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                MuninnError::io(format!("failed to read {}", path.display()), e)
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once('\t') {
                Some((id, text)) => dict.add(text, Some(id.to_string()), tokenizer),
                None => dict.add(line, Some((line_no + 1).to_string()), tokenizer),
            }
        }
        Ok(dict)
    }

    /// Persist the dictionary as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            MuninnError::io(format!("failed to create {}", path.display()), e)
        })?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a dictionary previously written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MuninnError::io(format!("failed to open {}", path.display()), e)
        })?;
        let mut dict: Self = serde_json::from_reader(BufReader::new(file))?;
        dict.id_to_index = dict
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Ok(dict)
    }

    /// Entity at a dense index.
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Entity with a given user id.
    pub fn get_by_id(&self, id: &str) -> Option<&Entity> {
        self.id_to_index.get(id).map(|&i| &self.entities[i])
    }

    /// Number of entities, including any that tokenized to nothing.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the dictionary holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entities with their dense indices, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.entities.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TokenizerConfig;

    use std::io::Write;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(&TokenizerConfig::default())
    }

    #[test]
    fn test_from_strings_assigns_dense_ids() {
        let dict = EntityDictionary::from_strings(["alpha", "beta"], &tokenizer());
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(0).unwrap().id, "0");
        assert_eq!(dict.get(1).unwrap().id, "1");
        assert_eq!(dict.get_by_id("1").unwrap().text, "beta");
    }

    #[test]
    fn test_entity_token_count() {
        let dict = EntityDictionary::from_strings(["dolor"], &tokenizer());
        // bigrams of "dolor": do ol lo or
        assert_eq!(dict.get(0).unwrap().len(), 4);
    }

    #[test]
    fn test_from_tsv_parses_ids_and_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "e1\tchaudhuri").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "venkatesh").unwrap();
        file.flush().unwrap();

        let dict = EntityDictionary::from_tsv_path(file.path(), &tokenizer()).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(0).unwrap().id, "e1");
        assert_eq!(dict.get(0).unwrap().text, "chaudhuri");
        // single-field line keeps its 1-based line number as id
        assert_eq!(dict.get(1).unwrap().id, "3");
        assert_eq!(dict.get_by_id("3").unwrap().text, "venkatesh");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.json");

        let dict = EntityDictionary::from_strings(["kaushik ch", "chakrabarti"], &tokenizer());
        dict.save(&path).unwrap();

        let loaded = EntityDictionary::load(&path).unwrap();
        assert_eq!(loaded.len(), dict.len());
        assert_eq!(loaded.get(1).unwrap().tokens, dict.get(1).unwrap().tokens);
        assert_eq!(loaded.get_by_id("0").unwrap().text, "kaushik ch");
    }

    #[test]
    fn test_too_short_entity_is_kept_but_empty() {
        let dict = EntityDictionary::from_strings(["a"], &tokenizer());
        assert_eq!(dict.len(), 1);
        assert!(dict.get(0).unwrap().is_empty());
    }
}
