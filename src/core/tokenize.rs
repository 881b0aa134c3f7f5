//! Tokenization for dictionary entities and documents.
//!
//! Char mode slides a q-gram window over the code points of the input
//! (after optional lowercasing and space substitution); word mode splits on
//! whitespace. The same tokenizer instance must be applied to the entity
//! dictionary and to every document, since the inverted index matches
//! tokens literally.

use crate::core::config::{TokenMode, TokenizerConfig};

/// Reusable tokenizer configured once per engine.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    mode: TokenMode,
    q: usize,
    special_char: Option<char>,
    unique: bool,
    lower: bool,
}

impl Tokenizer {
    /// Create a tokenizer from its configuration.
    pub fn new(config: &TokenizerConfig) -> Self {
        Self {
            mode: config.mode,
            q: config.q,
            special_char: config.special_char,
            unique: config.unique,
            lower: config.lower,
        }
    }

    /// Tokenization granularity.
    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    /// q-gram width (meaningful in char mode).
    pub fn q(&self) -> usize {
        self.q
    }

    /// Tokenize a string into q-grams or words.
    ///
    /// Inputs shorter than q yield no tokens in char mode.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut tokens = match self.mode {
            TokenMode::Char => {
                let chars: Vec<char> = match self.special_char {
                    Some(sub) => text
                        .chars()
                        .map(|c| if c == ' ' { sub } else { c })
                        .collect(),
                    None => text.chars().collect(),
                };
                if self.q == 0 || chars.len() < self.q {
                    Vec::new()
                } else {
                    chars
                        .windows(self.q)
                        .map(|w| w.iter().collect())
                        .collect()
                }
            }
            TokenMode::Word => text.split_whitespace().map(str::to_string).collect(),
        };

        if self.unique {
            let mut seen = ahash::AHashSet::with_capacity(tokens.len());
            tokens.retain(|t| seen.insert(t.clone()));
        }

        tokens
    }

    /// Rebuild the display form of a token sequence: q-grams are merged
    /// back into the underlying string (with the space substitution
    /// undone), words are joined with single spaces.
    pub fn reconstruct(&self, tokens: &[String]) -> String {
        match self.mode {
            TokenMode::Char => {
                let merged = qgrams_to_string(tokens);
                match self.special_char {
                    Some(sub) => merged.replace(sub, " "),
                    None => merged,
                }
            }
            TokenMode::Word => tokens.join(" "),
        }
    }
}

/// Merge consecutive overlapping q-grams back into the string they were
/// extracted from: the first gram verbatim, then the last character of each
/// following gram.
pub fn qgrams_to_string(grams: &[String]) -> String {
    let mut out = String::new();
    let mut iter = grams.iter();
    if let Some(first) = iter.next() {
        out.push_str(first);
        for gram in iter {
            if let Some(c) = gram.chars().last() {
                out.push(c);
            }
        }
    }
    out
}

/// Character spans `(start, end)` (end exclusive) of each token inside the
/// single-space join of the token sequence. Offsets count code points.
pub fn token_char_spans(tokens: &[String]) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(tokens.len());
    let mut cursor = 0;
    for token in tokens {
        let len = token.chars().count();
        spans.push((cursor, cursor + len));
        cursor += len + 1; // the joining space
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TokenizerConfig;

    fn char_tokenizer(q: usize) -> Tokenizer {
        Tokenizer::new(&TokenizerConfig {
            q,
            ..TokenizerConfig::default()
        })
    }

    fn word_tokenizer() -> Tokenizer {
        Tokenizer::new(&TokenizerConfig {
            mode: TokenMode::Word,
            ..TokenizerConfig::default()
        })
    }

    #[test]
    fn test_bigram_extraction_substitutes_spaces() {
        let tokenizer = char_tokenizer(2);
        let tokens = tokenizer.tokenize("ab cd");
        assert_eq!(tokens, vec!["ab", "b_", "_c", "cd"]);
    }

    #[test]
    fn test_char_mode_lowercases() {
        let tokenizer = char_tokenizer(2);
        assert_eq!(tokenizer.tokenize("AbC"), vec!["ab", "bc"]);
    }

    #[test]
    fn test_short_input_yields_no_tokens() {
        let tokenizer = char_tokenizer(3);
        assert!(tokenizer.tokenize("ab").is_empty());
        assert!(tokenizer.tokenize("").is_empty());
    }

    #[test]
    fn test_input_of_exactly_q_chars_is_one_gram() {
        let tokenizer = char_tokenizer(3);
        assert_eq!(tokenizer.tokenize("abc"), vec!["abc"]);
    }

    #[test]
    fn test_word_mode_splits_on_whitespace() {
        let tokenizer = word_tokenizer();
        assert_eq!(
            tokenizer.tokenize("Foo  bar\tbaz"),
            vec!["foo", "bar", "baz"]
        );
    }

    #[test]
    fn test_unique_preserves_first_seen_order() {
        let tokenizer = Tokenizer::new(&TokenizerConfig {
            mode: TokenMode::Word,
            unique: true,
            ..TokenizerConfig::default()
        });
        assert_eq!(
            tokenizer.tokenize("a b a c b"),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_qgram_round_trip() {
        let tokenizer = char_tokenizer(2);
        for input in ["dolor", "ab cd ef", "x y", "approximate membership"] {
            let tokens = tokenizer.tokenize(input);
            assert_eq!(tokenizer.reconstruct(&tokens), input.to_lowercase());
        }
    }

    #[test]
    fn test_qgram_round_trip_single_gram() {
        assert_eq!(qgrams_to_string(&["abc".to_string()]), "abc");
    }

    #[test]
    fn test_reconstruct_word_mode() {
        let tokenizer = word_tokenizer();
        let tokens = tokenizer.tokenize("lorem ipsum dolor");
        assert_eq!(tokenizer.reconstruct(&tokens), "lorem ipsum dolor");
    }

    #[test]
    fn test_token_char_spans() {
        let tokens = vec!["ab".to_string(), "c".to_string(), "def".to_string()];
        // "ab c def"
        assert_eq!(token_char_spans(&tokens), vec![(0, 2), (3, 4), (5, 8)]);
    }

    #[test]
    fn test_unicode_counts_code_points() {
        let tokenizer = char_tokenizer(2);
        let tokens = tokenizer.tokenize("héllo");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokenizer.reconstruct(&tokens), "héllo");
    }
}
