//! # Muninn: Approximate Dictionary Entity Extraction
//!
//! A high-performance implementation of filter-and-verify entity
//! extraction: given a dictionary of short strings and a document, find
//! every document substring whose similarity to some dictionary entity
//! clears a threshold. The filter stage combines an inverted index, a
//! single min-heap traversal, and overlap-bound pruning to discard almost
//! all of the quadratic substring space before the exact verifier runs.
//!
//! Supported measures: Jaccard, cosine, and Dice over word tokens;
//! edit distance and edit similarity over character q-grams.
//!
//! ## Quick Start
//!
//! ```rust
//! use muninn::{ExtractionConfig, MuninnEngine};
//!
//! fn main() -> muninn::Result<()> {
//!     let config = ExtractionConfig::default(); // edit distance, tau = 2
//!     let engine = MuninnEngine::from_strings(config, ["chaudhuri", "venkatesh"])?;
//!     let report = engine.extract("surauijt chadhurisigmod")?;
//!     for m in &report.matches {
//!         println!("{:?} ~ {:?} (score {:?})", m.text, m.entity.0, m.score);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::len_without_is_empty)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Core data structures and configuration
pub mod core {
    //! Configuration, errors, tokenization, and the entity store.

    pub mod config;
    pub mod dictionary;
    pub mod errors;
    pub mod tokenize;
}

// The Faerie filter engine
pub mod filter {
    //! The filter stage: bounds, inverted index, heap scan, counting,
    //! pruning, and the match iterator.

    pub mod bounds;
    pub mod counts;
    pub mod engine;
    pub mod index;
    pub mod pruning;
    pub mod scan;
}

// Exact similarity verification
pub mod verify;

// Report rendering and output
pub mod io {
    //! Report rendering and file output.

    pub mod reports;
}

// Public API and engine interface
pub mod api {
    //! High-level engine and result types.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use crate::api::engine::MuninnEngine;
pub use crate::api::results::{EntityMatch, ExtractionReport};
pub use crate::core::config::{
    ExtractionConfig, PrunerKind, SimilarityKind, TokenMode, TokenizerConfig,
};
pub use crate::core::dictionary::{Entity, EntityDictionary};
pub use crate::core::errors::{MuninnError, Result};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
