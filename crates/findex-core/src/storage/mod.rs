//! Storage layer - saved search files + JSONL corpus import/export
//!
//! # Architecture
//!
//! - `saved_queries`: repositories for the saved search sequence
//! - `jsonl`: one-entity-per-line corpus files
//!
//! # Usage
//!
//! ```ignore
//! use findex_core::domain::search::SavedQueryStore;
//! use findex_core::storage::{JsonFileSavedQueryRepository, load_corpus_jsonl};
//!
//! let corpus = load_corpus_jsonl(Path::new("corpus.jsonl"))?;
//! let store = SavedQueryStore::open(JsonFileSavedQueryRepository::new(path))?;
//! ```

pub mod jsonl;
pub mod saved_queries;

// Re-export commonly used types
pub use jsonl::{load_corpus_jsonl, read_corpus_jsonl, write_corpus, write_corpus_jsonl};
pub use saved_queries::{JsonFileSavedQueryRepository, MemorySavedQueryRepository};
