//! Findex Core Library
//!
//! This crate provides the core functionality for Findex, including:
//! - Entity model and in-memory corpus with facet enumeration
//! - Query value object and specification-based predicate evaluation
//! - Stable result ranking
//! - Active filter counting
//! - Saved searches with defaulting restore
//! - Storage (saved search files + JSONL corpus import/export)
//! - Configuration

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::search::{
        Corpus, DateRange, Entity, EntityType, Query, SavedQuery, SavedQueryStore, SearchPage,
        SearchResult, SearchService, SortBy, SortOrder, TextMatch, active_filter_count,
    };
    pub use crate::error::{Error, Result};
}
