//! Search domain module
//!
//! Faceted search over an in-memory corpus of typed records.
//!
//! # Architecture
//!
//! - **Entities**: `Entity`, `EntityType`, `SearchResult`
//! - **Corpus**: `Corpus` snapshot with facet enumeration
//! - **Query**: `Query` value object and its enums
//! - **Specifications**: one per filter dimension, joined by `QuerySpec`
//! - **Ranker**: stable ordering per the query's sort directive
//! - **Saved searches**: `SavedQueryStore` over a `SavedQueryRepository`
//! - **Service**: `SearchService` for one evaluation pass
//!
//! # Example
//!
//! ```
//! use findex_core::domain::search::{Corpus, Entity, EntityType, Query, SearchService};
//!
//! let corpus = Corpus::from_entities([
//!     Entity::new(EntityType::Tasks, 1, "Fix payment bug").with_tags(["bug"]),
//!     Entity::new(EntityType::Tasks, 2, "Write documentation"),
//! ]);
//!
//! let results = SearchService::new(&corpus).search(&Query::new("bug"));
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].id, 1);
//! ```

pub mod corpus;
pub mod dates;
pub mod entity;
pub mod filter_count;
pub mod query;
pub mod ranker;
pub mod repository_trait;
pub mod saved;
pub mod service;
pub mod specification;

// Re-export main types
pub use corpus::{Corpus, FacetCounts};
pub use entity::{Entity, EntityType, SearchResult};
pub use filter_count::{FilterDimension, active_filter_count, active_filter_dimensions};
pub use query::{DateRange, Query, SortBy, SortOrder, TextMatch};
pub use ranker::{rank, rank_by};
pub use repository_trait::SavedQueryRepository;
pub use saved::{SavedQuery, SavedQueryStore, restore_query};
pub use service::{SearchPage, SearchService};
pub use specification::{
    ARCHIVED_STATUS, ArchivedPolicySpec, DateRangeSpec, OwnerSpec, QuerySpec, StatusSpec,
    TagSpec, TextMatchSpec, TypeMembershipSpec, matches,
};
