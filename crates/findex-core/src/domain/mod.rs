//! Domain layer
//!
//! Contains the search engine's business logic and domain models.

pub mod search;
pub mod specification;
