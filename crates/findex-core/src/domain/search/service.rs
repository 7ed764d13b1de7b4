//! Search service
//!
//! Runs one evaluation pass: filter the corpus with the query's
//! specifications, then order the survivors. Every call is a pure function of
//! the corpus snapshot and the query.

use serde::Serialize;
use tracing::debug;

use super::corpus::Corpus;
use super::entity::{Entity, SearchResult};
use super::filter_count::active_filter_count;
use super::query::Query;
use super::ranker;
use super::specification::QuerySpec;
use crate::domain::specification::Specification;

/// One page of ranked results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    /// Matches across all pages
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub active_filters: usize,
}

impl SearchPage {
    pub fn has_more(&self) -> bool {
        self.offset + self.results.len() < self.total
    }
}

/// Service for evaluating queries against a corpus snapshot
#[derive(Debug, Clone, Copy)]
pub struct SearchService<'c> {
    corpus: &'c Corpus,
}

impl<'c> SearchService<'c> {
    /// Create a new search service over a corpus snapshot
    pub fn new(corpus: &'c Corpus) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &'c Corpus {
        self.corpus
    }

    /// Matching entities in ranked order
    pub fn matching(&self, query: &Query) -> Vec<&'c Entity> {
        let spec = QuerySpec::from_query(query);
        let matched = spec.filter(self.corpus.iter());

        debug!(
            corpus = self.corpus.len(),
            matched = matched.len(),
            active_filters = active_filter_count(query),
            sort_by = %query.sort_by,
            sort_order = %query.sort_order,
            "Search evaluated"
        );

        ranker::rank(matched, query)
    }

    /// Execute a query and project every match into a result row
    pub fn search(&self, query: &Query) -> Vec<SearchResult> {
        self.matching(query)
            .into_iter()
            .map(SearchResult::from)
            .collect()
    }

    /// Execute a query and return one page of results
    pub fn search_page(&self, query: &Query, offset: usize, limit: usize) -> SearchPage {
        let matched = self.matching(query);
        let total = matched.len();
        let results = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(SearchResult::from)
            .collect();

        SearchPage {
            results,
            total,
            offset,
            limit,
            active_filters: active_filter_count(query),
        }
    }

    /// Number of matches, without ranking
    pub fn count(&self, query: &Query) -> usize {
        let spec = QuerySpec::from_query(query);
        self.corpus
            .iter()
            .filter(|entity| spec.is_satisfied_by(entity))
            .count()
    }
}
