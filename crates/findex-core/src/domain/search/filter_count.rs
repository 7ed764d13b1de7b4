//! Active filter badge count

use serde::Serialize;
use std::fmt;

use super::query::{Query, SortBy, TextMatch};

/// An advanced filter dimension that can deviate from the default query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    DateRange,
    Owners,
    Tags,
    Statuses,
    TextMatch,
    ShowArchived,
    SortBy,
}

impl FilterDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateRange => "dateRange",
            Self::Owners => "owners",
            Self::Tags => "tags",
            Self::Statuses => "statuses",
            Self::TextMatch => "textMatch",
            Self::ShowArchived => "showArchived",
            Self::SortBy => "sortBy",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dimensions of `query` that differ from the default query
///
/// Free text, selected types and sort order never count.
pub fn active_filter_dimensions(query: &Query) -> Vec<FilterDimension> {
    [
        (query.active_date_range().is_some(), FilterDimension::DateRange),
        (!query.owners.is_empty(), FilterDimension::Owners),
        (!query.tags.is_empty(), FilterDimension::Tags),
        (!query.statuses.is_empty(), FilterDimension::Statuses),
        (query.text_match != TextMatch::Contains, FilterDimension::TextMatch),
        (query.show_archived, FilterDimension::ShowArchived),
        (query.sort_by != SortBy::Relevance, FilterDimension::SortBy),
    ]
    .into_iter()
    .filter_map(|(active, dimension)| active.then_some(dimension))
    .collect()
}

/// Number of active filter dimensions; each counts at most once
pub fn active_filter_count(query: &Query) -> usize {
    active_filter_dimensions(query).len()
}
