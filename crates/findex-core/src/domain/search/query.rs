//! Search query value object
//!
//! A [`Query`] is a complete, value-comparable snapshot of what the user is
//! asking for. Every filter dimension has an "off" value (empty set, `None`,
//! `false`) and the default query has every dimension off.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::dates;
use super::entity::EntityType;
use crate::error::Error;

/// How free text is compared against each searchable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextMatch {
    /// Field contains the text anywhere
    #[default]
    Contains,
    /// Field equals the text, ignoring case
    Exact,
    StartsWith,
    EndsWith,
}

impl TextMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Exact => "exact",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
        }
    }

    /// Compare an already lower-cased field against already lower-cased text
    pub fn matches(&self, field: &str, needle: &str) -> bool {
        match self {
            Self::Contains => field.contains(needle),
            Self::Exact => field == needle,
            Self::StartsWith => field.starts_with(needle),
            Self::EndsWith => field.ends_with(needle),
        }
    }
}

/// Inclusive calendar date bounds; a missing bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, with = "dates::option")]
    pub from: Option<NaiveDate>,
    #[serde(default, with = "dates::option")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Range with only a lower bound
    pub fn since(from: NaiveDate) -> Self {
        Self::new(Some(from), None)
    }

    /// Range with only an upper bound
    pub fn until(to: NaiveDate) -> Self {
        Self::new(None, Some(to))
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Sort key for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Corpus order; there is no scoring model
    #[default]
    Relevance,
    Name,
    Date,
    Status,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Name => "name",
            Self::Date => "date",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

macro_rules! impl_wire_str {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            /// Case-insensitive; accepts the camelCase wire form or kebab/snake case
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let folded = s.replace(['-', '_'], "").to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|candidate: &$ty| candidate.as_str().to_lowercase() == folded)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "unknown {} '{}'. Valid values: {}",
                            $what,
                            s,
                            [$($variant.as_str()),+].join(", ")
                        ))
                    })
            }
        }
    };
}

impl_wire_str!(TextMatch, "text match mode", [
    TextMatch::Contains,
    TextMatch::Exact,
    TextMatch::StartsWith,
    TextMatch::EndsWith,
]);
impl_wire_str!(SortBy, "sort key", [SortBy::Relevance, SortBy::Name, SortBy::Date, SortBy::Status]);
impl_wire_str!(SortOrder, "sort order", [SortOrder::Asc, SortOrder::Desc]);

/// A search query with all parameters
///
/// Serialized field names are camelCase and dates are ISO strings, which is
/// also the persisted shape of a saved search. Missing fields deserialize to
/// their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    /// Free text, matched case-insensitively
    pub free_text: String,

    /// Entity types to search; empty searches nothing
    #[serde(deserialize_with = "known_types")]
    pub selected_types: BTreeSet<EntityType>,

    pub text_match: TextMatch,

    pub date_range: Option<DateRange>,

    /// Required owners (empty: no restriction)
    pub owners: BTreeSet<String>,

    /// Entity must carry at least one of these tags (empty: no restriction)
    pub tags: BTreeSet<String>,

    /// Required statuses (empty: no restriction)
    pub statuses: BTreeSet<String>,

    /// Include entities whose status is `archived`
    pub show_archived: bool,

    pub sort_by: SortBy,

    pub sort_order: SortOrder,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            free_text: String::new(),
            selected_types: EntityType::all().iter().copied().collect(),
            text_match: TextMatch::default(),
            date_range: None,
            owners: BTreeSet::new(),
            tags: BTreeSet::new(),
            statuses: BTreeSet::new(),
            show_archived: false,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl Query {
    /// Create a default query searching every type for `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self::default().with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = text.into();
        self
    }

    /// Replace the selected entity types
    pub fn with_types<I: IntoIterator<Item = EntityType>>(mut self, types: I) -> Self {
        self.selected_types = types.into_iter().collect();
        self
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.insert(owner.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.insert(status.into());
        self
    }

    pub fn with_show_archived(mut self, show_archived: bool) -> Self {
        self.show_archived = show_archived;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Lower-cased free text used by the text matcher
    pub fn normalized_text(&self) -> String {
        self.free_text.to_lowercase()
    }

    /// Date range, if it bounds at least one side
    pub fn active_date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref().filter(|range| !range.is_unbounded())
    }

    /// Clear the advanced filter dimensions, keeping free text and types
    pub fn reset_filters(&mut self) {
        let defaults = Self::default();
        self.text_match = defaults.text_match;
        self.date_range = None;
        self.owners.clear();
        self.tags.clear();
        self.statuses.clear();
        self.show_archived = defaults.show_archived;
        self.sort_by = defaults.sort_by;
        self.sort_order = defaults.sort_order;
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Read a type list, skipping names this build does not know
///
/// A non-empty list in which no name is known falls back to every type.
fn known_types<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<EntityType>, D::Error> {
    let names: Vec<String> = Vec::deserialize(deserializer)?;
    let known: BTreeSet<EntityType> = names
        .iter()
        .filter_map(|name| match name.parse::<EntityType>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                tracing::warn!(entity_type = %name, "Ignoring unknown entity type in query");
                None
            }
        })
        .collect();

    if known.is_empty() && !names.is_empty() {
        tracing::warn!(count = names.len(), "No known entity types in query; searching all types");
        return Ok(EntityType::all().iter().copied().collect());
    }
    Ok(known)
}
